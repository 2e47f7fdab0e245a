use super::ids::AtomIndex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Whether the bond makes both partners at least trigonal (sp2).
    pub fn is_pi(self) -> bool {
        !matches!(self, BondOrder::Single)
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "s" | "sing" | "single" => Ok(Self::Single),
            "2" | "d" | "doub" | "double" => Ok(Self::Double),
            "3" | "t" | "trip" | "triple" => Ok(Self::Triple),
            "ar" | "arom" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Aromatic => "aromatic",
        })
    }
}

/// A covalent bond between two atoms of the same model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub a: AtomIndex,
    pub b: AtomIndex,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(a: AtomIndex, b: AtomIndex, order: BondOrder) -> Self {
        Self { a, b, order }
    }

    pub fn contains(&self, index: AtomIndex) -> bool {
        self.a == index || self.b == index
    }

    /// Returns the partner of `index` in this bond, if `index` takes part in it.
    pub fn partner(&self, index: AtomIndex) -> Option<AtomIndex> {
        if self.a == index {
            Some(self.b)
        } else if self.b == index {
            Some(self.a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_parses_mmcif_value_order_spellings() {
        assert_eq!("sing".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("DOUB".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("trip".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("arom".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert_eq!(" 2 ".parse::<BondOrder>().unwrap(), BondOrder::Double);
    }

    #[test]
    fn bond_order_rejects_unknown_spellings() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("quad".parse::<BondOrder>().is_err());
    }

    #[test]
    fn only_single_bonds_are_not_pi_bonds() {
        assert!(!BondOrder::Single.is_pi());
        assert!(BondOrder::Double.is_pi());
        assert!(BondOrder::Triple.is_pi());
        assert!(BondOrder::Aromatic.is_pi());
    }

    #[test]
    fn partner_returns_the_other_atom() {
        let bond = Bond::new(3, 9, BondOrder::Single);
        assert_eq!(bond.partner(3), Some(9));
        assert_eq!(bond.partner(9), Some(3));
        assert_eq!(bond.partner(4), None);
        assert!(bond.contains(9));
        assert!(!bond.contains(4));
    }
}
