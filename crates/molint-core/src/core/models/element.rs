use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements distinguished by interaction perception.
///
/// Only the elements that participate in one of the feature patterns are
/// enumerated; everything else parses to [`Element::Other`]. Deuterium is
/// folded into [`Element::H`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Si,
    P,
    S,
    Cl,
    Se,
    Br,
    I,
    At,
    // --- Ionic-type metals ---
    Li,
    Na,
    K,
    Rb,
    Cs,
    Mg,
    Ca,
    Sr,
    Ba,
    Al,
    Ga,
    In,
    Tl,
    Sn,
    Pb,
    Bi,
    Sb,
    Hg,
    // --- Transition metals ---
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Mo,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    #[default]
    Other,
}

#[rustfmt::skip]
static ELEMENT_SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "D" => Element::H, "B" => Element::B, "C" => Element::C,
    "N" => Element::N, "O" => Element::O, "F" => Element::F, "SI" => Element::Si,
    "P" => Element::P, "S" => Element::S, "CL" => Element::Cl, "SE" => Element::Se,
    "BR" => Element::Br, "I" => Element::I, "AT" => Element::At,
    "LI" => Element::Li, "NA" => Element::Na, "K" => Element::K, "RB" => Element::Rb,
    "CS" => Element::Cs, "MG" => Element::Mg, "CA" => Element::Ca, "SR" => Element::Sr,
    "BA" => Element::Ba, "AL" => Element::Al, "GA" => Element::Ga, "IN" => Element::In,
    "TL" => Element::Tl, "SN" => Element::Sn, "PB" => Element::Pb, "BI" => Element::Bi,
    "SB" => Element::Sb, "HG" => Element::Hg,
    "SC" => Element::Sc, "TI" => Element::Ti, "V" => Element::V, "CR" => Element::Cr,
    "MN" => Element::Mn, "FE" => Element::Fe, "CO" => Element::Co, "NI" => Element::Ni,
    "CU" => Element::Cu, "ZN" => Element::Zn, "MO" => Element::Mo, "RU" => Element::Ru,
    "RH" => Element::Rh, "PD" => Element::Pd, "AG" => Element::Ag, "CD" => Element::Cd,
    "W" => Element::W, "RE" => Element::Re, "OS" => Element::Os, "IR" => Element::Ir,
    "PT" => Element::Pt, "AU" => Element::Au,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Empty element symbol")]
pub struct ParseElementError;

impl Element {
    pub fn is_hydrogen(self) -> bool {
        self == Element::H
    }

    pub fn is_carbon(self) -> bool {
        self == Element::C
    }

    pub fn is_halogen(self) -> bool {
        matches!(
            self,
            Element::F | Element::Cl | Element::Br | Element::I | Element::At
        )
    }

    /// Alkali, alkaline earth and post-transition metals that bind ionically.
    pub fn is_ionic_type_metal(self) -> bool {
        (Element::Li..=Element::Hg).contains(&self)
    }

    /// Metals that form dative (coordinate) bonds with lone-pair donors.
    pub fn is_transition_metal(self) -> bool {
        (Element::Sc..=Element::Au).contains(&self)
    }

    pub fn is_metal(self) -> bool {
        self.is_ionic_type_metal() || self.is_transition_metal()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
            Element::At => "At",
            Element::Li => "Li",
            Element::Na => "Na",
            Element::K => "K",
            Element::Rb => "Rb",
            Element::Cs => "Cs",
            Element::Mg => "Mg",
            Element::Ca => "Ca",
            Element::Sr => "Sr",
            Element::Ba => "Ba",
            Element::Al => "Al",
            Element::Ga => "Ga",
            Element::In => "In",
            Element::Tl => "Tl",
            Element::Sn => "Sn",
            Element::Pb => "Pb",
            Element::Bi => "Bi",
            Element::Sb => "Sb",
            Element::Hg => "Hg",
            Element::Sc => "Sc",
            Element::Ti => "Ti",
            Element::V => "V",
            Element::Cr => "Cr",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Mo => "Mo",
            Element::Ru => "Ru",
            Element::Rh => "Rh",
            Element::Pd => "Pd",
            Element::Ag => "Ag",
            Element::Cd => "Cd",
            Element::W => "W",
            Element::Re => "Re",
            Element::Os => "Os",
            Element::Ir => "Ir",
            Element::Pt => "Pt",
            Element::Au => "Au",
            Element::Other => "X",
        }
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol case-insensitively; unknown symbols map to
    /// [`Element::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(ParseElementError);
        }
        Ok(ELEMENT_SYMBOLS
            .get(symbol.as_str())
            .copied()
            .unwrap_or(Element::Other))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_is_case_insensitive_and_trims() {
        assert_eq!(Element::from_str("cl"), Ok(Element::Cl));
        assert_eq!(Element::from_str(" Br "), Ok(Element::Br));
        assert_eq!(Element::from_str("ZN"), Ok(Element::Zn));
    }

    #[test]
    fn deuterium_is_parsed_as_hydrogen() {
        assert_eq!(Element::from_str("D"), Ok(Element::H));
        assert!(Element::from_str("d").unwrap().is_hydrogen());
    }

    #[test]
    fn unknown_symbols_map_to_other_and_empty_is_an_error() {
        assert_eq!(Element::from_str("Xx"), Ok(Element::Other));
        assert_eq!(Element::from_str("  "), Err(ParseElementError));
    }

    #[test]
    fn metal_classes_are_disjoint() {
        assert!(Element::Na.is_ionic_type_metal());
        assert!(!Element::Na.is_transition_metal());
        assert!(Element::Zn.is_transition_metal());
        assert!(!Element::Zn.is_ionic_type_metal());
        assert!(!Element::C.is_metal());
        assert!(!Element::Other.is_metal());
    }

    #[test]
    fn halogens_are_recognized() {
        for e in [Element::F, Element::Cl, Element::Br, Element::I, Element::At] {
            assert!(e.is_halogen());
        }
        assert!(!Element::O.is_halogen());
    }

    #[test]
    fn symbol_round_trips_through_parsing() {
        for e in [Element::Cl, Element::Fe, Element::Se, Element::Hg] {
            assert_eq!(Element::from_str(e.symbol()), Ok(e));
        }
    }
}
