use crate::core::models::element::Element;
use crate::core::models::ids::UnitAtomIndex;
use crate::core::models::structure::Structure;
use crate::core::models::topology::BondOrder;
use crate::core::models::unit::Unit;

/// Coordination geometry of an atom as perceived from its bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AtomGeometry {
    #[default]
    Unknown,
    Linear,
    Trigonal,
    Tetrahedral,
}

impl AtomGeometry {
    /// The ideal bond angle in radians, if the geometry defines one.
    pub fn ideal_angle(self) -> Option<f64> {
        match self {
            AtomGeometry::Unknown => None,
            AtomGeometry::Linear => Some(180f64.to_radians()),
            AtomGeometry::Trigonal => Some(120f64.to_radians()),
            AtomGeometry::Tetrahedral => Some(109.4712f64.to_radians()),
        }
    }
}

/// Bonding summary of a single atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtomValence {
    pub explicit_hydrogens: u8,
    pub implicit_hydrogens: u8,
    pub heavy_bonds: u8,
    pub charge: i8,
    pub geometry: AtomGeometry,
}

#[derive(Default)]
struct BondTally {
    hydrogens: u8,
    heavy: u8,
    double: u8,
    triple: u8,
    aromatic: u8,
    conjugated: bool,
}

impl AtomValence {
    pub fn perceive(structure: &Structure, unit: &Unit, local: UnitAtomIndex) -> Self {
        let atom = unit.atom(local);
        let mut tally = BondTally::default();
        structure.each_bonded_atom(unit, local, |other, j, order| {
            if other.element(j).is_hydrogen() {
                tally.hydrogens = tally.hydrogens.saturating_add(1);
                return;
            }
            tally.heavy = tally.heavy.saturating_add(1);
            match order {
                BondOrder::Double => tally.double += 1,
                BondOrder::Triple => tally.triple += 1,
                BondOrder::Aromatic => tally.aromatic += 1,
                BondOrder::Single => {}
            }
            let partner = other.atom_index(j);
            if structure
                .model()
                .neighbors(partner)
                .iter()
                .any(|(_, o)| o.is_pi())
            {
                tally.conjugated = true;
            }
        });

        Self {
            explicit_hydrogens: tally.hydrogens,
            implicit_hydrogens: atom.implicit_hydrogens,
            heavy_bonds: tally.heavy,
            charge: atom.formal_charge,
            geometry: perceive_geometry(atom.element, &tally),
        }
    }

    /// Explicit plus implicit hydrogens.
    pub fn total_hydrogens(&self) -> u8 {
        self.explicit_hydrogens.saturating_add(self.implicit_hydrogens)
    }

    /// Heavy-atom bonds plus all hydrogens.
    pub fn total_bonds(&self) -> u8 {
        self.heavy_bonds.saturating_add(self.total_hydrogens())
    }
}

/// Valence of every atom of one unit, indexed by unit-local atom index.
#[derive(Debug, Clone, Default)]
pub struct ValenceModel {
    atoms: Vec<AtomValence>,
}

impl ValenceModel {
    pub fn compute(structure: &Structure, unit: &Unit) -> Self {
        Self {
            atoms: (0..unit.len())
                .map(|local| AtomValence::perceive(structure, unit, local))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atom(&self, local: UnitAtomIndex) -> &AtomValence {
        &self.atoms[local]
    }

    pub fn explicit_hydrogens(&self, local: UnitAtomIndex) -> u8 {
        self.atoms[local].explicit_hydrogens
    }

    pub fn total_hydrogens(&self, local: UnitAtomIndex) -> u8 {
        self.atoms[local].total_hydrogens()
    }

    pub fn heavy_bonds(&self, local: UnitAtomIndex) -> u8 {
        self.atoms[local].heavy_bonds
    }

    pub fn total_bonds(&self, local: UnitAtomIndex) -> u8 {
        self.atoms[local].total_bonds()
    }

    pub fn charge(&self, local: UnitAtomIndex) -> i8 {
        self.atoms[local].charge
    }

    pub fn geometry(&self, local: UnitAtomIndex) -> AtomGeometry {
        self.atoms[local].geometry
    }
}

fn perceive_geometry(element: Element, tally: &BondTally) -> AtomGeometry {
    if tally.heavy == 0 {
        return AtomGeometry::Unknown;
    }
    if tally.triple > 0 || tally.double >= 2 {
        return AtomGeometry::Linear;
    }
    if tally.double > 0 || tally.aromatic > 0 {
        return AtomGeometry::Trigonal;
    }
    // Lone pairs of N and O delocalize into an adjacent pi system.
    if matches!(element, Element::N | Element::O) && tally.conjugated {
        return AtomGeometry::Trigonal;
    }
    AtomGeometry::Tetrahedral
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::model::ModelBuilder;
    use nalgebra::Point3;

    fn atom(name: &str, element: Element) -> Atom {
        Atom::new(name, element, Point3::origin())
    }

    // N-methylacetamide with one explicit amide hydrogen, plus acetonitrile N.
    fn amide_structure() -> Structure {
        let mut b = ModelBuilder::new();
        b.start_chain('A').start_residue(1, "NMA").unwrap();
        let c1 = b.add_atom(atom("C1", Element::C).with_implicit_hydrogens(3)).unwrap();
        let c = b.add_atom(atom("C", Element::C)).unwrap();
        let o = b.add_atom(atom("O", Element::O)).unwrap();
        let n = b.add_atom(atom("N", Element::N)).unwrap();
        let h = b.add_atom(atom("H", Element::H)).unwrap();
        let cm = b.add_atom(atom("CM", Element::C).with_implicit_hydrogens(3)).unwrap();
        b.start_residue(2, "ACN").unwrap();
        let c3 = b.add_atom(atom("C3", Element::C)).unwrap();
        let n3 = b.add_atom(atom("N3", Element::N)).unwrap();
        b.add_atom(atom("OW", Element::O).with_implicit_hydrogens(2)).unwrap();
        b.add_bond(c1, c, BondOrder::Single).unwrap();
        b.add_bond(c, o, BondOrder::Double).unwrap();
        b.add_bond(c, n, BondOrder::Single).unwrap();
        b.add_bond(n, h, BondOrder::Single).unwrap();
        b.add_bond(n, cm, BondOrder::Single).unwrap();
        b.add_bond(c3, n3, BondOrder::Triple).unwrap();
        Structure::from_model(b.build())
    }

    #[test]
    fn geometry_follows_bond_orders_and_conjugation() {
        let structure = amide_structure();
        let unit = structure.units().next().unwrap();
        let valence = ValenceModel::compute(&structure, unit);

        assert_eq!(valence.geometry(0), AtomGeometry::Tetrahedral);
        assert_eq!(valence.geometry(1), AtomGeometry::Trigonal);
        assert_eq!(valence.geometry(2), AtomGeometry::Trigonal);
        assert_eq!(valence.geometry(3), AtomGeometry::Trigonal);
        assert_eq!(valence.geometry(5), AtomGeometry::Tetrahedral);
        assert_eq!(valence.geometry(7), AtomGeometry::Linear);
        assert_eq!(valence.geometry(8), AtomGeometry::Unknown);
    }

    #[test]
    fn hydrogen_counts_combine_explicit_and_implicit() {
        let structure = amide_structure();
        let unit = structure.units().next().unwrap();
        let valence = ValenceModel::compute(&structure, unit);

        assert_eq!(valence.explicit_hydrogens(3), 1);
        assert_eq!(valence.total_hydrogens(3), 1);
        assert_eq!(valence.heavy_bonds(3), 2);
        assert_eq!(valence.total_bonds(3), 3);
        assert_eq!(valence.total_hydrogens(0), 3);
        assert_eq!(valence.total_hydrogens(8), 2);
        assert_eq!(valence.charge(3), 0);
    }

    #[test]
    fn ideal_angles_match_geometry() {
        assert_eq!(AtomGeometry::Unknown.ideal_angle(), None);
        let tet = AtomGeometry::Tetrahedral.ideal_angle().unwrap().to_degrees();
        assert!((tet - 109.4712).abs() < 1e-9);
        let lin = AtomGeometry::Linear.ideal_angle().unwrap();
        assert!((lin - std::f64::consts::PI).abs() < 1e-12);
    }
}
