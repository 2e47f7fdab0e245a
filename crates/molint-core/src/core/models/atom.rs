use super::element::Element;
use super::ids::ResidueIndex;
use nalgebra::Point3;

/// Represents an atom in a molecular model with the properties interaction
/// perception depends on.
///
/// Coordinates are stored in the model's invariant frame; symmetry operators
/// are applied by the [`Unit`](super::unit::Unit) that views the atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "NZ", "OD1").
    pub name: String,
    /// The chemical element of the atom.
    pub element: Element,
    /// Index of the parent residue in the model's residue table.
    pub residue_index: ResidueIndex,
    /// Alternate location identifier, if the atom has several conformers.
    pub alt_loc: Option<char>,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Hydrogens attached to this atom that are not modelled explicitly.
    pub implicit_hydrogens: u8,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with no charge, no alternate location and no
    /// implicit hydrogens.
    ///
    /// The residue index is assigned when the atom is added through a
    /// [`ModelBuilder`](super::model::ModelBuilder).
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The chemical element.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: Element, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element,
            residue_index: 0,
            alt_loc: None,
            formal_charge: 0,
            implicit_hydrogens: 0,
            position,
        }
    }

    pub fn with_alt_loc(mut self, alt_loc: char) -> Self {
        self.alt_loc = Some(alt_loc);
        self
    }

    pub fn with_formal_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    pub fn with_implicit_hydrogens(mut self, count: u8) -> Self {
        self.implicit_hydrogens = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new("NZ", Element::N, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "NZ");
        assert_eq!(atom.element, Element::N);
        assert_eq!(atom.residue_index, 0);
        assert_eq!(atom.alt_loc, None);
        assert_eq!(atom.formal_charge, 0);
        assert_eq!(atom.implicit_hydrogens, 0);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn builder_methods_set_optional_fields() {
        let atom = Atom::new("NZ", Element::N, Point3::origin())
            .with_alt_loc('B')
            .with_formal_charge(1)
            .with_implicit_hydrogens(3);

        assert_eq!(atom.alt_loc, Some('B'));
        assert_eq!(atom.formal_charge, 1);
        assert_eq!(atom.implicit_hydrogens, 3);
    }
}
