use super::atom::Atom;
use super::element::Element;
use super::ids::{AtomIndex, ResidueIndex, UnitAtomIndex, UnitId};
use super::model::Model;
use super::operator::SymmetryOperator;
use super::residue::Residue;
use crate::core::spatial::sphere::BoundingSphere;
use nalgebra::Point3;
use std::sync::Arc;

/// A symmetry-distinct subset of a model's atoms.
///
/// Atoms are addressed by their unit-local index, i.e. the position of the
/// model atom index in [`Unit::elements`]. Positions returned by
/// [`Unit::position`] have the unit's operator applied; invariant positions
/// are the raw model coordinates.
#[derive(Debug, Clone)]
pub struct Unit {
    pub(crate) id: UnitId,
    model: Arc<Model>,
    elements: Vec<AtomIndex>,
    operator: SymmetryOperator,
    boundary: BoundingSphere,
}

impl Unit {
    pub(crate) fn new(model: Arc<Model>, elements: Vec<AtomIndex>, operator: SymmetryOperator) -> Self {
        let boundary = {
            let positions: Vec<Point3<f64>> = elements
                .iter()
                .map(|&i| model.atoms()[i].position)
                .collect();
            BoundingSphere::from_points(&positions)
        };
        Self {
            id: UnitId::default(),
            model,
            elements,
            operator,
            boundary,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Model atom indices of this unit, strictly increasing.
    pub fn elements(&self) -> &[AtomIndex] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn operator(&self) -> &SymmetryOperator {
        &self.operator
    }

    #[inline]
    pub fn atom_index(&self, local: UnitAtomIndex) -> AtomIndex {
        self.elements[local]
    }

    #[inline]
    pub fn atom(&self, local: UnitAtomIndex) -> &Atom {
        &self.model.atoms()[self.elements[local]]
    }

    #[inline]
    pub fn element(&self, local: UnitAtomIndex) -> Element {
        self.atom(local).element
    }

    #[inline]
    pub fn residue_index(&self, local: UnitAtomIndex) -> ResidueIndex {
        self.atom(local).residue_index
    }

    pub fn residue(&self, local: UnitAtomIndex) -> &Residue {
        &self.model.residues()[self.residue_index(local)]
    }

    #[inline]
    pub fn alt_loc(&self, local: UnitAtomIndex) -> Option<char> {
        self.atom(local).alt_loc
    }

    #[inline]
    pub fn invariant_position(&self, local: UnitAtomIndex) -> Point3<f64> {
        self.atom(local).position
    }

    /// Position of the atom with the unit's operator applied.
    #[inline]
    pub fn position(&self, local: UnitAtomIndex) -> Point3<f64> {
        self.operator.apply(&self.atom(local).position)
    }

    /// Maps a model atom index to its unit-local index, if the unit contains it.
    pub fn local_index(&self, atom: AtomIndex) -> Option<UnitAtomIndex> {
        self.elements.binary_search(&atom).ok()
    }

    /// Bounding sphere of the invariant atom positions.
    pub fn boundary(&self) -> &BoundingSphere {
        &self.boundary
    }

    /// Bounding sphere with the unit's operator applied.
    pub fn global_boundary(&self) -> BoundingSphere {
        self.boundary.transformed(&self.operator)
    }
}
