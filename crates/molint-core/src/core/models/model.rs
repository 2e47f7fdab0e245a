use super::atom::Atom;
use super::ids::{AtomIndex, ResidueIndex};
use super::residue::Residue;
use super::topology::{Bond, BondOrder};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Cannot start a residue before a chain has been started")]
    NoCurrentChain,
    #[error("Cannot add atom '{0}' before a residue has been started")]
    NoCurrentResidue(String),
    #[error("Atom index {0} is out of range")]
    AtomOutOfRange(AtomIndex),
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(AtomIndex),
    #[error("Unit elements must be strictly increasing; found {found} after {previous}")]
    UnsortedElements { previous: AtomIndex, found: AtomIndex },
    #[error("A unit must contain at least one atom")]
    EmptyUnit,
}

/// An immutable atomic model: atoms, residues and covalent bonds.
///
/// A model is shared by every [`Unit`](super::unit::Unit) of a
/// [`Structure`](super::structure::Structure); units select subsets of its
/// atoms and place them with a symmetry operator.
#[derive(Debug, Clone, Default)]
pub struct Model {
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    bonds: Vec<Bond>,
    /// Adjacency list indexed by atom, each entry `(neighbor, order)`.
    adjacency: Vec<Vec<(AtomIndex, BondOrder)>>,
}

impl Model {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom(&self, index: AtomIndex) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn residue(&self, index: ResidueIndex) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Returns the bonded neighbors of an atom together with the bond orders.
    ///
    /// Atoms outside the model yield an empty slice.
    pub fn neighbors(&self, index: AtomIndex) -> &[(AtomIndex, BondOrder)] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn are_bonded(&self, a: AtomIndex, b: AtomIndex) -> bool {
        self.neighbors(a).iter().any(|&(n, _)| n == b)
    }
}

/// Incremental builder for [`Model`] in chain → residue → atom order.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
    current_chain: Option<char>,
    current_residue: Option<ResidueIndex>,
    residue_map: HashMap<(char, isize), ResidueIndex>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_chain(&mut self, id: char) -> &mut Self {
        self.current_chain = Some(id);
        self.current_residue = None;
        self
    }

    /// Starts (or resumes) the residue `seq_id` of the current chain.
    pub fn start_residue(&mut self, seq_id: isize, name: &str) -> Result<&mut Self, ModelError> {
        let chain_id = self.current_chain.ok_or(ModelError::NoCurrentChain)?;
        let residues = &mut self.model.residues;
        let index = *self
            .residue_map
            .entry((chain_id, seq_id))
            .or_insert_with(|| {
                residues.push(Residue::new(name, seq_id, chain_id));
                residues.len() - 1
            });
        self.current_residue = Some(index);
        Ok(self)
    }

    /// Adds an atom to the current residue and returns its model index.
    pub fn add_atom(&mut self, mut atom: Atom) -> Result<AtomIndex, ModelError> {
        let residue_index = self
            .current_residue
            .ok_or_else(|| ModelError::NoCurrentResidue(atom.name.clone()))?;
        let index = self.model.atoms.len();
        atom.residue_index = residue_index;
        self.model.residues[residue_index].add_atom(&atom.name, index);
        self.model.atoms.push(atom);
        self.model.adjacency.push(Vec::new());
        Ok(index)
    }

    /// Adds a bond between two existing atoms. Adding an existing bond is a no-op.
    pub fn add_bond(
        &mut self,
        a: AtomIndex,
        b: AtomIndex,
        order: BondOrder,
    ) -> Result<&mut Self, ModelError> {
        let count = self.model.atoms.len();
        for index in [a, b] {
            if index >= count {
                return Err(ModelError::AtomOutOfRange(index));
            }
        }
        if a == b {
            return Err(ModelError::SelfBond(a));
        }
        if !self.model.are_bonded(a, b) {
            self.model.bonds.push(Bond::new(a, b, order));
            self.model.adjacency[a].push((b, order));
            self.model.adjacency[b].push((a, order));
        }
        Ok(self)
    }

    pub fn build(self) -> Model {
        self.model
    }
}
