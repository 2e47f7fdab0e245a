use super::ids::AtomIndex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub name: String,                          // Component id (e.g., "ARG", "HOH", "ATP")
    pub seq_id: isize,                         // Residue sequence number from source file
    pub chain_id: char,                        // Identifier of the parent chain
    pub(crate) atoms: Vec<AtomIndex>,          // Model indices of the atoms in this residue
    atom_name_map: HashMap<String, AtomIndex>, // Map from atom name to its model index
}

impl Residue {
    pub(crate) fn new(name: &str, seq_id: isize, chain_id: char) -> Self {
        Self {
            name: name.to_string(),
            seq_id,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, index: AtomIndex) {
        self.atoms.push(index);
        self.atom_name_map.insert(atom_name.to_string(), index);
    }

    pub fn atoms(&self) -> &[AtomIndex] {
        &self.atoms
    }

    pub fn atom_index_by_name(&self, name: &str) -> Option<AtomIndex> {
        self.atom_name_map.get(name).copied()
    }
}
