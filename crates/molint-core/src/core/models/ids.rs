use slotmap::new_key_type;

new_key_type! {
    pub struct UnitId;
}

/// Index of an atom in a [`Model`](super::model::Model)'s atom table.
pub type AtomIndex = usize;

/// Index of an atom within a [`Unit`](super::unit::Unit)'s element list.
pub type UnitAtomIndex = usize;

/// Index of a residue in a [`Model`](super::model::Model)'s residue table.
pub type ResidueIndex = usize;
