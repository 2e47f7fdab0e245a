//! Chemistry perception derived from a unit's atoms and bonds: residue and
//! atom name tables, a per-unit valence model and aromatic ring perception.

pub mod names;
pub mod rings;
pub mod valence;
