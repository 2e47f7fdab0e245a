//! Accepted feature pairs stored as compact graphs: one intra-unit graph per
//! unit and a single sparse inter-unit graph over unit pairs.

pub mod inter;
pub mod intra;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionType {
    Ionic,
    CationPi,
    PiStacking,
    HydrogenBond,
    HalogenBond,
    Hydrophobic,
    MetalCoordination,
    WeakHydrogenBond,
}

impl InteractionType {
    pub const ALL: [InteractionType; 8] = [
        InteractionType::Ionic,
        InteractionType::CationPi,
        InteractionType::PiStacking,
        InteractionType::HydrogenBond,
        InteractionType::HalogenBond,
        InteractionType::Hydrophobic,
        InteractionType::MetalCoordination,
        InteractionType::WeakHydrogenBond,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InteractionType::Ionic => "ionic",
            InteractionType::CationPi => "cation-pi",
            InteractionType::PiStacking => "pi-stacking",
            InteractionType::HydrogenBond => "hydrogen-bond",
            InteractionType::HalogenBond => "halogen-bond",
            InteractionType::Hydrophobic => "hydrophobic",
            InteractionType::MetalCoordination => "metal-coordination",
            InteractionType::WeakHydrogenBond => "weak-hydrogen-bond",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marks an edge that a refinement pass superseded. Filtered edges stay in the
/// graph but are hidden from the default accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionFlag {
    #[default]
    None,
    Filtered,
}
