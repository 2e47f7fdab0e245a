//! Interaction families: the feature providers that detect chemical sites and
//! the link testers that classify feature pairs.
//!
//! The set of families is closed. [`InteractionFamily::ALL`] is the
//! registration order, which is also the order testers are consulted in; the
//! first tester to accept a pair decides its interaction type.

pub mod charged;
pub mod common;
pub mod halogen_bonds;
pub mod hydrogen_bonds;
pub mod hydrophobic;
pub mod metal_coordination;

use super::config::{InteractionsParams, ParamSpec};
use super::features::builder::FeaturesBuilder;
use super::features::{FeatureInfo, FeatureType};
use super::links::InteractionType;
use crate::core::chemistry::rings::aromatic_rings;
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::ids::UnitAtomIndex;
use crate::core::models::structure::Structure;
use crate::core::models::unit::Unit;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A unit together with the chemistry perceived from it, shared by all
/// providers scanning that unit.
pub struct UnitContext<'a> {
    pub structure: &'a Structure,
    pub unit: &'a Unit,
    pub valence: ValenceModel,
    pub rings: Vec<Vec<UnitAtomIndex>>,
    in_ring: Vec<bool>,
}

impl<'a> UnitContext<'a> {
    pub fn new(structure: &'a Structure, unit: &'a Unit) -> Self {
        let valence = ValenceModel::compute(structure, unit);
        let rings = aromatic_rings(structure, unit);
        let mut in_ring = vec![false; unit.len()];
        for &member in rings.iter().flatten() {
            in_ring[member] = true;
        }
        Self {
            structure,
            unit,
            valence,
            rings,
            in_ring,
        }
    }

    pub fn in_aromatic_ring(&self, local: UnitAtomIndex) -> bool {
        self.in_ring[local]
    }

    pub fn atom_name(&self, local: UnitAtomIndex) -> &str {
        &self.unit.atom(local).name
    }

    pub fn residue_name(&self, local: UnitAtomIndex) -> &str {
        &self.unit.residue(local).name
    }

    /// Unit-local index of the atom called `name` in the residue of `local`.
    pub fn residue_atom(&self, local: UnitAtomIndex, name: &str) -> Option<UnitAtomIndex> {
        self.unit
            .residue(local)
            .atom_index_by_name(name)
            .and_then(|atom| self.unit.local_index(atom))
    }

    pub fn invariant_position(&self, local: UnitAtomIndex) -> Point3<f64> {
        self.unit.invariant_position(local)
    }

    /// Unit-local indices of the bonded neighbors of `local` within this unit.
    pub fn bonded_in_unit(&self, local: UnitAtomIndex) -> Vec<UnitAtomIndex> {
        let mut out = Vec::new();
        self.structure
            .each_bonded_atom(self.unit, local, |other, j, _| {
                if other.id() == self.unit.id() {
                    out.push(j);
                }
            });
        out
    }

    /// Pushes a single-atom feature at the atom's invariant position.
    pub fn add_one(
        &self,
        builder: &mut FeaturesBuilder,
        feature_type: FeatureType,
        group: super::features::FeatureGroup,
        local: UnitAtomIndex,
    ) {
        let p = self.invariant_position(local);
        builder.add_one(feature_type, group, p.x, p.y, p.z, local);
    }

    /// Pushes one member of a multi-atom feature.
    pub fn push_member(&self, builder: &mut FeaturesBuilder, local: UnitAtomIndex) {
        let p = self.invariant_position(local);
        builder.push_member(p.x, p.y, p.z, local);
    }
}

/// Scans a unit for one chemical pattern and emits features for it.
pub trait FeatureProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Feature types this provider can emit.
    fn feature_types(&self) -> &'static [FeatureType];

    fn add(&self, context: &UnitContext<'_>, builder: &mut FeaturesBuilder);
}

/// Classifies a candidate feature pair for one family.
pub trait LinkTester: Send + Sync {
    fn family(&self) -> InteractionFamily;

    /// Largest center-to-center distance this tester can accept, in Å.
    fn max_distance(&self) -> f64;

    fn max_distance_sq(&self) -> f64 {
        let d = self.max_distance();
        d * d
    }

    /// Returns the interaction type if the pair forms one. `distance_sq` is the
    /// squared center-to-center distance and never exceeds
    /// [`max_distance_sq`](Self::max_distance_sq).
    fn get_type(
        &self,
        structure: &Structure,
        a: &FeatureInfo<'_>,
        b: &FeatureInfo<'_>,
        distance_sq: f64,
    ) -> Option<InteractionType>;
}

static PROVIDERS: &[&dyn FeatureProvider] = &[
    &hydrogen_bonds::HydrogenDonorProvider,
    &hydrogen_bonds::WeakHydrogenDonorProvider,
    &hydrogen_bonds::HydrogenAcceptorProvider,
    &halogen_bonds::HalogenDonorProvider,
    &halogen_bonds::HalogenAcceptorProvider,
    &charged::PositiveChargeProvider,
    &charged::NegativeChargeProvider,
    &charged::AromaticRingProvider,
    &hydrophobic::HydrophobicAtomProvider,
    &metal_coordination::MetalProvider,
    &metal_coordination::MetalBindingProvider,
];

/// Every provider in registration order.
pub fn providers() -> &'static [&'static dyn FeatureProvider] {
    PROVIDERS
}

/// Providers whose features some enabled family consumes, in registration order.
pub fn enabled_providers(params: &InteractionsParams) -> Vec<&'static dyn FeatureProvider> {
    let required: Vec<FeatureType> = params
        .enabled_families()
        .into_iter()
        .flat_map(|f| f.required_features().iter().copied())
        .collect();
    PROVIDERS
        .iter()
        .copied()
        .filter(|p| p.feature_types().iter().any(|t| required.contains(t)))
        .collect()
}

/// Testers of the enabled families, in registration order.
pub fn create_testers(params: &InteractionsParams) -> Vec<Box<dyn LinkTester>> {
    params
        .enabled_families()
        .into_iter()
        .map(|f| f.create_tester(params))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionFamily {
    Ionic,
    PiStacking,
    CationPi,
    HalogenBonds,
    HydrogenBonds,
    WeakHydrogenBonds,
    Hydrophobic,
    MetalCoordination,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown interaction family: '{0}'")]
pub struct UnknownFamilyError(pub String);

impl InteractionFamily {
    pub const ALL: [InteractionFamily; 8] = [
        InteractionFamily::Ionic,
        InteractionFamily::PiStacking,
        InteractionFamily::CationPi,
        InteractionFamily::HalogenBonds,
        InteractionFamily::HydrogenBonds,
        InteractionFamily::WeakHydrogenBonds,
        InteractionFamily::Hydrophobic,
        InteractionFamily::MetalCoordination,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InteractionFamily::Ionic => "ionic",
            InteractionFamily::PiStacking => "pi-stacking",
            InteractionFamily::CationPi => "cation-pi",
            InteractionFamily::HalogenBonds => "halogen-bonds",
            InteractionFamily::HydrogenBonds => "hydrogen-bonds",
            InteractionFamily::WeakHydrogenBonds => "weak-hydrogen-bonds",
            InteractionFamily::Hydrophobic => "hydrophobic",
            InteractionFamily::MetalCoordination => "metal-coordination",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionFamily::Ionic => "Ionic Interactions",
            InteractionFamily::PiStacking => "Pi Stacking",
            InteractionFamily::CationPi => "Cation-Pi Interactions",
            InteractionFamily::HalogenBonds => "Halogen Bonds",
            InteractionFamily::HydrogenBonds => "Hydrogen Bonds",
            InteractionFamily::WeakHydrogenBonds => "Weak Hydrogen Bonds",
            InteractionFamily::Hydrophobic => "Hydrophobic Contacts",
            InteractionFamily::MetalCoordination => "Metal Coordination",
        }
    }

    pub fn param_specs(self) -> &'static [ParamSpec] {
        match self {
            InteractionFamily::Ionic => charged::IONIC_PARAMS,
            InteractionFamily::PiStacking => charged::PI_STACKING_PARAMS,
            InteractionFamily::CationPi => charged::CATION_PI_PARAMS,
            InteractionFamily::HalogenBonds => halogen_bonds::HALOGEN_BOND_PARAMS,
            InteractionFamily::HydrogenBonds => hydrogen_bonds::HYDROGEN_BOND_PARAMS,
            InteractionFamily::WeakHydrogenBonds => hydrogen_bonds::WEAK_HYDROGEN_BOND_PARAMS,
            InteractionFamily::Hydrophobic => hydrophobic::HYDROPHOBIC_PARAMS,
            InteractionFamily::MetalCoordination => metal_coordination::METAL_COORDINATION_PARAMS,
        }
    }

    /// Feature types the family's tester pairs up.
    pub fn required_features(self) -> &'static [FeatureType] {
        match self {
            InteractionFamily::Ionic => &[FeatureType::PositiveCharge, FeatureType::NegativeCharge],
            InteractionFamily::PiStacking => &[FeatureType::AromaticRing],
            InteractionFamily::CationPi => &[FeatureType::AromaticRing, FeatureType::PositiveCharge],
            InteractionFamily::HalogenBonds => {
                &[FeatureType::HalogenDonor, FeatureType::HalogenAcceptor]
            }
            InteractionFamily::HydrogenBonds => {
                &[FeatureType::HydrogenDonor, FeatureType::HydrogenAcceptor]
            }
            InteractionFamily::WeakHydrogenBonds => &[
                FeatureType::WeakHydrogenDonor,
                FeatureType::HydrogenAcceptor,
                FeatureType::WeakHydrogenAcceptor,
            ],
            InteractionFamily::Hydrophobic => &[FeatureType::HydrophobicAtom],
            InteractionFamily::MetalCoordination => &[
                FeatureType::TransitionMetal,
                FeatureType::IonicTypeMetal,
                FeatureType::DativeBondPartner,
                FeatureType::IonicTypePartner,
            ],
        }
    }

    pub fn interaction_type(self) -> InteractionType {
        match self {
            InteractionFamily::Ionic => InteractionType::Ionic,
            InteractionFamily::PiStacking => InteractionType::PiStacking,
            InteractionFamily::CationPi => InteractionType::CationPi,
            InteractionFamily::HalogenBonds => InteractionType::HalogenBond,
            InteractionFamily::HydrogenBonds => InteractionType::HydrogenBond,
            InteractionFamily::WeakHydrogenBonds => InteractionType::WeakHydrogenBond,
            InteractionFamily::Hydrophobic => InteractionType::Hydrophobic,
            InteractionFamily::MetalCoordination => InteractionType::MetalCoordination,
        }
    }

    pub fn create_tester(self, params: &InteractionsParams) -> Box<dyn LinkTester> {
        match self {
            InteractionFamily::Ionic => Box::new(charged::IonicTester::new(&params.ionic)),
            InteractionFamily::PiStacking => {
                Box::new(charged::PiStackingTester::new(&params.pi_stacking))
            }
            InteractionFamily::CationPi => {
                Box::new(charged::CationPiTester::new(&params.cation_pi))
            }
            InteractionFamily::HalogenBonds => {
                Box::new(halogen_bonds::HalogenBondTester::new(&params.halogen_bonds))
            }
            InteractionFamily::HydrogenBonds => Box::new(hydrogen_bonds::HydrogenBondTester::new(
                &params.hydrogen_bonds,
            )),
            InteractionFamily::WeakHydrogenBonds => Box::new(
                hydrogen_bonds::HydrogenBondTester::weak(&params.weak_hydrogen_bonds),
            ),
            InteractionFamily::Hydrophobic => {
                Box::new(hydrophobic::HydrophobicTester::new(&params.hydrophobic))
            }
            InteractionFamily::MetalCoordination => Box::new(
                metal_coordination::MetalCoordinationTester::new(&params.metal_coordination),
            ),
        }
    }
}

impl fmt::Display for InteractionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InteractionFamily {
    type Err = UnknownFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionFamily::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownFamilyError(s.to_string()))
    }
}
