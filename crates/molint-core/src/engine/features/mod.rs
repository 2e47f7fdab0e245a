//! Per-unit chemical feature sites stored in columnar form.
//!
//! A [`Features`] value is produced once per unit by a [`builder::FeaturesBuilder`]
//! and is read-only afterwards. Besides the feature columns it carries two
//! derived indexes built eagerly at freeze time: a spatial lookup over the
//! feature centers and an [`ElementsIndex`] mapping atoms back to features.

pub mod builder;

use crate::core::models::ids::{UnitAtomIndex, UnitId};
use crate::core::models::unit::Unit;
use crate::core::spatial::lookup::Lookup3d;
use crate::engine::error::EngineError;
use nalgebra::Point3;
use std::fmt;

pub type FeatureIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FeatureType {
    #[default]
    None,
    PositiveCharge,
    NegativeCharge,
    AromaticRing,
    HydrogenDonor,
    HydrogenAcceptor,
    HalogenDonor,
    HalogenAcceptor,
    HydrophobicAtom,
    WeakHydrogenDonor,
    WeakHydrogenAcceptor,
    IonicTypePartner,
    DativeBondPartner,
    TransitionMetal,
    IonicTypeMetal,
}

impl FeatureType {
    pub fn name(self) -> &'static str {
        match self {
            FeatureType::None => "none",
            FeatureType::PositiveCharge => "positive-charge",
            FeatureType::NegativeCharge => "negative-charge",
            FeatureType::AromaticRing => "aromatic-ring",
            FeatureType::HydrogenDonor => "hydrogen-donor",
            FeatureType::HydrogenAcceptor => "hydrogen-acceptor",
            FeatureType::HalogenDonor => "halogen-donor",
            FeatureType::HalogenAcceptor => "halogen-acceptor",
            FeatureType::HydrophobicAtom => "hydrophobic-atom",
            FeatureType::WeakHydrogenDonor => "weak-hydrogen-donor",
            FeatureType::WeakHydrogenAcceptor => "weak-hydrogen-acceptor",
            FeatureType::IonicTypePartner => "ionic-type-partner",
            FeatureType::DativeBondPartner => "dative-bond-partner",
            FeatureType::TransitionMetal => "transition-metal",
            FeatureType::IonicTypeMetal => "ionic-type-metal",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-pattern that produced a feature, shared across feature types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FeatureGroup {
    #[default]
    None,
    QuaternaryAmine,
    TertiaryAmine,
    Sulfonium,
    SulfonicAcid,
    Sulfate,
    Phosphate,
    Halocarbon,
    Guanidine,
    Acetamidine,
    Carboxylate,
}

/// Reverse index from unit-local atoms to the features they belong to.
///
/// Stored as a compressed row: the features of atom `i` are
/// `indices[offsets[i]..offsets[i + 1]]`, in increasing feature order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementsIndex {
    offsets: Vec<u32>,
    indices: Vec<u32>,
}

impl ElementsIndex {
    fn build(elements_count: usize, offsets: &[u32], members: &[u32]) -> Self {
        let mut counts = vec![0u32; elements_count + 1];
        for &m in members {
            if let Some(c) = counts.get_mut(m as usize + 1) {
                *c += 1;
            }
        }
        for i in 1..counts.len() {
            counts[i] += counts[i - 1];
        }

        let mut fill = counts.clone();
        let mut indices = vec![0u32; counts[elements_count] as usize];
        for feature in 0..offsets.len().saturating_sub(1) {
            let range = offsets[feature] as usize..offsets[feature + 1] as usize;
            for &m in &members[range] {
                if (m as usize) < elements_count {
                    let slot = &mut fill[m as usize];
                    indices[*slot as usize] = feature as u32;
                    *slot += 1;
                }
            }
        }
        Self {
            offsets: counts,
            indices,
        }
    }

    /// Features containing `atom`; empty for atoms outside the indexed range.
    pub fn features_of(&self, atom: UnitAtomIndex) -> &[u32] {
        match (self.offsets.get(atom), self.offsets.get(atom + 1)) {
            (Some(&start), Some(&end)) => &self.indices[start as usize..end as usize],
            _ => &[],
        }
    }

    pub fn elements_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }
}

/// The frozen feature set of one unit.
///
/// Centers are in the unit's invariant frame (operator not applied).
#[derive(Debug, Clone)]
pub struct Features {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    types: Vec<FeatureType>,
    groups: Vec<FeatureGroup>,
    offsets: Vec<u32>,
    members: Vec<u32>,
    lookup: Lookup3d,
    elements_index: ElementsIndex,
}

impl Features {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_columns(
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
        types: Vec<FeatureType>,
        groups: Vec<FeatureGroup>,
        offsets: Vec<u32>,
        members: Vec<u32>,
        elements_count: usize,
    ) -> Self {
        let lookup = Lookup3d::from_columns(&x, &y, &z);
        let elements_index = ElementsIndex::build(elements_count, &offsets, &members);
        Self {
            x,
            y,
            z,
            types,
            groups,
            offsets,
            members,
            lookup,
            elements_index,
        }
    }

    pub fn empty() -> Self {
        Self::from_columns(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![0],
            Vec::new(),
            0,
        )
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn types(&self) -> &[FeatureType] {
        &self.types
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn all_members(&self) -> &[u32] {
        &self.members
    }

    #[inline]
    pub fn center(&self, feature: FeatureIndex) -> Point3<f64> {
        Point3::new(self.x[feature], self.y[feature], self.z[feature])
    }

    #[inline]
    pub fn feature_type(&self, feature: FeatureIndex) -> FeatureType {
        self.types[feature]
    }

    #[inline]
    pub fn group(&self, feature: FeatureIndex) -> FeatureGroup {
        self.groups[feature]
    }

    /// Unit-local atom indices of a feature, in the order they were pushed.
    #[inline]
    pub fn members(&self, feature: FeatureIndex) -> &[u32] {
        &self.members[self.offsets[feature] as usize..self.offsets[feature + 1] as usize]
    }

    pub fn lookup(&self) -> &Lookup3d {
        &self.lookup
    }

    pub fn elements_index(&self) -> &ElementsIndex {
        &self.elements_index
    }

    /// Features the unit-local atom takes part in.
    pub fn features_of_atom(&self, atom: UnitAtomIndex) -> &[u32] {
        self.elements_index.features_of(atom)
    }

    /// Checks the columnar invariants against the unit the features belong to.
    pub fn validate(&self, unit: UnitId, elements_count: usize) -> Result<(), EngineError> {
        let fail = |reason: String| EngineError::InconsistentFeatures { unit, reason };
        let n = self.types.len();
        if self.x.len() != n || self.y.len() != n || self.z.len() != n || self.groups.len() != n
        {
            return Err(fail("feature columns differ in length".to_string()));
        }
        if self.offsets.len() != n + 1 || self.offsets.first() != Some(&0) {
            return Err(fail(format!(
                "expected {} offsets starting at 0, found {}",
                n + 1,
                self.offsets.len()
            )));
        }
        if self.offsets.windows(2).any(|w| w[1] <= w[0]) {
            return Err(fail("every feature needs at least one member".to_string()));
        }
        if self.offsets.last().map(|&o| o as usize) != Some(self.members.len()) {
            return Err(fail("offsets do not cover the members array".to_string()));
        }
        if let Some(&m) = self.members.iter().find(|&&m| m as usize >= elements_count) {
            return Err(fail(format!(
                "member atom {m} outside a unit of {elements_count} atoms"
            )));
        }
        if self.elements_index.elements_count() != elements_count {
            return Err(fail("elements index sized for a different unit".to_string()));
        }
        Ok(())
    }
}

/// A view of one feature together with the unit and feature set it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct FeatureInfo<'a> {
    pub unit: &'a Unit,
    pub features: &'a Features,
    pub feature: FeatureIndex,
}

impl<'a> FeatureInfo<'a> {
    pub fn new(unit: &'a Unit, features: &'a Features, feature: FeatureIndex) -> Self {
        Self {
            unit,
            features,
            feature,
        }
    }

    #[inline]
    pub fn feature_type(&self) -> FeatureType {
        self.features.feature_type(self.feature)
    }

    #[inline]
    pub fn group(&self) -> FeatureGroup {
        self.features.group(self.feature)
    }

    #[inline]
    pub fn members(&self) -> &'a [u32] {
        self.features.members(self.feature)
    }

    /// The first member atom, used for single-atom geometry and pair checks.
    #[inline]
    pub fn atom(&self) -> UnitAtomIndex {
        self.members()[0] as usize
    }

    /// Feature center in the structure frame.
    pub fn center(&self) -> Point3<f64> {
        self.unit.operator().apply(&self.features.center(self.feature))
    }
}
