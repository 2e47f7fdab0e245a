use super::features::{FeatureIndex, Features};
use super::links::InteractionType;
use super::links::inter::{InterUnitLinks, UnitPairLinks};
use super::links::intra::IntraUnitLinks;
use crate::core::models::ids::{UnitAtomIndex, UnitId};
use slotmap::SecondaryMap;
use std::collections::BTreeMap;

/// The complete, immutable result of one interaction computation.
///
/// Per-unit features and intra-unit links are keyed by unit id; inter-unit
/// links are stored once per unit pair. All accessors skip edges that
/// refinement filtered unless stated otherwise.
#[derive(Debug, Clone)]
pub struct Interactions {
    unit_features: SecondaryMap<UnitId, Features>,
    unit_links: SecondaryMap<UnitId, IntraUnitLinks>,
    links: InterUnitLinks,
    fingerprint: u64,
}

impl Interactions {
    pub(crate) fn new(
        unit_features: SecondaryMap<UnitId, Features>,
        unit_links: SecondaryMap<UnitId, IntraUnitLinks>,
        links: InterUnitLinks,
        fingerprint: u64,
    ) -> Self {
        Self {
            unit_features,
            unit_links,
            links,
            fingerprint,
        }
    }

    pub fn features(&self, unit: UnitId) -> Option<&Features> {
        self.unit_features.get(unit)
    }

    pub fn intra_links(&self, unit: UnitId) -> Option<&IntraUnitLinks> {
        self.unit_links.get(unit)
    }

    pub fn inter_links(&self) -> &InterUnitLinks {
        &self.links
    }

    pub fn intra_type(
        &self,
        unit: UnitId,
        feature_a: FeatureIndex,
        feature_b: FeatureIndex,
    ) -> Option<InteractionType> {
        self.unit_links.get(unit)?.get_type(feature_a, feature_b)
    }

    pub fn inter_type(
        &self,
        unit_a: UnitId,
        feature_a: FeatureIndex,
        unit_b: UnitId,
        feature_b: FeatureIndex,
    ) -> Option<InteractionType> {
        self.links.get_type(unit_a, feature_a, unit_b, feature_b)
    }

    /// Interaction types linking any feature of `atom_a` to any feature of
    /// `atom_b`, both unit-local atoms of `unit`. Sorted, without duplicates.
    pub fn atom_interactions(
        &self,
        unit: UnitId,
        atom_a: UnitAtomIndex,
        atom_b: UnitAtomIndex,
    ) -> Vec<InteractionType> {
        let (Some(features), Some(links)) = (self.unit_features.get(unit), self.unit_links.get(unit))
        else {
            return Vec::new();
        };
        let index = features.elements_index();
        let mut types: Vec<InteractionType> = index
            .features_of(atom_a)
            .iter()
            .flat_map(|&fa| {
                index
                    .features_of(atom_b)
                    .iter()
                    .filter_map(move |&fb| links.get_type(fa as usize, fb as usize))
            })
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    /// Edges between two units, oriented so that `a` indexes features of
    /// `unit_a`.
    pub fn unit_pair_links(
        &self,
        unit_a: UnitId,
        unit_b: UnitId,
    ) -> impl Iterator<Item = (FeatureIndex, FeatureIndex, InteractionType)> + '_ {
        self.links
            .unit_pair(unit_a, unit_b)
            .into_iter()
            .flat_map(|(pair, swapped)| {
                pair.edges().map(move |e| {
                    let (a, b) = if swapped { (e.b, e.a) } else { (e.a, e.b) };
                    (a as usize, b as usize, e.interaction)
                })
            })
    }

    pub fn links_touching(&self, unit: UnitId) -> impl Iterator<Item = &UnitPairLinks> {
        self.links.links_touching(unit)
    }

    /// Number of unfiltered edges, intra and inter.
    pub fn count(&self) -> usize {
        self.summary().values().sum()
    }

    /// Unfiltered edge counts per interaction type.
    pub fn summary(&self) -> BTreeMap<InteractionType, usize> {
        let mut counts = BTreeMap::new();
        let intra = self.unit_links.values().flat_map(|l| l.edges().map(|e| e.interaction));
        let inter = self
            .links
            .pairs()
            .iter()
            .flat_map(|p| p.edges().map(|e| e.interaction));
        for interaction in intra.chain(inter) {
            *counts.entry(interaction).or_insert(0) += 1;
        }
        counts
    }

    /// Combined hash of the structure and parameters this result was computed from.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}
