use super::{InteractionFlag, InteractionType};
use crate::core::models::ids::UnitId;
use crate::engine::features::FeatureIndex;
use slotmap::SecondaryMap;
use std::collections::{HashMap, HashSet};

/// An edge between feature `a` of `unit_a` and feature `b` of `unit_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterEdge {
    pub a: u32,
    pub b: u32,
    pub interaction: InteractionType,
    pub flag: InteractionFlag,
}

impl InterEdge {
    pub fn is_filtered(&self) -> bool {
        self.flag == InteractionFlag::Filtered
    }
}

/// All accepted edges between one ordered pair of units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPairLinks {
    pub unit_a: UnitId,
    pub unit_b: UnitId,
    edges: Vec<InterEdge>,
    by_a: HashMap<u32, Vec<u32>>,
    by_b: HashMap<u32, Vec<u32>>,
    bonded_a: Vec<u32>,
    bonded_b: Vec<u32>,
}

impl UnitPairLinks {
    /// Number of edges, filtered ones included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Unfiltered edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &InterEdge> {
        self.edges.iter().filter(|e| !e.is_filtered())
    }

    pub fn all_edges(&self) -> &[InterEdge] {
        &self.edges
    }

    /// Features of `unit_a` with at least one edge, in increasing order.
    pub fn bonded_features_a(&self) -> &[u32] {
        &self.bonded_a
    }

    /// Features of `unit_b` with at least one edge, in increasing order.
    pub fn bonded_features_b(&self) -> &[u32] {
        &self.bonded_b
    }

    pub fn is_bonded_a(&self, feature: FeatureIndex) -> bool {
        self.bonded_a.binary_search(&(feature as u32)).is_ok()
    }

    pub fn is_bonded_b(&self, feature: FeatureIndex) -> bool {
        self.bonded_b.binary_search(&(feature as u32)).is_ok()
    }

    /// Edge ids touching feature `a` of `unit_a`.
    pub fn edges_of_a(&self, feature: FeatureIndex) -> &[u32] {
        self.by_a.get(&(feature as u32)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Edge ids touching feature `b` of `unit_b`.
    pub fn edges_of_b(&self, feature: FeatureIndex) -> &[u32] {
        self.by_b.get(&(feature as u32)).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edge_between(&self, a: FeatureIndex, b: FeatureIndex) -> Option<usize> {
        self.edges_of_a(a)
            .iter()
            .map(|&e| e as usize)
            .find(|&e| self.edges[e].b as usize == b)
    }

    pub fn get_type(&self, a: FeatureIndex, b: FeatureIndex) -> Option<InteractionType> {
        self.edge_between(a, b)
            .map(|e| &self.edges[e])
            .filter(|edge| !edge.is_filtered())
            .map(|edge| edge.interaction)
    }

    pub(crate) fn set_flag(&mut self, id: usize, flag: InteractionFlag) {
        if let Some(edge) = self.edges.get_mut(id) {
            edge.flag = flag;
        }
    }
}

#[derive(Debug)]
struct PairState {
    unit_a: UnitId,
    unit_b: UnitId,
    edges: Vec<InterEdge>,
    by_a: HashMap<u32, Vec<u32>>,
    by_b: HashMap<u32, Vec<u32>>,
    bonded_a: HashSet<u32>,
    bonded_b: HashSet<u32>,
    seen: HashSet<(u32, u32)>,
}

/// Collects inter-unit edges one unit pair at a time.
///
/// Each pair is opened with [`start_unit_pair`](Self::start_unit_pair) and
/// closed with [`finish_unit_pair`](Self::finish_unit_pair); pairs without
/// edges leave no trace in the result.
#[derive(Debug, Default)]
pub struct InterLinksBuilder {
    current: Option<PairState>,
    pairs: Vec<UnitPairLinks>,
}

impl InterLinksBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a unit pair, closing any pair still open.
    pub fn start_unit_pair(&mut self, unit_a: UnitId, unit_b: UnitId) {
        self.finish_unit_pair();
        self.current = Some(PairState {
            unit_a,
            unit_b,
            edges: Vec::new(),
            by_a: HashMap::new(),
            by_b: HashMap::new(),
            bonded_a: HashSet::new(),
            bonded_b: HashSet::new(),
            seen: HashSet::new(),
        });
    }

    /// Adds an edge to the open pair. Repeated `(a, b)` pairs and calls
    /// outside an open pair are ignored.
    pub fn add(&mut self, a: FeatureIndex, b: FeatureIndex, interaction: InteractionType) {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        let (a, b) = (a as u32, b as u32);
        if !state.seen.insert((a, b)) {
            return;
        }
        let id = state.edges.len() as u32;
        state.edges.push(InterEdge {
            a,
            b,
            interaction,
            flag: InteractionFlag::None,
        });
        state.by_a.entry(a).or_default().push(id);
        state.by_b.entry(b).or_default().push(id);
        state.bonded_a.insert(a);
        state.bonded_b.insert(b);
    }

    pub fn finish_unit_pair(&mut self) {
        let Some(state) = self.current.take() else {
            return;
        };
        if state.edges.is_empty() {
            return;
        }
        let mut bonded_a: Vec<u32> = state.bonded_a.into_iter().collect();
        let mut bonded_b: Vec<u32> = state.bonded_b.into_iter().collect();
        bonded_a.sort_unstable();
        bonded_b.sort_unstable();
        self.pairs.push(UnitPairLinks {
            unit_a: state.unit_a,
            unit_b: state.unit_b,
            edges: state.edges,
            by_a: state.by_a,
            by_b: state.by_b,
            bonded_a,
            bonded_b,
        });
    }

    pub fn get_links(mut self) -> InterUnitLinks {
        self.finish_unit_pair();
        InterUnitLinks::new(self.pairs)
    }
}

/// Sparse inter-unit graph: only unit pairs with at least one edge are stored.
#[derive(Debug, Clone, Default)]
pub struct InterUnitLinks {
    pairs: Vec<UnitPairLinks>,
    by_unit: SecondaryMap<UnitId, Vec<usize>>,
    pair_index: HashMap<(UnitId, UnitId), usize>,
}

impl InterUnitLinks {
    fn new(pairs: Vec<UnitPairLinks>) -> Self {
        let mut by_unit: SecondaryMap<UnitId, Vec<usize>> = SecondaryMap::new();
        let mut pair_index = HashMap::with_capacity(pairs.len());
        for (i, pair) in pairs.iter().enumerate() {
            for unit in [pair.unit_a, pair.unit_b] {
                match by_unit.get_mut(unit) {
                    Some(list) => list.push(i),
                    None => {
                        by_unit.insert(unit, vec![i]);
                    }
                }
            }
            pair_index.insert((pair.unit_a, pair.unit_b), i);
        }
        Self {
            pairs,
            by_unit,
            pair_index,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Number of edges over all pairs, filtered ones included.
    pub fn edge_count(&self) -> usize {
        self.pairs.iter().map(UnitPairLinks::edge_count).sum()
    }

    pub fn pairs(&self) -> &[UnitPairLinks] {
        &self.pairs
    }

    /// The stored pair for two units in either order, with `true` when the
    /// stored orientation is `(unit_b, unit_a)`.
    pub fn unit_pair(&self, unit_a: UnitId, unit_b: UnitId) -> Option<(&UnitPairLinks, bool)> {
        if let Some(&i) = self.pair_index.get(&(unit_a, unit_b)) {
            return Some((&self.pairs[i], false));
        }
        self.pair_index
            .get(&(unit_b, unit_a))
            .map(|&i| (&self.pairs[i], true))
    }

    /// Every unit pair record that involves `unit`.
    pub fn links_touching(&self, unit: UnitId) -> impl Iterator<Item = &UnitPairLinks> {
        self.by_unit
            .get(unit)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(move |&i| &self.pairs[i])
    }

    pub fn get_type(
        &self,
        unit_a: UnitId,
        feature_a: FeatureIndex,
        unit_b: UnitId,
        feature_b: FeatureIndex,
    ) -> Option<InteractionType> {
        let (pair, swapped) = self.unit_pair(unit_a, unit_b)?;
        if swapped {
            pair.get_type(feature_b, feature_a)
        } else {
            pair.get_type(feature_a, feature_b)
        }
    }

    pub(crate) fn pairs_mut(&mut self) -> &mut [UnitPairLinks] {
        &mut self.pairs
    }
}
