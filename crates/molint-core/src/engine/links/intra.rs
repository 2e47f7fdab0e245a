use super::{InteractionFlag, InteractionType};
use crate::engine::features::FeatureIndex;

/// An undirected edge between two features of the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraEdge {
    pub a: u32,
    pub b: u32,
    pub interaction: InteractionType,
    pub flag: InteractionFlag,
}

impl IntraEdge {
    pub fn is_filtered(&self) -> bool {
        self.flag == InteractionFlag::Filtered
    }
}

#[derive(Debug, Default)]
pub struct IntraLinksBuilder {
    feature_count: usize,
    edges: Vec<IntraEdge>,
}

impl IntraLinksBuilder {
    pub fn new(feature_count: usize) -> Self {
        Self {
            feature_count,
            edges: Vec::new(),
        }
    }

    /// Records an edge; callers never pass `a == b`.
    pub fn add(&mut self, a: FeatureIndex, b: FeatureIndex, interaction: InteractionType) {
        debug_assert_ne!(a, b, "intra-unit self link");
        self.edges.push(IntraEdge {
            a: a as u32,
            b: b as u32,
            interaction,
            flag: InteractionFlag::None,
        });
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Builds the adjacency in two passes: count degrees, then fill.
    pub fn get_links(self) -> IntraUnitLinks {
        let n = self.feature_count;
        let mut offsets = vec![0u32; n + 1];
        for edge in &self.edges {
            offsets[edge.a as usize + 1] += 1;
            offsets[edge.b as usize + 1] += 1;
        }
        for i in 1..=n {
            offsets[i] += offsets[i - 1];
        }

        let total = offsets[n] as usize;
        let mut neighbors = vec![0u32; total];
        let mut edge_ids = vec![0u32; total];
        let mut fill: Vec<u32> = offsets[..n].to_vec();
        for (id, edge) in self.edges.iter().enumerate() {
            for (from, to) in [(edge.a, edge.b), (edge.b, edge.a)] {
                let slot = &mut fill[from as usize];
                neighbors[*slot as usize] = to;
                edge_ids[*slot as usize] = id as u32;
                *slot += 1;
            }
        }

        IntraUnitLinks {
            offsets,
            neighbors,
            edge_ids,
            edges: self.edges,
        }
    }
}

/// Compressed adjacency over the features of one unit.
///
/// Edges keep their insertion order; each vertex lists its neighbors in the
/// order the edges touching it were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntraUnitLinks {
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
    edge_ids: Vec<u32>,
    edges: Vec<IntraEdge>,
}

impl IntraUnitLinks {
    pub fn vertex_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Number of edges, filtered ones included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: usize) -> Option<&IntraEdge> {
        self.edges.get(id)
    }

    /// Unfiltered edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &IntraEdge> {
        self.edges.iter().filter(|e| !e.is_filtered())
    }

    pub fn all_edges(&self) -> &[IntraEdge] {
        &self.edges
    }

    /// `(neighbor, edge id)` pairs of a feature, filtered edges included.
    pub fn neighbors(&self, feature: FeatureIndex) -> impl Iterator<Item = (FeatureIndex, usize)> + '_ {
        let range = match (self.offsets.get(feature), self.offsets.get(feature + 1)) {
            (Some(&start), Some(&end)) => start as usize..end as usize,
            _ => 0..0,
        };
        self.neighbors[range.clone()]
            .iter()
            .zip(&self.edge_ids[range])
            .map(|(&n, &e)| (n as usize, e as usize))
    }

    pub fn degree(&self, feature: FeatureIndex) -> usize {
        self.neighbors(feature).count()
    }

    pub fn edge_between(&self, a: FeatureIndex, b: FeatureIndex) -> Option<usize> {
        self.neighbors(a).find(|&(n, _)| n == b).map(|(_, e)| e)
    }

    /// Interaction type of the unfiltered edge between two features.
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
