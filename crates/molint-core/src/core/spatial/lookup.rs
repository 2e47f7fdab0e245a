use super::sphere::BoundingSphere;
use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::fmt;

/// Neighbors returned by [`Lookup3d::find`], ordered by increasing squared
/// distance and then by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupResult {
    pub count: usize,
    pub indices: Vec<usize>,
    pub squared_distances: Vec<f64>,
}

/// Radius queries over a fixed point set, backed by a balanced, immutable
/// k-d tree. Any number of points may share a coordinate value.
#[derive(Clone)]
pub struct Lookup3d {
    tree: Option<ImmutableKdTree<f64, 3>>,
    len: usize,
    boundary: BoundingSphere,
}

impl fmt::Debug for Lookup3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup3d")
            .field("len", &self.len)
            .field("boundary", &self.boundary)
            .finish()
    }
}

impl Lookup3d {
    pub fn new(points: &[Point3<f64>]) -> Self {
        let coords: Vec<[f64; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
        let tree = (!coords.is_empty()).then(|| ImmutableKdTree::new_from_slice(&coords));
        Self {
            tree,
            len: points.len(),
            boundary: BoundingSphere::from_points(points),
        }
    }

    /// Builds a lookup from columnar coordinates of equal length.
    pub fn from_columns(x: &[f64], y: &[f64], z: &[f64]) -> Self {
        let points: Vec<Point3<f64>> = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((&x, &y), &z)| Point3::new(x, y, z))
            .collect();
        Self::new(&points)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn boundary(&self) -> &BoundingSphere {
        &self.boundary
    }

    /// Finds every point within `radius` (inclusive) of `(x, y, z)`.
    pub fn find(&self, x: f64, y: f64, z: f64, radius: f64) -> LookupResult {
        let Some(tree) = &self.tree else {
            return LookupResult::default();
        };
        if radius < 0.0 {
            return LookupResult::default();
        }
        let radius_sq = radius * radius;
        // The tree compares with a strict bound; widen it and filter inclusively.
        let search_sq = radius_sq + radius_sq.max(1.0) * 1e-9;
        let mut hits: Vec<(f64, usize)> = tree
            .within_unsorted::<SquaredEuclidean>(&[x, y, z], search_sq)
            .into_iter()
            .filter(|n| n.distance <= radius_sq)
            .map(|n| (n.distance, n.item as usize))
            .collect();
        hits.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let (squared_distances, indices): (Vec<f64>, Vec<usize>) = hits.into_iter().unzip();
        LookupResult {
            count: indices.len(),
            indices,
            squared_distances,
        }
    }
}
