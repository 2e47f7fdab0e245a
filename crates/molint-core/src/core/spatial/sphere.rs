use crate::core::models::operator::SymmetryOperator;
use nalgebra::Point3;

/// A sphere enclosing a point set, used for coarse pruning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 0.0,
        }
    }
}

impl BoundingSphere {
    /// Builds a sphere centered on the centroid that reaches the farthest point.
    ///
    /// An empty point set yields a zero-radius sphere at the origin.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
        I::IntoIter: Clone,
    {
        let iter = points.into_iter();
        let mut count = 0usize;
        let mut sum = Point3::origin().coords;
        for p in iter.clone() {
            sum += p.coords;
            count += 1;
        }
        if count == 0 {
            return Self::default();
        }
        let center = Point3::from(sum / count as f64);
        let radius_sq = iter
            .map(|p| (p - center).norm_squared())
            .fold(0.0f64, f64::max);
        Self {
            center,
            radius: radius_sq.sqrt(),
        }
    }

    pub fn transformed(&self, operator: &SymmetryOperator) -> Self {
        Self {
            center: operator.apply(&self.center),
            radius: self.radius,
        }
    }

    /// Whether the two spheres come within `margin` of each other.
    pub fn intersects(&self, other: &BoundingSphere, margin: f64) -> bool {
        let reach = self.radius + other.radius + margin;
        (self.center - other.center).norm_squared() <= reach * reach
    }

    /// Whether `point` lies within `margin` of the sphere surface or inside it.
    pub fn contains_within(&self, point: &Point3<f64>, margin: f64) -> bool {
        let reach = self.radius + margin;
        (point - self.center).norm_squared() <= reach * reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn from_points_centers_on_centroid_and_reaches_farthest_point() {
        let points = [
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let sphere = BoundingSphere::from_points(&points);
        assert!((sphere.center - Point3::new(0.0, 1.0, 0.0)).norm() < TOLERANCE);
        assert!((sphere.radius - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn empty_point_set_gives_degenerate_sphere() {
        let sphere = BoundingSphere::from_points(&[]);
        assert_eq!(sphere, BoundingSphere::default());
    }

    #[test]
    fn intersects_respects_margin() {
        let a = BoundingSphere {
            center: Point3::origin(),
            radius: 1.0,
        };
        let b = BoundingSphere {
            center: Point3::new(5.0, 0.0, 0.0),
            radius: 1.0,
        };
        assert!(!a.intersects(&b, 2.5));
        assert!(a.intersects(&b, 3.0));
    }

    #[test]
    fn transformed_moves_center_only() {
        let a = BoundingSphere {
            center: Point3::new(1.0, 1.0, 1.0),
            radius: 2.0,
        };
        let op = SymmetryOperator::from_translation("t", Vector3::new(0.0, 0.0, 10.0));
        let moved = a.transformed(&op);
        assert_eq!(moved.center, Point3::new(1.0, 1.0, 11.0));
        assert_eq!(moved.radius, 2.0);
        assert!(moved.contains_within(&Point3::new(1.0, 1.0, 14.0), 1.0));
        assert!(!moved.contains_within(&Point3::new(1.0, 1.0, 14.0), 0.5));
    }
}
