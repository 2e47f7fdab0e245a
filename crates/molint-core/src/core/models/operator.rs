use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

const IDENTITY_TOLERANCE: f64 = 1e-9;

/// A rigid symmetry operator placing a unit's atoms in the structure frame.
///
/// Operators are named; units sharing an operator name belong to the same
/// symmetry image and may be covalently bonded to each other.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperator {
    pub name: String,
    isometry: Isometry3<f64>,
}

impl Default for SymmetryOperator {
    fn default() -> Self {
        Self::identity()
    }
}

impl SymmetryOperator {
    pub fn identity() -> Self {
        Self {
            name: "1_555".to_string(),
            isometry: Isometry3::identity(),
        }
    }

    pub fn new(name: &str, isometry: Isometry3<f64>) -> Self {
        Self {
            name: name.to_string(),
            isometry,
        }
    }

    pub fn from_translation(name: &str, translation: Vector3<f64>) -> Self {
        Self::new(
            name,
            Isometry3::from_parts(Translation3::from(translation), UnitQuaternion::identity()),
        )
    }

    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.isometry
    }

    /// The homogeneous 4x4 matrix of the operator.
    pub fn matrix(&self) -> Matrix4<f64> {
        self.isometry.to_homogeneous()
    }

    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}^-1", self.name),
            isometry: self.isometry.inverse(),
        }
    }

    /// Returns the operator that applies `self` first and then `other`.
    pub fn then(&self, other: &SymmetryOperator) -> Self {
        Self {
            name: format!("{}*{}", other.name, self.name),
            isometry: other.isometry * self.isometry,
        }
    }

    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.isometry.transform_point(point)
    }

    #[inline]
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.isometry.transform_vector(vector)
    }

    pub fn is_identity(&self) -> bool {
        self.isometry.translation.vector.norm() < IDENTITY_TOLERANCE
            && self.isometry.rotation.angle() < IDENTITY_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn identity_leaves_points_unchanged() {
        let op = SymmetryOperator::identity();
        let p = Point3::new(1.0, -2.0, 3.5);
        assert_eq!(op.apply(&p), p);
        assert!(op.is_identity());
    }

    #[test]
    fn inverse_undoes_the_operator() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 1.2);
        let op = SymmetryOperator::new(
            "2_565",
            Isometry3::from_parts(Translation3::new(4.0, 5.0, -1.0), rotation),
        );
        let p = Point3::new(0.3, 0.7, 2.0);
        let back = op.inverse().apply(&op.apply(&p));
        assert!((back - p).norm() < TOLERANCE);
        assert!(!op.is_identity());
    }

    #[test]
    fn then_composes_in_application_order() {
        let shift = SymmetryOperator::from_translation("a", Vector3::new(1.0, 0.0, 0.0));
        let rotate = SymmetryOperator::new(
            "b",
            Isometry3::rotation(Vector3::z() * std::f64::consts::FRAC_PI_2),
        );
        let combined = shift.then(&rotate);
        let p = Point3::origin();
        let expected = rotate.apply(&shift.apply(&p));
        assert!((combined.apply(&p) - expected).norm() < TOLERANCE);
        assert!((expected - Point3::new(0.0, 1.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn matrix_matches_apply() {
        let op = SymmetryOperator::from_translation("t", Vector3::new(1.0, 2.0, 3.0));
        let m = op.matrix();
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[(1, 3)], 2.0);
        assert_eq!(m[(2, 3)], 3.0);
    }
}
