use crate::core::models::ids::UnitAtomIndex;
use crate::core::models::structure::Structure;
use crate::core::models::unit::Unit;
use nalgebra::{Point3, Vector3};

const DEGENERATE_LENGTH_SQ: f64 = 1e-12;

/// Angle in radians between two vectors, `0.0` if either is degenerate.
pub fn vector_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    if a.norm_squared() < DEGENERATE_LENGTH_SQ || b.norm_squared() < DEGENERATE_LENGTH_SQ {
        return 0.0;
    }
    a.angle(b)
}

/// Angle `a-vertex-b` in radians.
pub fn angle(a: &Point3<f64>, vertex: &Point3<f64>, b: &Point3<f64>) -> f64 {
    vector_angle(&(a - vertex), &(b - vertex))
}

/// Angles `neighbor-A···B` for every atom bonded to A.
///
/// All positions are taken in the structure frame, so A and B may live in
/// different (symmetry-related) units. Hydrogen neighbors are skipped when
/// `ignore_hydrogens` is set.
pub fn calc_angles(
    structure: &Structure,
    unit_a: &Unit,
    index_a: UnitAtomIndex,
    unit_b: &Unit,
    index_b: UnitAtomIndex,
    ignore_hydrogens: bool,
) -> Vec<f64> {
    let pos_a = unit_a.position(index_a);
    let pos_b = unit_b.position(index_b);
    let mut angles = Vec::new();
    structure.each_bonded_atom(unit_a, index_a, |other, j, _| {
        if ignore_hydrogens && other.element(j).is_hydrogen() {
            return;
        }
        angles.push(angle(&other.position(j), &pos_a, &pos_b));
    });
    angles
}

/// Angles `H-A···B` for every hydrogen bonded to A.
pub fn calc_hydrogen_angles(
    structure: &Structure,
    unit_a: &Unit,
    index_a: UnitAtomIndex,
    unit_b: &Unit,
    index_b: UnitAtomIndex,
) -> Vec<f64> {
    let pos_a = unit_a.position(index_a);
    let pos_b = unit_b.position(index_b);
    let mut angles = Vec::new();
    structure.each_bonded_atom(unit_a, index_a, |other, j, _| {
        if other.element(j).is_hydrogen() {
            angles.push(angle(&other.position(j), &pos_a, &pos_b));
        }
    });
    angles
}

/// Out-of-plane angle in radians of the A→B direction relative to the plane
/// spanned by A's first two heavy neighbors.
///
/// Returns `None` when A has fewer than two heavy neighbors.
pub fn calc_plane_angle(
    structure: &Structure,
    unit_a: &Unit,
    index_a: UnitAtomIndex,
    unit_b: &Unit,
    index_b: UnitAtomIndex,
) -> Option<f64> {
    let pos_a = unit_a.position(index_a);
    let mut neighbors: Vec<Point3<f64>> = Vec::with_capacity(2);
    structure.each_bonded_atom(unit_a, index_a, |other, j, _| {
        if neighbors.len() < 2 && !other.element(j).is_hydrogen() {
            neighbors.push(other.position(j));
        }
    });
    let [n1, n2] = neighbors.as_slice() else {
        return None;
    };
    let normal = (n1 - pos_a).cross(&(n2 - pos_a));
    if normal.norm_squared() < DEGENERATE_LENGTH_SQ {
        return None;
    }
    let to_b = unit_b.position(index_b) - pos_a;
    Some((std::f64::consts::FRAC_PI_2 - vector_angle(&normal, &to_b)).abs())
}

/// Normal of the plane through three points, if they are not collinear.
pub fn plane_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Vector3<f64>> {
    let normal = (b - a).cross(&(c - a));
    (normal.norm_squared() >= DEGENERATE_LENGTH_SQ).then(|| normal.normalize())
}

/// Distance of `point` from the line through `origin` along unit `normal`,
/// i.e. its in-plane offset relative to a plane with that normal.
pub fn plane_offset(origin: &Point3<f64>, normal: &Vector3<f64>, point: &Point3<f64>) -> f64 {
    let v = point - origin;
    let along = v.dot(normal);
    (v.norm_squared() - along * along).max(0.0).sqrt()
}
