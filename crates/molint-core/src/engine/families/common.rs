use crate::core::models::structure::Structure;
use crate::engine::features::FeatureInfo;

/// Pair checks shared by every tester.
///
/// Rejects a pair whose representative atoms are the same atom, belong to
/// different alternate conformers, sit in the same residue of one unit, or
/// share a covalent bond.
pub fn valid_pair(structure: &Structure, a: &FeatureInfo<'_>, b: &FeatureInfo<'_>) -> bool {
    let (atom_a, atom_b) = (a.atom(), b.atom());
    let same_unit = a.unit.id() == b.unit.id();
    if same_unit && atom_a == atom_b {
        return false;
    }
    if let (Some(alt_a), Some(alt_b)) = (a.unit.alt_loc(atom_a), b.unit.alt_loc(atom_b))
        && alt_a != alt_b
    {
        return false;
    }
    if same_unit && a.unit.residue_index(atom_a) == b.unit.residue_index(atom_b) {
        return false;
    }
    !structure.are_bonded(a.unit, atom_a, b.unit, atom_b)
}

/// Every member pair of two features within `distance_max` of each other.
pub fn any_member_within(a: &FeatureInfo<'_>, b: &FeatureInfo<'_>, distance_max: f64) -> bool {
    let limit = distance_max * distance_max;
    a.members().iter().any(|&m| {
        let pa = a.unit.position(m as usize);
        b.members()
            .iter()
            .any(|&n| (b.unit.position(n as usize) - pa).norm_squared() <= limit)
    })
}
