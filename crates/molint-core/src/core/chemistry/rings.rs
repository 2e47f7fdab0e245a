use crate::core::models::ids::UnitAtomIndex;
use crate::core::models::structure::Structure;
use crate::core::models::topology::BondOrder;
use crate::core::models::unit::Unit;

const MIN_RING_SIZE: usize = 5;
const MAX_RING_SIZE: usize = 6;

/// Finds the 5- and 6-membered rings of a unit closed entirely by aromatic
/// bonds.
///
/// Each ring is reported once with its members in cycle order, starting at
/// the smallest unit-local index and continuing towards the smaller of its two
/// neighbors. Rings are ordered by their starting atom.
pub fn aromatic_rings(structure: &Structure, unit: &Unit) -> Vec<Vec<UnitAtomIndex>> {
    let mut adjacency: Vec<Vec<UnitAtomIndex>> = vec![Vec::new(); unit.len()];
    for (local, neighbors) in adjacency.iter_mut().enumerate() {
        structure.each_bonded_atom(unit, local, |other, j, order| {
            if order == BondOrder::Aromatic && other.id() == unit.id() {
                neighbors.push(j);
            }
        });
        neighbors.sort_unstable();
    }

    let mut rings = Vec::new();
    let mut path = Vec::with_capacity(MAX_RING_SIZE);
    for start in 0..unit.len() {
        if adjacency[start].len() < 2 {
            continue;
        }
        path.push(start);
        extend_path(start, &adjacency, &mut path, &mut rings);
        path.clear();
    }
    rings
}

fn extend_path(
    start: UnitAtomIndex,
    adjacency: &[Vec<UnitAtomIndex>],
    path: &mut Vec<UnitAtomIndex>,
    rings: &mut Vec<Vec<UnitAtomIndex>>,
) {
    let Some(&last) = path.last() else {
        return;
    };
    for &next in &adjacency[last] {
        if next == start {
            // Keep one of the two traversal directions.
            if path.len() >= MIN_RING_SIZE && path[1] < path[path.len() - 1] {
                rings.push(path.clone());
            }
            continue;
        }
        if next < start || path.len() == MAX_RING_SIZE || path.contains(&next) {
            continue;
        }
        path.push(next);
        extend_path(start, adjacency, path, rings);
        path.pop();
    }
}
