use crate::core::models::ids::UnitId;
use crate::core::models::structure::Structure;
use itertools::Itertools;

/// A pair of units whose operated bounding spheres come within the search
/// radius. `unit_a` precedes `unit_b` in structure unit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitPair {
    pub unit_a: UnitId,
    pub unit_b: UnitId,
}

/// Finds every unordered pair of distinct units that may hold atoms within
/// `max_radius` of each other. Pairs are reported once, in unit order.
pub fn find_unit_pairs(structure: &Structure, max_radius: f64) -> Vec<UnitPair> {
    let spheres: Vec<_> = structure
        .units()
        .map(|unit| (unit.id(), unit.global_boundary()))
        .collect();

    spheres
        .iter()
        .tuple_combinations()
        .filter(|((_, a), (_, b))| a.intersects(b, max_radius))
        .map(|((unit_a, _), (unit_b, _))| UnitPair {
            unit_a: *unit_a,
            unit_b: *unit_b,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::models::model::ModelBuilder;
    use crate::core::models::operator::SymmetryOperator;
    use nalgebra::{Point3, Vector3};
    use std::sync::Arc;

    fn single_atom_structure(translations: &[f64]) -> Structure {
        let mut builder = ModelBuilder::new();
        builder.start_chain('A').start_residue(1, "HOH").unwrap();
        builder
            .add_atom(Atom::new("O", Element::O, Point3::origin()))
            .unwrap();
        let mut structure = Structure::new(Arc::new(builder.build()));
        for (i, &dx) in translations.iter().enumerate() {
            let name = format!("{}_555", i + 1);
            structure
                .add_unit(
                    vec![0],
                    SymmetryOperator::from_translation(&name, Vector3::new(dx, 0.0, 0.0)),
                )
                .unwrap();
        }
        structure
    }

    #[test]
    fn finds_only_nearby_images() {
        let structure = single_atom_structure(&[0.0, 3.0, 20.0]);
        let ids = structure.unit_ids().to_vec();
        let pairs = find_unit_pairs(&structure, 4.0);
        assert_eq!(
            pairs,
            vec![UnitPair {
                unit_a: ids[0],
                unit_b: ids[1]
            }]
        );
    }

    #[test]
    fn pairs_are_unordered_and_never_self() {
        let structure = single_atom_structure(&[0.0, 1.0, 2.0]);
        let pairs = find_unit_pairs(&structure, 5.0);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.unit_a != p.unit_b));
    }
}
