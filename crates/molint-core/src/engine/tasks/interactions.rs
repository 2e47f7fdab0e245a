use super::{features, links};
use crate::core::models::structure::Structure;
use crate::core::spatial::unit_pairs::find_unit_pairs;
use crate::engine::cache::CacheKey;
use crate::engine::config::InteractionsParams;
use crate::engine::error::EngineError;
use crate::engine::families::{create_testers, enabled_providers};
use crate::engine::interactions::Interactions;
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use crate::engine::refine::refine;
use tracing::{info, instrument};

/// Detects every enabled interaction in `structure`.
///
/// Phases run in a fixed order: features, intra-unit links, inter-unit links,
/// then refinement when enabled. Returns `Ok(None)` if `cancellation` fires
/// before the result is assembled.
#[instrument(skip_all, name = "interactions_task")]
pub fn run(
    structure: &Structure,
    params: &InteractionsParams,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Option<Interactions>, EngineError> {
    params.validate()?;

    let providers = enabled_providers(params);
    let testers = create_testers(params);
    let max_distance = testers
        .iter()
        .map(|tester| tester.max_distance())
        .fold(0.0, f64::max);

    info!(
        units = structure.unit_count(),
        atoms = structure.atom_count(),
        families = testers.len(),
        max_distance,
        "Starting interaction detection."
    );

    reporter.report(Progress::PhaseStart { name: "Features" });
    let Some(unit_features) = features::run(structure, &providers, reporter, cancellation)? else {
        return Ok(cancelled(reporter));
    };
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Intra-unit links",
    });
    let Some(mut unit_links) = links::run_intra(
        structure,
        &unit_features,
        &testers,
        max_distance,
        reporter,
        cancellation,
    )?
    else {
        return Ok(cancelled(reporter));
    };
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Inter-unit links",
    });
    let unit_pairs = find_unit_pairs(structure, max_distance);
    let Some(mut inter_links) = links::run_inter(
        structure,
        &unit_pairs,
        &unit_features,
        &testers,
        max_distance,
        reporter,
        cancellation,
    )?
    else {
        return Ok(cancelled(reporter));
    };
    reporter.report(Progress::PhaseFinish);

    if params.refine {
        reporter.report(Progress::PhaseStart { name: "Refinement" });
        refine(structure, &unit_features, &mut unit_links, &mut inter_links)?;
        reporter.report(Progress::PhaseFinish);
    }

    if cancellation.is_cancelled() {
        return Ok(cancelled(reporter));
    }

    let fingerprint = CacheKey::new(structure, params).combined();
    let interactions = Interactions::new(unit_features, unit_links, inter_links, fingerprint);
    info!(
        interactions = interactions.count(),
        unit_pairs = interactions.inter_links().pair_count(),
        "Interaction detection complete."
    );
    Ok(Some(interactions))
}

fn cancelled<T>(reporter: &ProgressReporter) -> Option<T> {
    info!("Interaction detection cancelled.");
    reporter.report(Progress::Message("Cancelled".to_string()));
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::models::model::{Model, ModelBuilder};
    use crate::core::models::operator::SymmetryOperator;
    use crate::core::models::topology::BondOrder;
    use crate::engine::config::{HydrophobicParams, InteractionsParamsBuilder};
    use crate::engine::families::InteractionFamily;
    use crate::engine::families::common::fixtures::{model, structure};
    use crate::engine::links::InteractionType;
    use nalgebra::{Point3, Vector3};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    fn detect(structure: &Structure, params: &InteractionsParams) -> Interactions {
        run(
            structure,
            params,
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
        .unwrap()
        .unwrap()
    }

    /// Hydroxyl O-H in one residue pointing at a tertiary amine N in another.
    fn hydrogen_bond_pair(distance: f64) -> Structure {
        structure(
            &[
                (
                    "LIG",
                    &[
                        ("C1", Element::C, [-0.477, 1.348, 0.0]),
                        ("O1", Element::O, [0.0, 0.0, 0.0]),
                        ("H1", Element::H, [0.96, 0.0, 0.0]),
                    ],
                ),
                (
                    "LIH",
                    &[
                        ("N1", Element::N, [distance, 0.0, 0.0]),
                        ("C2", Element::C, [distance + 0.5, 1.4, 0.0]),
                        ("C3", Element::C, [distance + 0.5, -0.7, 1.2]),
                        ("C4", Element::C, [distance + 0.5, -0.7, -1.2]),
                    ],
                ),
            ],
            &[
                (0, 1, BondOrder::Single),
                (1, 2, BondOrder::Single),
                (3, 4, BondOrder::Single),
                (3, 5, BondOrder::Single),
                (3, 6, BondOrder::Single),
            ],
        )
    }

    /// Isolated carbons, one residue each, along the x axis.
    fn carbons(xs: &[f64]) -> Model {
        let mut builder = ModelBuilder::new();
        builder.start_chain('A');
        for (i, &x) in xs.iter().enumerate() {
            builder.start_residue(i as isize + 1, "HYD").unwrap();
            builder
                .add_atom(Atom::new("C1", Element::C, Point3::new(x, 0.0, 0.0)))
                .unwrap();
        }
        builder.build()
    }

    fn unrefined() -> InteractionsParams {
        InteractionsParamsBuilder::new().refine(false).build().unwrap()
    }

    #[test]
    fn detects_a_single_hydrogen_bond() {
        let s = hydrogen_bond_pair(2.8);
        let result = detect(&s, &InteractionsParams::default());
        assert_eq!(
            result.summary(),
            BTreeMap::from([(InteractionType::HydrogenBond, 1)])
        );

        let unit = s.unit_ids()[0];
        assert_eq!(
            result.atom_interactions(unit, 1, 3),
            vec![InteractionType::HydrogenBond]
        );
        assert!(result.atom_interactions(unit, 0, 3).is_empty());
    }

    #[test]
    fn distant_atoms_do_not_interact() {
        let s = hydrogen_bond_pair(6.0);
        let result = detect(&s, &InteractionsParams::default());
        assert_eq!(result.count(), 0);
        assert_eq!(result.inter_links().pair_count(), 0);
    }

    #[test]
    fn detection_is_deterministic() {
        let s = Structure::from_model(carbons(&[0.0, 3.0, 6.5, 7.0, 10.2]));
        let params = unrefined();
        let first = detect(&s, &params);
        let second = detect(&s, &params);
        let unit = s.unit_ids()[0];
        assert_eq!(
            first.intra_links(unit).unwrap(),
            second.intra_links(unit).unwrap()
        );
        assert_eq!(first.features(unit).unwrap().x(), second.features(unit).unwrap().x());
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn raising_a_cutoff_never_loses_interactions() {
        let s = Structure::from_model(carbons(&[0.0, 3.4, 7.3, 11.5, 15.0, 19.8]));
        let mut previous = 0;
        for cutoff in [3.0, 3.5, 4.0, 4.5, 5.0] {
            let params = InteractionsParamsBuilder::new()
                .refine(false)
                .hydrophobic(HydrophobicParams {
                    enabled: true,
                    distance_max: cutoff,
                })
                .build()
                .unwrap();
            let count = detect(&s, &params).count();
            assert!(count >= previous, "cutoff {cutoff}: {count} < {previous}");
            previous = count;
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn symmetry_operators_match_pre_transformed_coordinates() {
        let build = |offset: f64| {
            let mut builder = ModelBuilder::new();
            builder.start_chain('A');
            builder.start_residue(1, "HYD").unwrap();
            builder
                .add_atom(Atom::new("C1", Element::C, Point3::origin()))
                .unwrap();
            builder.start_chain('B');
            builder.start_residue(1, "HYD").unwrap();
            builder
                .add_atom(Atom::new("C1", Element::C, Point3::new(3.5 - offset, 0.0, 0.0)))
                .unwrap();
            builder.build()
        };

        let direct = Structure::from_model(build(0.0));

        let mut operated = Structure::new(Arc::new(build(10.0)));
        operated
            .add_unit(vec![0], SymmetryOperator::identity())
            .unwrap();
        operated
            .add_unit(
                vec![1],
                SymmetryOperator::from_translation("2_655", Vector3::new(10.0, 0.0, 0.0)),
            )
            .unwrap();

        let params = unrefined();
        let a = detect(&direct, &params);
        let b = detect(&operated, &params);
        assert_eq!(a.summary(), BTreeMap::from([(InteractionType::Hydrophobic, 1)]));
        assert_eq!(a.summary(), b.summary());

        let ids = operated.unit_ids();
        let links: Vec<_> = b.unit_pair_links(ids[1], ids[0]).collect();
        assert_eq!(links, vec![(0, 0, InteractionType::Hydrophobic)]);
        assert_eq!(b.links_touching(ids[0]).count(), 1);
        assert_eq!(b.inter_type(ids[0], 0, ids[1], 0), Some(InteractionType::Hydrophobic));
    }

    #[test]
    fn no_feature_links_to_itself() {
        let s = Structure::from_model(carbons(&[0.0, 0.0, 3.0]));
        let result = detect(&s, &unrefined());
        let unit = s.unit_ids()[0];
        let links = result.intra_links(unit).unwrap();
        assert!(links.all_edges().iter().all(|e| e.a != e.b));
        assert_eq!(links.edge_count(), 3);
    }

    #[test]
    fn multi_atom_feature_centers_are_centroids() {
        let s = structure(
            &[(
                "ASP",
                &[
                    ("OD1", Element::O, [0.0, 0.0, 0.0]),
                    ("OD2", Element::O, [2.0, 4.0, -2.0]),
                ],
            )],
            &[],
        );
        let result = detect(&s, &InteractionsParams::default());
        let features = result.features(s.unit_ids()[0]).unwrap();
        let carboxylate = (0..features.len())
            .find(|&i| features.members(i).len() == 2)
            .unwrap();
        assert_eq!(features.center(carboxylate), Point3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn cancelled_runs_return_nothing() {
        let s = Structure::from_model(carbons(&[0.0, 3.0]));
        let token = CancellationToken::new();
        token.cancel();
        let result = run(
            &s,
            &InteractionsParams::default(),
            &ProgressReporter::new(),
            &token,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut params = InteractionsParams::default();
        params.hydrophobic.distance_max = 50.0;
        let s = Structure::from_model(carbons(&[0.0]));
        let err = run(
            &s,
            &params,
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }

    #[test]
    fn phases_are_reported_in_order() {
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));
        let s = Structure::from_model(carbons(&[0.0, 3.0]));
        run(
            &s,
            &InteractionsParams::default(),
            &reporter,
            &CancellationToken::new(),
        )
        .unwrap();
        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec!["Features", "Intra-unit links", "Inter-unit links", "Refinement"]
        );
    }

    #[test]
    fn disabled_families_produce_no_links() {
        let s = Structure::from_model(carbons(&[0.0, 3.0]));
        let params = InteractionsParamsBuilder::new()
            .disable(InteractionFamily::Hydrophobic)
            .build()
            .unwrap();
        let result = detect(&s, &params);
        assert_eq!(result.count(), 0);
        assert!(result.features(s.unit_ids()[0]).unwrap().is_empty());
    }

    #[test]
    fn refinement_keeps_the_shortest_hydrophobic_contact_per_residue_pair() {
        let s = structure(
            &[
                (
                    "LIG",
                    &[
                        ("C1", Element::C, [0.0, 0.0, 0.0]),
                        ("C2", Element::C, [0.0, 1.5, 0.0]),
                    ],
                ),
                (
                    "LIH",
                    &[
                        ("C1", Element::C, [3.5, 0.0, 0.0]),
                        ("C2", Element::C, [3.6, 1.5, 0.0]),
                    ],
                ),
            ],
            &[(0, 1, BondOrder::Single), (2, 3, BondOrder::Single)],
        );
        let unit = s.unit_ids()[0];

        let raw = detect(&s, &unrefined());
        assert_eq!(raw.count(), 4);

        let refined = detect(&s, &InteractionsParams::default());
        assert_eq!(refined.count(), 1);
        let links = refined.intra_links(unit).unwrap();
        assert_eq!(links.all_edges().len(), 4);
        let kept: Vec<_> = links.edges().map(|e| (e.a, e.b)).collect();
        assert_eq!(kept, vec![(0, 2)]);
    }

    #[test]
    fn refinement_prefers_ionic_over_hydrogen_bond() {
        let mut builder = ModelBuilder::new();
        builder.start_chain('A');
        builder.start_residue(1, "LYS").unwrap();
        builder
            .add_atom(Atom::new("NZ", Element::N, Point3::origin()).with_implicit_hydrogens(3))
            .unwrap();
        builder.start_residue(2, "ASP").unwrap();
        builder
            .add_atom(Atom::new("OD1", Element::O, Point3::new(2.9, 0.0, 0.0)))
            .unwrap();
        builder
            .add_atom(Atom::new("OD2", Element::O, Point3::new(4.5, 1.8, 0.0)))
            .unwrap();
        let s = Structure::from_model(builder.build());

        let raw = detect(&s, &unrefined()).summary();
        assert_eq!(raw.get(&InteractionType::Ionic), Some(&1));
        assert_eq!(raw.get(&InteractionType::HydrogenBond), Some(&1));

        let refined = detect(&s, &InteractionsParams::default()).summary();
        assert_eq!(refined.get(&InteractionType::Ionic), Some(&1));
        assert_eq!(refined.get(&InteractionType::HydrogenBond), None);
    }

    /// Two hydroxyls 2.8 Å apart, each hydrogen pointing at the other oxygen.
    fn facing_hydroxyls() -> Model {
        model(
            &[
                (
                    "LIG",
                    &[
                        ("C1", Element::C, [-0.477, 1.348, 0.0]),
                        ("O1", Element::O, [0.0, 0.0, 0.0]),
                        ("H1", Element::H, [0.96, 0.0, 0.0]),
                    ],
                ),
                (
                    "LIH",
                    &[
                        ("O2", Element::O, [2.8, 0.0, 0.0]),
                        ("H2", Element::H, [1.84, 0.0, 0.0]),
                        ("C2", Element::C, [3.277, -1.348, 0.0]),
                    ],
                ),
            ],
            &[
                (0, 1, BondOrder::Single),
                (1, 2, BondOrder::Single),
                (3, 4, BondOrder::Single),
                (3, 5, BondOrder::Single),
            ],
        )
    }

    #[test]
    fn mutual_hydrogen_bond_is_one_edge_within_a_unit() {
        let s = Structure::from_model(facing_hydroxyls());
        let result = detect(&s, &unrefined());
        assert_eq!(
            result.summary(),
            BTreeMap::from([(InteractionType::HydrogenBond, 1)])
        );
        let unit = s.unit_ids()[0];
        assert_eq!(
            result.atom_interactions(unit, 1, 3),
            vec![InteractionType::HydrogenBond]
        );
    }

    #[test]
    fn mutual_hydrogen_bond_is_one_edge_between_units() {
        let mut s = Structure::new(Arc::new(facing_hydroxyls()));
        let a = s.add_unit(vec![0, 1, 2], SymmetryOperator::identity()).unwrap();
        let b = s.add_unit(vec![3, 4, 5], SymmetryOperator::identity()).unwrap();
        let result = detect(&s, &unrefined());
        assert_eq!(
            result.summary(),
            BTreeMap::from([(InteractionType::HydrogenBond, 1)])
        );
        assert_eq!(result.unit_pair_links(a, b).count(), 1);
    }

    #[test]
    fn collinear_atoms_beyond_a_leaf_bucket_are_handled() {
        let xs: Vec<f64> = (0..100).map(|i| 3.0 * i as f64).collect();
        let s = Structure::from_model(carbons(&xs));
        let result = detect(&s, &unrefined());
        assert_eq!(result.summary(), BTreeMap::from([(InteractionType::Hydrophobic, 99)]));

        let stacked = Structure::from_model(carbons(&[0.0; 40]));
        let result = detect(&stacked, &unrefined());
        let unit = stacked.unit_ids()[0];
        assert_eq!(result.features(unit).unwrap().len(), 40);
        assert_eq!(result.count(), 40 * 39 / 2);
    }

    #[test]
    fn results_can_be_cloned() {
        let s = hydrogen_bond_pair(2.8);
        let result = detect(&s, &InteractionsParams::default());
        let copy = result.clone();
        assert_eq!(copy.summary(), result.summary());
        assert_eq!(copy.fingerprint(), result.fingerprint());
        let unit = s.unit_ids()[0];
        assert_eq!(copy.intra_links(unit), result.intra_links(unit));
    }
}
