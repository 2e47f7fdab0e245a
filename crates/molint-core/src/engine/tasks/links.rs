use crate::core::models::ids::UnitId;
use crate::core::models::structure::Structure;
use crate::core::models::unit::Unit;
use crate::core::spatial::unit_pairs::UnitPair;
use crate::engine::error::EngineError;
use crate::engine::families::LinkTester;
use crate::engine::features::{FeatureInfo, Features};
use crate::engine::links::InteractionType;
use crate::engine::links::inter::{InterLinksBuilder, InterUnitLinks};
use crate::engine::links::intra::{IntraLinksBuilder, IntraUnitLinks};
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use slotmap::SecondaryMap;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Asks each tester in order; the first acceptance decides the type.
fn classify(
    structure: &Structure,
    testers: &[Box<dyn LinkTester>],
    a: &FeatureInfo<'_>,
    b: &FeatureInfo<'_>,
    distance_sq: f64,
) -> Option<InteractionType> {
    testers
        .iter()
        .filter(|tester| distance_sq <= tester.max_distance_sq())
        .find_map(|tester| tester.get_type(structure, a, b, distance_sq))
}

/// Member atoms of both sides plus the type; one edge per key.
type EdgeKey<'a> = (&'a [u32], &'a [u32], InteractionType);

/// Links between features of the same unit.
///
/// An atom may carry several features (a hydroxyl O is both donor and
/// acceptor), so the same atom pair can be accepted twice through different
/// feature pairs. Only the first is kept.
pub fn find_intra_links(
    structure: &Structure,
    unit: &Unit,
    features: &Features,
    testers: &[Box<dyn LinkTester>],
    max_distance: f64,
) -> IntraUnitLinks {
    let mut builder = IntraLinksBuilder::new(features.len());
    let mut seen: HashSet<EdgeKey<'_>> = HashSet::new();
    let lookup = features.lookup();
    for i in 0..features.len() {
        let center = features.center(i);
        let hits = lookup.find(center.x, center.y, center.z, max_distance);
        let info_a = FeatureInfo::new(unit, features, i);
        for (&j, &distance_sq) in hits.indices.iter().zip(&hits.squared_distances) {
            if j <= i {
                continue;
            }
            let info_b = FeatureInfo::new(unit, features, j);
            let Some(interaction) = classify(structure, testers, &info_a, &info_b, distance_sq)
            else {
                continue;
            };
            let (ma, mb) = (info_a.members(), info_b.members());
            let key = if ma <= mb {
                (ma, mb, interaction)
            } else {
                (mb, ma, interaction)
            };
            if seen.insert(key) {
                builder.add(i, j, interaction);
            }
        }
    }
    builder.get_links()
}

/// Links from every feature of `unit_a` to the features of `unit_b`.
fn add_unit_pair_links(
    structure: &Structure,
    (unit_a, features_a): (&Unit, &Features),
    (unit_b, features_b): (&Unit, &Features),
    testers: &[Box<dyn LinkTester>],
    max_distance: f64,
    builder: &mut InterLinksBuilder,
) {
    // Centers of A expressed in B's invariant frame.
    let to_b = unit_a.operator().then(&unit_b.operator().inverse());
    let lookup_b = features_b.lookup();
    let boundary_b = lookup_b.boundary();

    let mut seen: HashSet<EdgeKey<'_>> = HashSet::new();
    builder.start_unit_pair(unit_a.id(), unit_b.id());
    for i in 0..features_a.len() {
        let center = to_b.apply(&features_a.center(i));
        if !boundary_b.contains_within(&center, max_distance) {
            continue;
        }
        let hits = lookup_b.find(center.x, center.y, center.z, max_distance);
        if hits.count == 0 {
            continue;
        }
        let info_a = FeatureInfo::new(unit_a, features_a, i);
        for (&j, &distance_sq) in hits.indices.iter().zip(&hits.squared_distances) {
            let info_b = FeatureInfo::new(unit_b, features_b, j);
            let Some(interaction) = classify(structure, testers, &info_a, &info_b, distance_sq)
            else {
                continue;
            };
            if seen.insert((info_a.members(), info_b.members(), interaction)) {
                builder.add(i, j, interaction);
            }
        }
    }
    builder.finish_unit_pair();
}

/// Intra-unit links of every unit. Returns `Ok(None)` when cancelled.
#[instrument(skip_all, name = "intra_links_task")]
pub fn run_intra(
    structure: &Structure,
    unit_features: &SecondaryMap<UnitId, Features>,
    testers: &[Box<dyn LinkTester>],
    max_distance: f64,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Option<SecondaryMap<UnitId, IntraUnitLinks>>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: structure.unit_count() as u64,
    });

    let mut unit_links = SecondaryMap::with_capacity(structure.unit_count());
    for unit in structure.units() {
        if cancellation.is_cancelled() {
            return Ok(None);
        }
        let features = unit_features
            .get(unit.id())
            .ok_or(EngineError::UnitNotFound(unit.id()))?;
        let links = find_intra_links(structure, unit, features, testers, max_distance);
        debug!(unit = ?unit.id(), edges = links.edge_count(), "Intra-unit links found");
        unit_links.insert(unit.id(), links);
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    Ok(Some(unit_links))
}

/// Inter-unit links over the candidate unit pairs. Returns `Ok(None)` when
/// cancelled.
#[instrument(skip_all, name = "inter_links_task")]
pub fn run_inter(
    structure: &Structure,
    unit_pairs: &[UnitPair],
    unit_features: &SecondaryMap<UnitId, Features>,
    testers: &[Box<dyn LinkTester>],
    max_distance: f64,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Option<InterUnitLinks>, EngineError> {
    info!(unit_pairs = unit_pairs.len(), "Linking features across units.");
    reporter.report(Progress::TaskStart {
        total_steps: unit_pairs.len() as u64,
    });

    let resolve = |unit_id: UnitId| -> Result<_, EngineError> {
        let unit = structure
            .unit(unit_id)
            .ok_or(EngineError::UnitNotFound(unit_id))?;
        let features = unit_features
            .get(unit_id)
            .ok_or(EngineError::UnitNotFound(unit_id))?;
        Ok((unit, features))
    };

    let mut builder = InterLinksBuilder::new();
    for pair in unit_pairs {
        if cancellation.is_cancelled() {
            return Ok(None);
        }
        let a = resolve(pair.unit_a)?;
        let b = resolve(pair.unit_b)?;
        if !a.1.is_empty() && !b.1.is_empty() {
            add_unit_pair_links(structure, a, b, testers, max_distance, &mut builder);
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    Ok(Some(builder.get_links()))
}
