use crate::core::models::ids::UnitId;
use crate::core::models::structure::Structure;
use crate::core::models::unit::Unit;
use crate::engine::error::EngineError;
use crate::engine::families::{FeatureProvider, UnitContext};
use crate::engine::features::Features;
use crate::engine::features::builder::FeaturesBuilder;
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use slotmap::SecondaryMap;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const FEATURE_CHUNK_SIZE: usize = 64;

/// Runs every provider over one unit and freezes the result.
pub fn compute_unit_features(
    structure: &Structure,
    unit: &Unit,
    providers: &[&dyn FeatureProvider],
) -> Result<Features, EngineError> {
    let context = UnitContext::new(structure, unit);
    let mut builder = FeaturesBuilder::new(unit.len() / 2, FEATURE_CHUNK_SIZE);
    for provider in providers {
        provider.add(&context, &mut builder);
    }
    let features = builder.get_features(unit.len());
    features.validate(unit.id(), unit.len())?;
    debug!(unit = ?unit.id(), features = features.len(), "Unit features built");
    Ok(features)
}

/// Builds the features of every unit. Returns `Ok(None)` when cancelled.
#[instrument(skip_all, name = "features_task")]
pub fn run(
    structure: &Structure,
    providers: &[&dyn FeatureProvider],
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Option<SecondaryMap<UnitId, Features>>, EngineError> {
    info!(
        units = structure.unit_count(),
        providers = providers.len(),
        "Building unit features."
    );
    reporter.report(Progress::TaskStart {
        total_steps: structure.unit_count() as u64,
    });

    let unit_ids = structure.unit_ids();

    #[cfg(not(feature = "parallel"))]
    let iterator = unit_ids.iter();

    #[cfg(feature = "parallel")]
    let iterator = unit_ids.par_iter();

    let computed: Vec<Option<(UnitId, Features)>> = iterator
        .map(|&unit_id| {
            if cancellation.is_cancelled() {
                return Ok(None);
            }
            let unit = structure
                .unit(unit_id)
                .ok_or(EngineError::UnitNotFound(unit_id))?;
            let features = compute_unit_features(structure, unit, providers)?;
            reporter.report(Progress::TaskIncrement);
            Ok(Some((unit_id, features)))
        })
        .collect::<Result<_, EngineError>>()?;

    reporter.report(Progress::TaskFinish);

    if cancellation.is_cancelled() {
        return Ok(None);
    }

    let mut unit_features = SecondaryMap::with_capacity(computed.len());
    for (unit_id, features) in computed.into_iter().flatten() {
        unit_features.insert(unit_id, features);
    }
    Ok(Some(unit_features))
}
