use crate::core::models::structure::Structure;
use crate::engine::cache::{CacheKey, InteractionsCache};
use crate::engine::config::InteractionsParams;
use crate::engine::error::EngineError;
use crate::engine::interactions::Interactions;
use crate::engine::progress::{CancellationToken, ProgressReporter};
use crate::engine::tasks;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Computes the interactions of `structure` under `params`.
///
/// With a cache, results are shared between calls with identical structure
/// content and parameters. Returns `Ok(None)` if the run was cancelled.
#[instrument(skip_all, name = "interactions_workflow")]
pub fn run(
    structure: &Structure,
    params: &InteractionsParams,
    cache: Option<&InteractionsCache>,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Option<Arc<Interactions>>, EngineError> {
    let compute = || tasks::interactions::run(structure, params, reporter, cancellation);

    let result = match cache {
        Some(cache) => {
            let key = CacheKey::new(structure, params);
            if cache.get(&key).is_some() {
                info!("Serving interactions from cache.");
            }
            cache.get_or_compute(key, compute)
        }
        None => compute().map(|computed| computed.map(Arc::new)),
    };

    if let Err(e) = &result {
        warn!(error = %e, "Interaction computation failed.");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::models::model::ModelBuilder;
    use crate::engine::links::InteractionType;
    use nalgebra::Point3;

    fn two_carbons() -> Structure {
        let mut builder = ModelBuilder::new();
        builder.start_chain('A');
        builder.start_residue(1, "HYD").unwrap();
        builder
            .add_atom(Atom::new("C1", Element::C, Point3::origin()))
            .unwrap();
        builder.start_chain('B');
        builder.start_residue(1, "HYD").unwrap();
        builder
            .add_atom(Atom::new("C1", Element::C, Point3::new(3.8, 0.0, 0.0)))
            .unwrap();
        Structure::from_model(builder.build())
    }

    #[test]
    fn cached_runs_share_one_result() {
        let structure = two_carbons();
        let params = InteractionsParams::default();
        let cache = InteractionsCache::new();
        let reporter = ProgressReporter::new();
        let token = CancellationToken::new();

        let first = run(&structure, &params, Some(&cache), &reporter, &token)
            .unwrap()
            .unwrap();
        let second = run(&structure, &params, Some(&cache), &reporter, &token)
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.summary().get(&InteractionType::Hydrophobic), Some(&1));
        assert_eq!(cache.len(), 1);

        let other = params.with_override("hydrophobic.distance-max", "3.0").unwrap();
        let third = run(&structure, &other, Some(&cache), &reporter, &token)
            .unwrap()
            .unwrap();
        assert_eq!(third.count(), 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn uncached_runs_compute_fresh_results() {
        let structure = two_carbons();
        let params = InteractionsParams::default();
        let reporter = ProgressReporter::new();
        let token = CancellationToken::new();
        let a = run(&structure, &params, None, &reporter, &token).unwrap().unwrap();
        let b = run(&structure, &params, None, &reporter, &token).unwrap().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn cancelled_runs_are_not_cached() {
        let structure = two_carbons();
        let params = InteractionsParams::default();
        let cache = InteractionsCache::new();
        let token = CancellationToken::new();
        token.cancel();
        let result = run(&structure, &params, Some(&cache), &ProgressReporter::new(), &token);
        assert!(result.unwrap().is_none());
        assert!(cache.is_empty());
    }
}
