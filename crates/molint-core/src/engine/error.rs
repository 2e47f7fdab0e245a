use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::ids::UnitId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Unit {0:?} is not part of the structure")]
    UnitNotFound(UnitId),

    #[error("Inconsistent features for unit {unit:?}: {reason}")]
    InconsistentFeatures { unit: UnitId, reason: String },

    #[error("Computation phase '{phase}' failed: {reason}")]
    PhaseFailed { phase: &'static str, reason: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
