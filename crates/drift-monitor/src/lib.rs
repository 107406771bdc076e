//! Drift Monitor
//!
//! Fits a per-feature two-sample Kolmogorov-Smirnov reference over the
//! normalized training feature matrix and compares later batches against it.
//! Detection only raises a signal; retraining is an external decision.

mod detector;
mod ks;

pub use detector::{Correction, DriftConfig, DriftDetector, DriftReport, FeatureDrift};
pub use ks::{ks_p_value, ks_statistic};

use preprocess::SchemaMismatchError;
use thiserror::Error;

/// Errors during drift fitting and checking
#[derive(Debug, Error)]
pub enum DriftError {
    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),

    /// The reference matrix has no rows
    #[error("cannot fit a drift detector on an empty reference matrix")]
    EmptyReference,

    /// A drift check was requested on an empty batch
    #[error("drift check requires at least one batch row")]
    EmptyBatch,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization error: {0}")]
    Artifact(#[from] serde_json::Error),
}
