//! RUL Regressor
//!
//! Defines the replaceable regression capability the pipeline depends on
//! (`fit(X, y)`, `predict(X)`) and provides a random forest implementation
//! persisted as an explicit JSON artifact. Features arrive normalized; the
//! target stays in native cycle scale, so no inversion is needed on predict.

mod forest;
mod metrics;
mod regressor;

pub use forest::{ForestConfig, RandomForestRegressor};
pub use metrics::{r2_score, rmse, EvalReport};
pub use regressor::Regressor;

use thiserror::Error;

/// Errors during model fitting, prediction, and artifact handling
#[derive(Debug, Error)]
pub enum ModelError {
    /// Predict called before fit or before an artifact was loaded
    #[error("model is not fitted")]
    NotFitted,

    /// Input width differs from the fitted feature count
    #[error("expected {expected} feature columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Row counts of X and y disagree, or the training set is empty
    #[error("invalid training set: {0}")]
    InvalidTrainingSet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization error: {0}")]
    Artifact(#[from] serde_json::Error),
}
