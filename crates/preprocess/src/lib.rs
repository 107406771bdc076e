//! Preprocessing: Feature Contract and Normalization
//!
//! Owns the ordered feature-column contract shared by training, dataset
//! building, and single-row inference, the min-max scaler fitted on training
//! data only, and the dataset builder that composes labeling and scaling
//! into train/test matrices.

mod builder;
mod contract;
mod scaler;

pub use builder::{write_processed_csv, Dataset, DatasetBuilder};
pub use contract::{FeatureContract, EXCLUDED_SENSORS};
pub use scaler::{MinMaxScaler, ScalerConfig};

use dataset::DataIntegrityError;
use thiserror::Error;

/// Feature set/order disagreement between fit time and apply time.
///
/// Always a hard error; columns are never silently reindexed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaMismatchError {
    /// Wrong number of feature columns
    #[error("expected {expected} feature columns, got {actual}")]
    ColumnCount { expected: usize, actual: usize },

    /// A column is present but in the wrong position
    #[error("feature column {index} should be {expected:?}, got {actual:?}")]
    ColumnName {
        index: usize,
        expected: String,
        actual: String,
    },

    /// A column name the contract does not know about
    #[error("unknown feature column {0:?}")]
    UnknownColumn(String),

    /// A contract column absent from named input
    #[error("missing feature column {0:?}")]
    MissingColumn(String),
}

/// Errors during preprocessing and dataset building
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),

    #[error(transparent)]
    Data(#[from] DataIntegrityError),

    /// The scaler cannot be fitted on an empty matrix
    #[error("cannot fit a scaler on an empty training matrix")]
    EmptyTrainingMatrix,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization error: {0}")]
    Artifact(#[from] serde_json::Error),
}
