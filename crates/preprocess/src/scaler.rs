//! Min-Max Scaler
//!
//! Per-column min/max normalization fitted on the training matrix only and
//! applied identically to train, test, and single-row inference inputs.
//! The fitted state, together with its feature contract, is the persisted
//! normalizer artifact.

use crate::contract::FeatureContract;
use crate::{PreprocessError, SchemaMismatchError};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Scaler behavior options
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScalerConfig {
    /// Clamp normalized values into [0, 1]. Off by default: values outside
    /// the training-time range extrapolate past the unit interval.
    pub clamp: bool,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self { clamp: false }
    }
}

/// Fitted per-column min/max normalizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    contract: FeatureContract,
    min: Vec<f64>,
    max: Vec<f64>,
    config: ScalerConfig,
}

impl MinMaxScaler {
    /// Fit column ranges over the training matrix with default options
    pub fn fit(matrix: &Array2<f64>, contract: FeatureContract) -> Result<Self, PreprocessError> {
        Self::fit_with_config(matrix, contract, ScalerConfig::default())
    }

    /// Fit column ranges over the training matrix
    pub fn fit_with_config(
        matrix: &Array2<f64>,
        contract: FeatureContract,
        config: ScalerConfig,
    ) -> Result<Self, PreprocessError> {
        if matrix.nrows() == 0 {
            return Err(PreprocessError::EmptyTrainingMatrix);
        }
        if matrix.ncols() != contract.len() {
            return Err(SchemaMismatchError::ColumnCount {
                expected: contract.len(),
                actual: matrix.ncols(),
            }
            .into());
        }

        let mut min = Vec::with_capacity(matrix.ncols());
        let mut max = Vec::with_capacity(matrix.ncols());
        for column in matrix.axis_iter(Axis(1)) {
            min.push(column.iter().cloned().fold(f64::INFINITY, f64::min));
            max.push(column.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        }

        debug!("Fitted scaler over {} rows x {} columns", matrix.nrows(), matrix.ncols());
        Ok(Self {
            contract,
            min,
            max,
            config,
        })
    }

    /// Normalize a matrix whose columns follow the fitted contract.
    ///
    /// Deterministic elementwise transform; a zero-range column maps to the
    /// fixed constant 0.0 for every input, never NaN.
    pub fn apply(&self, matrix: &Array2<f64>) -> Result<Array2<f64>, SchemaMismatchError> {
        if matrix.ncols() != self.contract.len() {
            return Err(SchemaMismatchError::ColumnCount {
                expected: self.contract.len(),
                actual: matrix.ncols(),
            });
        }

        let mut out = matrix.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let range = self.max[j] - self.min[j];
            for value in column.iter_mut() {
                *value = self.scale(*value, self.min[j], range);
            }
        }
        Ok(out)
    }

    /// Normalize a single row, in fitted contract order
    pub fn apply_row(&self, row: &[f64]) -> Result<Vec<f64>, SchemaMismatchError> {
        if row.len() != self.contract.len() {
            return Err(SchemaMismatchError::ColumnCount {
                expected: self.contract.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &value)| self.scale(value, self.min[j], self.max[j] - self.min[j]))
            .collect())
    }

    fn scale(&self, value: f64, min: f64, range: f64) -> f64 {
        if range == 0.0 {
            return 0.0;
        }
        let scaled = (value - min) / range;
        if self.config.clamp {
            scaled.clamp(0.0, 1.0)
        } else {
            scaled
        }
    }

    /// The feature contract this scaler was fitted on
    pub fn contract(&self) -> &FeatureContract {
        &self.contract
    }

    /// Fitted per-column minimums
    pub fn column_min(&self) -> &[f64] {
        &self.min
    }

    /// Fitted per-column maximums
    pub fn column_max(&self) -> &[f64] {
        &self.max
    }

    /// Persist the fitted state as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<(), PreprocessError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Saved scaler artifact to {}", path.display());
        Ok(())
    }

    /// Load a fitted scaler, independent of the training code path
    pub fn load(path: &Path) -> Result<Self, PreprocessError> {
        let json = fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&json)?;
        info!(
            "Loaded scaler artifact from {} ({} features)",
            path.display(),
            scaler.contract.len()
        );
        Ok(scaler)
    }
}
