//! Drift Detector
//!
//! Stores a per-feature sorted snapshot of the normalized training matrix
//! (the reference distribution) and compares batch columns against it with
//! the two-sample KS test. The snapshot is immutable; an explicit refit
//! replaces it wholesale.

use crate::ks::{ks_p_value, ks_statistic};
use crate::DriftError;
use ndarray::{Array2, Axis};
use preprocess::{FeatureContract, SchemaMismatchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Multiple-testing policy for the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Correction {
    /// Divide the significance threshold by the number of features
    Bonferroni,
    /// Trip on any single feature at the raw threshold
    None,
}

/// Detector options
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Significance threshold before correction
    pub p_val: f64,
    /// Aggregate verdict policy
    pub correction: Correction,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            p_val: 0.05,
            correction: Correction::Bonferroni,
        }
    }
}

/// Per-feature test outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDrift {
    /// Feature column name
    pub feature: String,
    /// KS statistic against the reference column
    pub statistic: f64,
    /// Asymptotic p-value
    pub p_value: f64,
    /// Whether this feature tripped the (corrected) threshold
    pub drifted: bool,
}

/// Result of a batch drift check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// True if any feature tripped the corrected threshold
    pub is_drifted: bool,
    /// The per-feature threshold actually applied
    pub threshold: f64,
    /// Per-feature statistics, in contract order
    pub features: Vec<FeatureDrift>,
}

/// Fitted KS drift detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftDetector {
    contract: FeatureContract,
    /// Sorted reference sample per feature, in contract order
    reference: Vec<Vec<f64>>,
    config: DriftConfig,
}

impl DriftDetector {
    /// Capture the reference distribution from the normalized training
    /// feature matrix. Columns must follow the contract order.
    pub fn fit(
        reference: &Array2<f64>,
        contract: FeatureContract,
        config: DriftConfig,
    ) -> Result<Self, DriftError> {
        if reference.nrows() == 0 {
            return Err(DriftError::EmptyReference);
        }
        if reference.ncols() != contract.len() {
            return Err(SchemaMismatchError::ColumnCount {
                expected: contract.len(),
                actual: reference.ncols(),
            }
            .into());
        }

        let reference = reference
            .axis_iter(Axis(1))
            .map(|column| {
                let mut values: Vec<f64> = column.to_vec();
                values.sort_by(|a, b| a.total_cmp(b));
                values
            })
            .collect();

        info!(
            "Fitted drift detector: {} features, p_val {}",
            contract.len(),
            config.p_val
        );
        Ok(Self {
            contract,
            reference,
            config,
        })
    }

    /// Compare a batch against the stored reference, column by column.
    ///
    /// Batches smaller than the reference are accepted; statistical power
    /// degrades with batch size but the test remains well defined.
    pub fn check(&self, batch: &Array2<f64>) -> Result<DriftReport, DriftError> {
        if batch.nrows() == 0 {
            return Err(DriftError::EmptyBatch);
        }
        if batch.ncols() != self.contract.len() {
            return Err(SchemaMismatchError::ColumnCount {
                expected: self.contract.len(),
                actual: batch.ncols(),
            }
            .into());
        }

        let threshold = match self.config.correction {
            Correction::Bonferroni => self.config.p_val / self.contract.len() as f64,
            Correction::None => self.config.p_val,
        };

        let mut features = Vec::with_capacity(self.contract.len());
        for (j, column) in batch.axis_iter(Axis(1)).enumerate() {
            let mut values: Vec<f64> = column.to_vec();
            values.sort_by(|a, b| a.total_cmp(b));

            let reference = &self.reference[j];
            let statistic = ks_statistic(reference, &values);
            let p_value = ks_p_value(statistic, reference.len(), values.len());
            features.push(FeatureDrift {
                feature: self.contract.columns()[j].clone(),
                statistic,
                p_value,
                drifted: p_value < threshold,
            });
        }

        let is_drifted = features.iter().any(|f| f.drifted);
        if is_drifted {
            let tripped: Vec<&str> = features
                .iter()
                .filter(|f| f.drifted)
                .map(|f| f.feature.as_str())
                .collect();
            warn!("Drift detected on features: {}", tripped.join(", "));
        } else {
            debug!("No drift detected over {} batch rows", batch.nrows());
        }

        Ok(DriftReport {
            is_drifted,
            threshold,
            features,
        })
    }

    /// The feature contract the reference was captured under
    pub fn contract(&self) -> &FeatureContract {
        &self.contract
    }

    /// Detector options
    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Persist the reference snapshot and options as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<(), DriftError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!("Saved drift detector artifact to {}", path.display());
        Ok(())
    }

    /// Load a fitted detector from a JSON artifact
    pub fn load(path: &Path) -> Result<Self, DriftError> {
        let json = fs::read_to_string(path)?;
        let detector: Self = serde_json::from_str(&json)?;
        info!(
            "Loaded drift detector artifact from {} ({} features)",
            path.display(),
            detector.contract.len()
        );
        Ok(detector)
    }
}
