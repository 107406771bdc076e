//! Evaluation Metrics
//!
//! RMSE and R² of predicted against held-out RUL targets, both in native
//! cycle scale.

use crate::ModelError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Held-out evaluation summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalReport {
    /// Root mean squared error, in cycles
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl EvalReport {
    /// Compute both metrics for a prediction vector
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self, ModelError> {
        Ok(Self {
            rmse: rmse(y_true, y_pred)?,
            r2: r2_score(y_true, y_pred)?,
        })
    }
}

/// Root mean squared error
pub fn rmse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64, ModelError> {
    check_lengths(y_true, y_pred)?;
    let n = y_true.len() as f64;
    let sse: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    Ok((sse / n).sqrt())
}

/// Coefficient of determination. A constant truth vector yields 1.0 for a
/// perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64, ModelError> {
    check_lengths(y_true, y_pred)?;
    let mean = y_true.sum() / y_true.len() as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<(), ModelError> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::DimensionMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(ModelError::InvalidTrainingSet("empty evaluation set".to_string()));
    }
    Ok(())
}
