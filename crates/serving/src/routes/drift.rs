//! Drift Check Route
//!
//! Accepts a batch of raw feature rows, normalizes them with the persisted
//! scaler, and compares each column against the stored training reference.

use axum::extract::State;
use axum::Json;
use drift_monitor::{DriftError, DriftReport};
use ndarray::Array2;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::context::ServingContext;
use crate::error::ApiError;
use preprocess::SchemaMismatchError;

/// Run a drift check over a batch of raw feature rows.
///
/// Every row must carry every contract column; the contract persisted with
/// the scaler is the ground truth, and the detector must have been fitted
/// under the same contract.
pub async fn check_drift(
    State(ctx): State<Arc<ServingContext>>,
    Json(batch): Json<Vec<Map<String, Value>>>,
) -> Result<Json<DriftReport>, ApiError> {
    let scaler = ctx
        .scaler
        .as_ref()
        .ok_or(ApiError::ArtifactUnavailable("scaler"))?;
    let detector = ctx
        .drift_detector
        .as_ref()
        .ok_or(ApiError::ArtifactUnavailable("drift detector"))?;

    if batch.is_empty() {
        return Err(DriftError::EmptyBatch.into());
    }

    let contract = scaler.contract();
    contract.validate_columns(detector.contract().columns())?;

    let mut flat = Vec::with_capacity(batch.len() * contract.len());
    for row in &batch {
        for name in contract.columns() {
            let value = row
                .get(name)
                .ok_or_else(|| SchemaMismatchError::MissingColumn(name.clone()))
                .map_err(ApiError::Schema)?;
            flat.push(
                value
                    .as_f64()
                    .ok_or_else(|| ApiError::InvalidField(name.clone()))?,
            );
        }
    }

    let raw = Array2::from_shape_vec((batch.len(), contract.len()), flat)
        .map_err(|_| ApiError::Drift(DriftError::EmptyBatch))?;
    let normalized = scaler.apply(&raw)?;
    let report = detector.check(&normalized)?;
    debug!(
        "Drift check over {} rows: drifted = {}",
        batch.len(),
        report.is_drifted
    );

    Ok(Json(report))
}
