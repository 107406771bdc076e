//! Prediction Route
//!
//! Maps a single request's named fields into the persisted feature
//! contract's order, applies the persisted scaler, and returns the scalar
//! RUL estimate. Pure function of the loaded context and the input.

use axum::extract::State;
use axum::Json;
use model::Regressor;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::context::ServingContext;
use crate::error::ApiError;

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Estimated remaining useful life, in cycles
    pub rul: f64,
}

/// Predict RUL for a single cycle observation.
///
/// The payload must contain every contract column as a number; extra fields
/// are ignored. Validation completes before any computation starts.
pub async fn predict(
    State(ctx): State<Arc<ServingContext>>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<PredictResponse>, ApiError> {
    let scaler = ctx
        .scaler
        .as_ref()
        .ok_or(ApiError::ArtifactUnavailable("scaler"))?;
    let model = ctx
        .model
        .as_ref()
        .ok_or(ApiError::ArtifactUnavailable("model"))?;

    let mut row = Vec::with_capacity(scaler.contract().len());
    for name in scaler.contract().columns() {
        let value = payload
            .get(name)
            .ok_or_else(|| ApiError::MissingField(name.clone()))?;
        row.push(
            value
                .as_f64()
                .ok_or_else(|| ApiError::InvalidField(name.clone()))?,
        );
    }

    let normalized = scaler.apply_row(&row)?;
    let rul = model.predict_row(&normalized)?;
    debug!("Predicted RUL {:.2} cycles", rul);

    Ok(Json(PredictResponse { rul }))
}
