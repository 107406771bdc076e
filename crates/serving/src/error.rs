//! API Error Mapping
//!
//! Maps the pipeline error taxonomy onto HTTP responses: validation and
//! schema problems are rejected requests, absent artifacts are 503, and
//! internal model failures are 500. Nothing here crashes the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use drift_monitor::DriftError;
use model::ModelError;
use preprocess::SchemaMismatchError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required inference field is absent
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A required inference field is present but not a number
    #[error("field {0} is not a number")]
    InvalidField(String),

    /// Batch columns disagree with the fitted feature contract
    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),

    /// A persisted artifact is not loaded
    #[error("artifact not loaded: {0}")]
    ArtifactUnavailable(&'static str),

    #[error("inference failed: {0}")]
    Model(#[from] ModelError),

    #[error("drift check failed: {0}")]
    Drift(#[from] DriftError),
}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingField(_) | ApiError::InvalidField(_) | ApiError::Schema(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ArtifactUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Drift(DriftError::Schema(_)) | ApiError::Drift(DriftError::EmptyBatch) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Model(_) | ApiError::Drift(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        warn!("Request rejected ({}): {}", status, message);
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::MissingField("s_2".to_string()).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::ArtifactUnavailable("model").into_response().status(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Model(ModelError::NotFitted).into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Drift(DriftError::EmptyBatch).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (actual, expected) in cases {
            assert_eq!(actual, expected);
        }
    }
}
