//! RUL Serving API
//!
//! REST server exposing single-row RUL prediction, batch drift checks, and
//! artifact health. All handlers share one immutable [`ServingContext`]
//! built from the persisted artifacts at startup.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod context;
mod error;
mod routes;

pub use config::ServerConfig;
pub use context::ServingContext;
pub use error::ApiError;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub artifacts: ArtifactStatus,
}

/// Which persisted artifacts are currently loaded
#[derive(Debug, Serialize)]
pub struct ArtifactStatus {
    pub model: bool,
    pub scaler: bool,
    pub drift_detector: bool,
}

/// Create the application router
pub fn create_router(ctx: Arc<ServingContext>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predict", post(routes::predict::predict))
        .route("/api/v1/drift", post(routes::drift::check_drift))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Health check handler
async fn health_handler(State(ctx): State<Arc<ServingContext>>) -> impl IntoResponse {
    let status = if ctx.ready() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: ctx.version.clone(),
        uptime_seconds: ctx.start_time.elapsed().as_secs(),
        artifacts: ArtifactStatus {
            model: ctx.model.is_some(),
            scaler: ctx.scaler.is_some(),
            drift_detector: ctx.drift_detector.is_some(),
        },
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server with the given configuration
pub async fn run_server(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Arc::new(ServingContext::load(config));
    if !ctx.ready() {
        info!("Starting degraded: prediction unavailable until artifacts exist");
    }
    let app = create_router(ctx);

    info!("Starting RUL API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
