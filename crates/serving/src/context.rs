//! Serving Context
//!
//! Immutable snapshot of the persisted artifacts, constructed once at
//! startup and shared by reference across request handlers. Refreshing after
//! a retrain means building a new context and swapping the `Arc`, never
//! mutating a live one.

use crate::config::ServerConfig;
use drift_monitor::DriftDetector;
use model::RandomForestRegressor;
use preprocess::MinMaxScaler;
use std::path::Path;
use tracing::{info, warn};

/// Loaded artifacts plus service metadata
pub struct ServingContext {
    /// Persisted normalizer; source of truth for the feature contract
    pub scaler: Option<MinMaxScaler>,
    /// Persisted regressor
    pub model: Option<RandomForestRegressor>,
    /// Persisted drift reference
    pub drift_detector: Option<DriftDetector>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl ServingContext {
    /// Build a context from in-memory artifacts
    pub fn new(
        scaler: Option<MinMaxScaler>,
        model: Option<RandomForestRegressor>,
        drift_detector: Option<DriftDetector>,
    ) -> Self {
        Self {
            scaler,
            model,
            drift_detector,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Load whatever artifacts exist at the configured paths.
    ///
    /// A missing artifact is logged and left unloaded; the affected
    /// endpoints answer 503 until a context with the artifact is published.
    pub fn load(config: &ServerConfig) -> Self {
        let scaler = load_optional("scaler", &config.scaler_path, MinMaxScaler::load);
        let model = load_optional("model", &config.model_path, RandomForestRegressor::load);
        let drift_detector = load_optional(
            "drift detector",
            &config.drift_detector_path,
            DriftDetector::load,
        );
        Self::new(scaler, model, drift_detector)
    }

    /// Whether prediction is fully serviceable
    pub fn ready(&self) -> bool {
        self.scaler.is_some() && self.model.is_some()
    }
}

fn load_optional<T, E: std::fmt::Display>(
    name: &str,
    path: &Path,
    loader: impl Fn(&Path) -> Result<T, E>,
) -> Option<T> {
    if !path.exists() {
        warn!("No {} artifact at {}", name, path.display());
        return None;
    }
    match loader(path) {
        Ok(artifact) => {
            info!("Loaded {} artifact", name);
            Some(artifact)
        }
        Err(e) => {
            warn!("Failed to load {} artifact from {}: {}", name, path.display(), e);
            None
        }
    }
}
