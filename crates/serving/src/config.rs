//! Server Configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Server settings, from `config/server.toml` with `RUL_` env overrides
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener
    pub bind_addr: String,
    /// Persisted model artifact path
    pub model_path: PathBuf,
    /// Persisted scaler artifact path
    pub scaler_path: PathBuf,
    /// Persisted drift detector artifact path
    pub drift_detector_path: PathBuf,
}

impl ServerConfig {
    /// Load settings from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("model_path", "models/model.json")?
            .set_default("scaler_path", "models/scaler.json")?
            .set_default("drift_detector_path", "models/drift_detector.json")?
            .add_source(config::File::with_name("config/server").required(false))
            .add_source(config::Environment::with_prefix("RUL"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.model_path, PathBuf::from("models/model.json"));
    }
}
