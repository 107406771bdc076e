//! Training Pipeline
//!
//! Ordered, in-process stages replacing any workflow framework: load raw
//! files, build the labeled and normalized dataset, train and evaluate the
//! regressor, fit the drift reference, then persist every artifact. Nothing
//! is written to disk until all stages have succeeded.

use anyhow::Context;
use dataset::{build_rul_map, load_cycle_file, load_rul_file};
use drift_monitor::{DriftConfig, DriftDetector};
use model::{EvalReport, ForestConfig, RandomForestRegressor, Regressor};
use preprocess::{write_processed_csv, DatasetBuilder, ScalerConfig};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Pipeline settings, from `config/pipeline.toml` with `RUL_` env overrides
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the raw whitespace-delimited files
    pub raw_dir: PathBuf,
    /// Output directory for processed dataset files
    pub processed_dir: PathBuf,
    /// Output directory for model, scaler, and drift artifacts
    pub models_dir: PathBuf,
    /// Raw train file name
    pub train_file: String,
    /// Raw test file name
    pub test_file: String,
    /// True-RUL file name for the test set
    pub rul_file: String,
    /// Forest hyperparameters
    #[serde(default)]
    pub forest: ForestConfig,
    /// Drift detector options
    #[serde(default)]
    pub drift: DriftConfig,
    /// Scaler options
    #[serde(default)]
    pub scaler: ScalerConfig,
}

impl PipelineConfig {
    /// Load settings from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("raw_dir", "data/raw")?
            .set_default("processed_dir", "data/processed")?
            .set_default("models_dir", "models")?
            .set_default("train_file", "train_FD001.txt")?
            .set_default("test_file", "test_FD001.txt")?
            .set_default("rul_file", "RUL_FD001.txt")?
            .add_source(config::File::with_name("config/pipeline").required(false))
            .add_source(config::Environment::with_prefix("RUL"))
            .build()?
            .try_deserialize()
    }
}

/// Run all training stages in order and persist the artifacts.
///
/// Returns the held-out evaluation report.
pub fn run(config: &PipelineConfig) -> anyhow::Result<EvalReport> {
    // Stage 1: load raw inputs.
    let raw_train = load_cycle_file(&config.raw_dir.join(&config.train_file))
        .context("loading raw train file")?;
    let raw_test = load_cycle_file(&config.raw_dir.join(&config.test_file))
        .context("loading raw test file")?;
    let rul_values =
        load_rul_file(&config.raw_dir.join(&config.rul_file)).context("loading RUL file")?;
    let rul_map = build_rul_map(&raw_test, &rul_values)?;

    // Stage 2: label, select, fit scaler on train only, normalize both.
    let dataset = DatasetBuilder::new()
        .scaler_config(config.scaler)
        .build(&raw_train, &raw_test, &rul_map)?;

    // Stage 3: train and evaluate the regressor.
    let mut forest = RandomForestRegressor::new(config.forest);
    forest.fit(&dataset.x_train, &dataset.y_train)?;
    let predictions = forest.predict(&dataset.x_test)?;
    let report = EvalReport::compute(&dataset.y_test, &predictions)?;
    info!("Evaluation: RMSE {:.2} cycles, R2 {:.4}", report.rmse, report.r2);

    // Stage 4: capture the drift reference over the normalized train matrix.
    let detector = DriftDetector::fit(
        &dataset.x_train,
        dataset.scaler.contract().clone(),
        config.drift,
    )?;

    // Stage 5: persist, only now that every stage has succeeded.
    fs::create_dir_all(&config.processed_dir)?;
    fs::create_dir_all(&config.models_dir)?;

    write_processed_csv(
        &config.processed_dir.join("train_processed.csv"),
        dataset.scaler.contract(),
        &dataset.train_rows,
        &dataset.x_train,
    )?;
    write_processed_csv(
        &config.processed_dir.join("test_processed.csv"),
        dataset.scaler.contract(),
        &dataset.test_rows,
        &dataset.x_test,
    )?;
    dataset.scaler.save(&config.models_dir.join("scaler.json"))?;
    forest.save(&config.models_dir.join("model.json"))?;
    detector.save(&config.models_dir.join("drift_detector.json"))?;

    info!("Training pipeline complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use preprocess::MinMaxScaler;
    use std::fmt::Write as _;
    use std::path::Path;

    fn write_raw_cycle_file(path: &Path, units: &[(u32, u32)], bias: f64) {
        let mut content = String::new();
        for &(unit_nr, cycles) in units {
            for t in 1..=cycles {
                write!(content, "{} {}", unit_nr, t).unwrap();
                for s in 0..3 {
                    write!(content, " {:.4}", bias + s as f64 * 0.1 + t as f64 * 0.01).unwrap();
                }
                for s in 0..21 {
                    write!(content, " {:.4}", bias + s as f64 + t as f64 * 0.05).unwrap();
                }
                content.push('\n');
            }
        }
        fs::write(path, content).unwrap();
    }

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            raw_dir: root.join("raw"),
            processed_dir: root.join("processed"),
            models_dir: root.join("models"),
            train_file: "train.txt".to_string(),
            test_file: "test.txt".to_string(),
            rul_file: "rul.txt".to_string(),
            forest: ForestConfig {
                n_estimators: 5,
                max_depth: Some(4),
                ..ForestConfig::default()
            },
            drift: DriftConfig::default(),
            scaler: ScalerConfig::default(),
        }
    }

    #[test]
    fn test_end_to_end_run_persists_artifacts() {
        let root = std::env::temp_dir().join("rul-pipeline-e2e");
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("raw")).unwrap();

        write_raw_cycle_file(&root.join("raw/train.txt"), &[(1, 20), (2, 15)], 1.0);
        write_raw_cycle_file(&root.join("raw/test.txt"), &[(1, 8), (2, 6)], 1.2);
        fs::write(root.join("raw/rul.txt"), "12\n9\n").unwrap();

        let config = test_config(&root);
        let report = run(&config).unwrap();
        assert!(report.rmse.is_finite());

        // Artifacts exist and the scaler reloads independently.
        assert!(root.join("processed/train_processed.csv").exists());
        assert!(root.join("processed/test_processed.csv").exists());
        assert!(root.join("models/model.json").exists());
        assert!(root.join("models/drift_detector.json").exists());
        let scaler = MinMaxScaler::load(&root.join("models/scaler.json")).unwrap();
        assert_eq!(scaler.contract().len(), 18);
    }

    #[test]
    fn test_missing_rul_file_aborts_before_persist() {
        let root = std::env::temp_dir().join("rul-pipeline-abort");
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("raw")).unwrap();

        write_raw_cycle_file(&root.join("raw/train.txt"), &[(1, 10)], 1.0);
        write_raw_cycle_file(&root.join("raw/test.txt"), &[(1, 5)], 1.1);
        // RUL file carries one entry too many.
        fs::write(root.join("raw/rul.txt"), "4\n7\n").unwrap();

        let config = test_config(&root);
        assert!(run(&config).is_err());
        assert!(!root.join("models").exists());
        assert!(!root.join("processed").exists());
    }
}
