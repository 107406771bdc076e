//! Dataset Builder
//!
//! Composes the RUL labeler and the min-max scaler into a pair of tabular
//! datasets sharing one feature contract. The scaler is fitted on the train
//! feature matrix only and then applied to both regimes; the label column is
//! split off into target vectors in native cycle scale.

use crate::contract::FeatureContract;
use crate::scaler::{MinMaxScaler, ScalerConfig};
use crate::PreprocessError;
use dataset::{label_test, label_train, CycleRow, LabeledRow, RulMap};
use ndarray::{Array1, Array2};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Train/test matrices plus the fitted scaler and the labeled source rows
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Normalized train features, one row per (unit, cycle)
    pub x_train: Array2<f64>,
    /// Train RUL targets, native cycle scale
    pub y_train: Array1<f64>,
    /// Normalized test features
    pub x_test: Array2<f64>,
    /// Test RUL targets
    pub y_test: Array1<f64>,
    /// Scaler fitted on the train features; single source of truth for the
    /// feature contract
    pub scaler: MinMaxScaler,
    /// Labeled train rows, in build order
    pub train_rows: Vec<LabeledRow>,
    /// Labeled test rows, in build order
    pub test_rows: Vec<LabeledRow>,
}

/// Builds consistent train/test datasets from raw cycle rows
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    contract: FeatureContract,
    scaler_config: ScalerConfig,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    /// Builder with the standard feature contract
    pub fn new() -> Self {
        Self {
            contract: FeatureContract::standard(),
            scaler_config: ScalerConfig::default(),
        }
    }

    /// Builder with a caller-specified contract
    pub fn with_contract(contract: FeatureContract) -> Self {
        Self {
            contract,
            scaler_config: ScalerConfig::default(),
        }
    }

    /// Override scaler options
    pub fn scaler_config(mut self, config: ScalerConfig) -> Self {
        self.scaler_config = config;
        self
    }

    /// Label both regimes, fit the scaler on train only, and apply it to
    /// train and test feature matrices.
    pub fn build(
        &self,
        raw_train: &[CycleRow],
        raw_test: &[CycleRow],
        test_rul: &RulMap,
    ) -> Result<Dataset, PreprocessError> {
        info!(
            "Building dataset: {} raw train rows, {} raw test rows, {} features",
            raw_train.len(),
            raw_test.len(),
            self.contract.len()
        );

        let train_rows = label_train(raw_train)?;
        let test_rows = label_test(raw_test, test_rul)?;

        let (raw_x_train, y_train) = self.feature_matrix(&train_rows)?;
        let (raw_x_test, y_test) = self.feature_matrix(&test_rows)?;

        let scaler = MinMaxScaler::fit_with_config(
            &raw_x_train,
            self.contract.clone(),
            self.scaler_config,
        )?;
        let x_train = scaler.apply(&raw_x_train)?;
        let x_test = scaler.apply(&raw_x_test)?;

        info!(
            "Dataset ready: x_train {:?}, x_test {:?}",
            x_train.dim(),
            x_test.dim()
        );

        Ok(Dataset {
            x_train,
            y_train,
            x_test,
            y_test,
            scaler,
            train_rows,
            test_rows,
        })
    }

    fn feature_matrix(
        &self,
        rows: &[LabeledRow],
    ) -> Result<(Array2<f64>, Array1<f64>), PreprocessError> {
        let ncols = self.contract.len();
        let mut flat = Vec::with_capacity(rows.len() * ncols);
        let mut targets = Vec::with_capacity(rows.len());

        for labeled in rows {
            flat.extend(self.contract.extract_row(&labeled.row)?);
            targets.push(labeled.rul as f64);
        }

        let x = Array2::from_shape_vec((rows.len(), ncols), flat)
            .map_err(|_| PreprocessError::EmptyTrainingMatrix)?;
        Ok((x, Array1::from_vec(targets)))
    }
}

/// Write a processed dataset file: header row, then one line per (unit,
/// cycle) with identifiers, normalized contract columns, and the RUL target.
pub fn write_processed_csv(
    path: &Path,
    contract: &FeatureContract,
    rows: &[LabeledRow],
    features: &Array2<f64>,
) -> Result<(), PreprocessError> {
    let mut out = Vec::new();

    write!(out, "unit_nr,time_cycles")?;
    for name in contract.columns() {
        write!(out, ",{}", name)?;
    }
    writeln!(out, ",RUL")?;

    for (labeled, feature_row) in rows.iter().zip(features.rows()) {
        write!(out, "{},{}", labeled.row.unit_nr, labeled.row.time_cycles)?;
        for value in feature_row.iter() {
            write!(out, ",{}", value)?;
        }
        writeln!(out, ",{}", labeled.rul)?;
    }

    fs::write(path, out)?;
    info!("Wrote processed dataset to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::{SENSOR_COUNT, SETTING_COUNT};

    fn unit_rows(unit_nr: u32, cycles: u32, bias: f64) -> Vec<CycleRow> {
        (1..=cycles)
            .map(|time_cycles| {
                let mut sensors = [0.0; SENSOR_COUNT];
                for (i, slot) in sensors.iter_mut().enumerate() {
                    *slot = bias + i as f64 + time_cycles as f64 * 0.1;
                }
                CycleRow {
                    unit_nr,
                    time_cycles,
                    settings: [bias, -bias, 100.0],
                    sensors,
                }
            })
            .collect()
    }

    fn toy_inputs() -> (Vec<CycleRow>, Vec<CycleRow>, RulMap) {
        let mut train = unit_rows(1, 5, 1.0);
        train.extend(unit_rows(2, 4, 2.0));
        let test = unit_rows(1, 3, 1.5);
        let rul_map: RulMap = [(1, 7)].into_iter().collect();
        (train, test, rul_map)
    }

    #[test]
    fn test_build_shapes_and_contract_agree() {
        let (train, test, rul_map) = toy_inputs();
        let dataset = DatasetBuilder::new().build(&train, &test, &rul_map).unwrap();

        assert_eq!(dataset.x_train.nrows(), dataset.y_train.len());
        assert_eq!(dataset.x_test.nrows(), dataset.y_test.len());
        assert_eq!(dataset.x_train.ncols(), dataset.x_test.ncols());
        assert_eq!(dataset.x_train.ncols(), dataset.scaler.contract().len());
    }

    #[test]
    fn test_train_features_are_normalized() {
        let (train, test, rul_map) = toy_inputs();
        let dataset = DatasetBuilder::new().build(&train, &test, &rul_map).unwrap();
        for &v in dataset.x_train.iter() {
            assert!((-1e-9..=1.0 + 1e-9).contains(&v), "value {} outside [0,1]", v);
        }
    }

    #[test]
    fn test_targets_in_native_cycle_scale() {
        let (train, test, rul_map) = toy_inputs();
        let dataset = DatasetBuilder::new().build(&train, &test, &rul_map).unwrap();
        assert_eq!(dataset.y_train[0], 4.0);
        assert_eq!(dataset.y_train[4], 0.0);
        // Test unit observed 3 cycles with R = 7.
        assert_eq!(dataset.y_test.to_vec(), vec![9.0, 8.0, 7.0]);
    }

    #[test]
    fn test_scaler_fitted_on_train_only() {
        let (train, _, _) = toy_inputs();
        // A test set far outside the train range must not move the fit.
        let far_test = unit_rows(1, 2, 1000.0);
        let rul_map: RulMap = [(1, 3)].into_iter().collect();
        let dataset = DatasetBuilder::new().build(&train, &far_test, &rul_map).unwrap();
        assert!(dataset.x_test.iter().any(|&v| v > 1.0));
    }

    #[test]
    fn test_missing_rul_entry_aborts_build() {
        let (train, test, _) = toy_inputs();
        let empty_map = RulMap::new();
        let err = DatasetBuilder::new().build(&train, &test, &empty_map).unwrap_err();
        assert!(matches!(err, PreprocessError::Data(_)));
    }

    #[test]
    fn test_processed_csv_layout() {
        let (train, test, rul_map) = toy_inputs();
        let dataset = DatasetBuilder::new().build(&train, &test, &rul_map).unwrap();

        let dir = std::env::temp_dir().join("rul-builder-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("train_processed.csv");
        write_processed_csv(
            &path,
            dataset.scaler.contract(),
            &dataset.train_rows,
            &dataset.x_train,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("unit_nr,time_cycles,setting_1"));
        assert!(header.ends_with(",RUL"));
        assert_eq!(lines.count(), dataset.train_rows.len());
    }
}
