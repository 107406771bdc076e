//! Feature Contract
//!
//! The ordered, named list of model-input columns. One instance is fixed at
//! fit time, persisted with the scaler, and reused verbatim at dataset-build
//! time, single-row inference time, and drift-check time.

use crate::SchemaMismatchError;
use dataset::{sensor_names, setting_names, CycleRow};
use serde::{Deserialize, Serialize};

/// Sensor channels excluded at design time: constant or near-zero variance
/// in the reference exploratory analysis of FD001.
pub const EXCLUDED_SENSORS: [&str; 6] = ["s_1", "s_5", "s_10", "s_16", "s_18", "s_19"];

/// Ordered list of feature column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureContract {
    columns: Vec<String>,
}

impl FeatureContract {
    /// The standard contract: the 3 operational settings followed by the
    /// retained sensors, in ingestion order.
    pub fn standard() -> Self {
        let mut names = setting_names();
        names.extend(sensor_names());
        Self::select(&names, &EXCLUDED_SENSORS)
    }

    /// Keep `names` in their given order, dropping any listed in `excluded`.
    pub fn select(names: &[String], excluded: &[&str]) -> Self {
        let columns = names
            .iter()
            .filter(|name| !excluded.contains(&name.as_str()))
            .cloned()
            .collect();
        Self { columns }
    }

    /// Column names, in contract order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of feature columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the contract is empty
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if the contract contains it
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check that `columns` is exactly this contract: same names, same order
    pub fn validate_columns(&self, columns: &[String]) -> Result<(), SchemaMismatchError> {
        if columns.len() != self.columns.len() {
            return Err(SchemaMismatchError::ColumnCount {
                expected: self.columns.len(),
                actual: columns.len(),
            });
        }
        for (index, (expected, actual)) in self.columns.iter().zip(columns).enumerate() {
            if expected != actual {
                return Err(SchemaMismatchError::ColumnName {
                    index,
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }
        Ok(())
    }

    /// Extract a raw feature row from a cycle row, in contract order
    pub fn extract_row(&self, row: &CycleRow) -> Result<Vec<f64>, SchemaMismatchError> {
        self.columns
            .iter()
            .map(|name| {
                row.value_by_name(name)
                    .ok_or_else(|| SchemaMismatchError::UnknownColumn(name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::{SENSOR_COUNT, SETTING_COUNT};

    #[test]
    fn test_standard_contract_shape() {
        let contract = FeatureContract::standard();
        assert_eq!(
            contract.len(),
            SETTING_COUNT + SENSOR_COUNT - EXCLUDED_SENSORS.len()
        );
        assert_eq!(contract.columns()[0], "setting_1");
        assert_eq!(contract.columns()[SETTING_COUNT], "s_2");
        assert!(contract.index_of("s_1").is_none());
        assert!(contract.index_of("s_16").is_none());
        assert_eq!(contract.columns().last().map(String::as_str), Some("s_21"));
    }

    #[test]
    fn test_select_preserves_caller_order() {
        let names = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let contract = FeatureContract::select(&names, &["a"]);
        assert_eq!(contract.columns().to_vec(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_validate_columns_detects_reorder() {
        let contract = FeatureContract::standard();
        let mut columns = contract.columns().to_vec();
        columns.swap(0, 1);
        let err = contract.validate_columns(&columns).unwrap_err();
        assert!(matches!(err, SchemaMismatchError::ColumnName { index: 0, .. }));
    }

    #[test]
    fn test_validate_columns_detects_missing() {
        let contract = FeatureContract::standard();
        let columns = contract.columns()[1..].to_vec();
        let err = contract.validate_columns(&columns).unwrap_err();
        assert!(matches!(err, SchemaMismatchError::ColumnCount { .. }));
    }

    #[test]
    fn test_extract_row_follows_contract_order() {
        let contract = FeatureContract::standard();
        let mut sensors = [0.0; SENSOR_COUNT];
        sensors[1] = 641.82; // s_2
        let row = CycleRow {
            unit_nr: 1,
            time_cycles: 1,
            settings: [0.25, -0.5, 100.0],
            sensors,
        };
        let values = contract.extract_row(&row).unwrap();
        assert_eq!(values.len(), contract.len());
        assert!((values[0] - 0.25).abs() < 1e-12);
        assert!((values[SETTING_COUNT] - 641.82).abs() < 1e-12);
    }
}
