//! Cycle Row Types

use crate::schema::{SENSOR_COUNT, SETTING_COUNT};
use serde::{Deserialize, Serialize};

/// One observation of a unit at a discrete time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRow {
    /// Unit identifier (positive, unique within one file)
    pub unit_nr: u32,
    /// Time step, contiguous from 1 per unit
    pub time_cycles: u32,
    /// Operational settings, in file order
    pub settings: [f64; SETTING_COUNT],
    /// Sensor readings, in file order
    pub sensors: [f64; SENSOR_COUNT],
}

impl CycleRow {
    /// Look up a settings or sensor value by its schema column name
    pub fn value_by_name(&self, name: &str) -> Option<f64> {
        if let Some(idx) = name.strip_prefix("setting_") {
            let idx: usize = idx.parse().ok()?;
            return (1..=SETTING_COUNT).contains(&idx).then(|| self.settings[idx - 1]);
        }
        if let Some(idx) = name.strip_prefix("s_") {
            let idx: usize = idx.parse().ok()?;
            return (1..=SENSOR_COUNT).contains(&idx).then(|| self.sensors[idx - 1]);
        }
        None
    }
}

/// A cycle row with its derived RUL target attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    /// The source observation
    pub row: CycleRow,
    /// Remaining useful life, in cycles
    pub rul: u32,
}
