//! Raw File Column Schema
//!
//! Fixed column layout of the whitespace-delimited C-MAPSS files:
//! `unit_nr, time_cycles, setting_1..3, s_1..s_21`, no header row.

/// Number of operational-setting columns
pub const SETTING_COUNT: usize = 3;

/// Number of sensor channels at ingestion
pub const SENSOR_COUNT: usize = 21;

/// Names of the operational-setting columns, in file order
pub fn setting_names() -> Vec<String> {
    (1..=SETTING_COUNT).map(|i| format!("setting_{}", i)).collect()
}

/// Names of the sensor columns, in file order
pub fn sensor_names() -> Vec<String> {
    (1..=SENSOR_COUNT).map(|i| format!("s_{}", i)).collect()
}

/// Full raw column list: identifiers, settings, then sensors
pub fn column_names() -> Vec<String> {
    let mut names = vec!["unit_nr".to_string(), "time_cycles".to_string()];
    names.extend(setting_names());
    names.extend(sensor_names());
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_layout() {
        let names = column_names();
        assert_eq!(names.len(), 2 + SETTING_COUNT + SENSOR_COUNT);
        assert_eq!(names[0], "unit_nr");
        assert_eq!(names[2], "setting_1");
        assert_eq!(names[5], "s_1");
        assert_eq!(names.last().map(String::as_str), Some("s_21"));
    }
}
