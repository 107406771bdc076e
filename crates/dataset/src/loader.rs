//! Raw File Loading
//!
//! Parses the whitespace-delimited cycle files and the one-value-per-line
//! true-RUL file that accompanies a truncated test set.

use crate::error::DataIntegrityError;
use crate::labeler::RulMap;
use crate::record::CycleRow;
use crate::schema::{column_names, SENSOR_COUNT, SETTING_COUNT};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Parse cycle rows from raw file content
pub fn parse_cycle_rows(content: &str) -> Result<Vec<CycleRow>, DataIntegrityError> {
    let schema = column_names();
    let mut rows = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_nr = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != schema.len() {
            return Err(DataIntegrityError::MalformedLine {
                line: line_nr,
                reason: format!(
                    "expected {} columns ({} .. {}), found {}",
                    schema.len(),
                    schema.first().map(String::as_str).unwrap_or(""),
                    schema.last().map(String::as_str).unwrap_or(""),
                    fields.len()
                ),
            });
        }

        let unit_nr = parse_id(fields[0], line_nr, "unit_nr")?;
        let time_cycles = parse_id(fields[1], line_nr, "time_cycles")?;

        let mut settings = [0.0; SETTING_COUNT];
        for (j, slot) in settings.iter_mut().enumerate() {
            *slot = parse_value(fields[2 + j], line_nr)?;
        }

        let mut sensors = [0.0; SENSOR_COUNT];
        for (j, slot) in sensors.iter_mut().enumerate() {
            *slot = parse_value(fields[2 + SETTING_COUNT + j], line_nr)?;
        }

        rows.push(CycleRow {
            unit_nr,
            time_cycles,
            settings,
            sensors,
        });
    }

    debug!("Parsed {} cycle rows", rows.len());
    Ok(rows)
}

/// Load cycle rows from a raw file on disk
pub fn load_cycle_file(path: &Path) -> Result<Vec<CycleRow>, DataIntegrityError> {
    info!("Loading cycle file: {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_cycle_rows(&content)
}

/// Parse true remaining-life values, one per line
pub fn parse_rul_values(content: &str) -> Result<Vec<u32>, DataIntegrityError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_id(line.trim(), i + 1, "RUL"))
        .collect()
}

/// Load the true-RUL file for a test set
pub fn load_rul_file(path: &Path) -> Result<Vec<u32>, DataIntegrityError> {
    info!("Loading RUL file: {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_rul_values(&content)
}

/// Build an explicit unit -> remaining-life map from positional RUL values.
///
/// The RUL file carries no unit key; line i is matched to the i-th test unit
/// in ascending `unit_nr` order. This positional join is a known fragility of
/// the source format, so the pairing is validated here: the value count must
/// equal the unit count, and downstream labeling re-checks coverage per unit.
pub fn build_rul_map(
    rows: &[CycleRow],
    rul_values: &[u32],
) -> Result<RulMap, DataIntegrityError> {
    let mut unit_ids: Vec<u32> = rows.iter().map(|r| r.unit_nr).collect();
    unit_ids.sort_unstable();
    unit_ids.dedup();

    if unit_ids.len() != rul_values.len() {
        return Err(DataIntegrityError::RulCountMismatch {
            expected: unit_ids.len(),
            found: rul_values.len(),
        });
    }

    Ok(unit_ids.into_iter().zip(rul_values.iter().copied()).collect())
}

fn parse_id(field: &str, line: usize, name: &str) -> Result<u32, DataIntegrityError> {
    let value: u32 = field
        .parse()
        .map_err(|_| DataIntegrityError::MalformedLine {
            line,
            reason: format!("{} is not a positive integer: {:?}", name, field),
        })?;
    if value == 0 {
        return Err(DataIntegrityError::MalformedLine {
            line,
            reason: format!("{} must be positive", name),
        });
    }
    Ok(value)
}

fn parse_value(field: &str, line: usize) -> Result<f64, DataIntegrityError> {
    field.parse().map_err(|_| DataIntegrityError::MalformedLine {
        line,
        reason: format!("not a number: {:?}", field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LINE: &str = "1 1 -0.0007 -0.0004 100.0 \
        518.67 641.82 1589.70 1400.60 14.62 21.61 554.36 2388.06 9046.19 1.30 \
        47.47 521.66 2388.02 8138.62 8.4195 0.03 392 2388 100.00 39.06 23.4190";

    #[test]
    fn test_parse_single_row() {
        let rows = parse_cycle_rows(SAMPLE_LINE).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit_nr, 1);
        assert_eq!(rows[0].time_cycles, 1);
        assert!((rows[0].settings[2] - 100.0).abs() < 1e-9);
        assert!((rows[0].sensors[0] - 518.67).abs() < 1e-9);
        assert!((rows[0].sensors[20] - 23.4190).abs() < 1e-9);
    }

    #[test]
    fn test_skips_blank_lines() {
        let content = format!("{}\n\n{}\n", SAMPLE_LINE, SAMPLE_LINE);
        let rows = parse_cycle_rows(&content).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_rejects_short_line() {
        let err = parse_cycle_rows("1 1 0.5 0.5 100.0").unwrap_err();
        assert!(matches!(err, DataIntegrityError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_rejects_zero_unit() {
        let line = SAMPLE_LINE.replacen("1 1", "0 1", 1);
        let err = parse_cycle_rows(&line).unwrap_err();
        assert!(matches!(err, DataIntegrityError::MalformedLine { .. }));
    }

    #[test]
    fn test_parse_rul_values() {
        let values = parse_rul_values("112\n98\n\n69\n").unwrap();
        assert_eq!(values, vec![112, 98, 69]);
    }

    #[test]
    fn test_build_rul_map_ascending_units() {
        let mut rows = parse_cycle_rows(SAMPLE_LINE).unwrap();
        let mut second = rows[0].clone();
        second.unit_nr = 3;
        rows.push(second);

        let map = build_rul_map(&rows, &[10, 20]).unwrap();
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.get(&3), Some(&20));
    }

    #[test]
    fn test_build_rul_map_count_mismatch() {
        let rows = parse_cycle_rows(SAMPLE_LINE).unwrap();
        let err = build_rul_map(&rows, &[10, 20]).unwrap_err();
        assert!(matches!(
            err,
            DataIntegrityError::RulCountMismatch { expected: 1, found: 2 }
        ));
    }
}
