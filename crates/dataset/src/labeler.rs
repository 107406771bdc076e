//! RUL Label Derivation
//!
//! Attaches a Remaining Useful Life target to every cycle row. Train units
//! are observed through failure, so the last row of a unit has RUL 0. Test
//! units are truncated before failure and carry an externally supplied true
//! remaining life `R` at their last observed cycle.

use crate::error::DataIntegrityError;
use crate::record::{CycleRow, LabeledRow};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Explicit unit -> true-remaining-life mapping for a test set
pub type RulMap = BTreeMap<u32, u32>;

/// Label train-regime rows: `RUL = max_cycle(unit) - time_cycles`
pub fn label_train(rows: &[CycleRow]) -> Result<Vec<LabeledRow>, DataIntegrityError> {
    let max_cycles = validate_units(rows)?;
    debug!("Labeling {} train rows across {} units", rows.len(), max_cycles.len());

    Ok(rows
        .iter()
        .map(|row| LabeledRow {
            row: row.clone(),
            rul: max_cycles[&row.unit_nr] - row.time_cycles,
        })
        .collect())
}

/// Label test-regime rows: `RUL = (max_cycle(unit) + R) - time_cycles`.
///
/// Every unit present in `rows` must have an entry in `rul_map`; a missing
/// entry is a hard error, never a silent default of zero.
pub fn label_test(
    rows: &[CycleRow],
    rul_map: &RulMap,
) -> Result<Vec<LabeledRow>, DataIntegrityError> {
    let max_cycles = validate_units(rows)?;
    debug!("Labeling {} test rows across {} units", rows.len(), max_cycles.len());

    for unit_nr in rul_map.keys() {
        if !max_cycles.contains_key(unit_nr) {
            return Err(DataIntegrityError::EmptyUnit { unit_nr: *unit_nr });
        }
    }

    let mut total_life = BTreeMap::new();
    for (unit_nr, max_cycle) in &max_cycles {
        let remaining = rul_map
            .get(unit_nr)
            .ok_or(DataIntegrityError::MissingRulEntry { unit_nr: *unit_nr })?;
        total_life.insert(*unit_nr, max_cycle + remaining);
    }

    Ok(rows
        .iter()
        .map(|row| LabeledRow {
            row: row.clone(),
            rul: total_life[&row.unit_nr] - row.time_cycles,
        })
        .collect())
}

/// Check per-unit cycle contiguity and return each unit's max cycle.
///
/// For every unit the observed cycle sequence must be exactly 1..=max_cycle,
/// in order, with no gaps or duplicates.
fn validate_units(rows: &[CycleRow]) -> Result<BTreeMap<u32, u32>, DataIntegrityError> {
    let mut max_cycles: BTreeMap<u32, u32> = BTreeMap::new();

    for row in rows {
        let expected = max_cycles.get(&row.unit_nr).copied().unwrap_or(0) + 1;
        if row.time_cycles != expected {
            return Err(DataIntegrityError::NonContiguousCycles {
                unit_nr: row.unit_nr,
                expected,
                found: row.time_cycles,
            });
        }
        max_cycles.insert(row.unit_nr, row.time_cycles);
    }

    if max_cycles.is_empty() {
        warn!("Labeling requested on an empty row set");
    }

    Ok(max_cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SENSOR_COUNT, SETTING_COUNT};
    use proptest::prelude::*;

    fn unit_rows(unit_nr: u32, cycles: u32) -> Vec<CycleRow> {
        (1..=cycles)
            .map(|time_cycles| CycleRow {
                unit_nr,
                time_cycles,
                settings: [0.0; SETTING_COUNT],
                sensors: [0.0; SENSOR_COUNT],
            })
            .collect()
    }

    #[test]
    fn test_train_rul_counts_down_to_zero() {
        let rows = unit_rows(1, 5);
        let labeled = label_train(&rows).unwrap();
        let ruls: Vec<u32> = labeled.iter().map(|l| l.rul).collect();
        assert_eq!(ruls, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_train_multiple_units_independent() {
        let mut rows = unit_rows(1, 3);
        rows.extend(unit_rows(2, 2));
        let labeled = label_train(&rows).unwrap();
        let ruls: Vec<u32> = labeled.iter().map(|l| l.rul).collect();
        assert_eq!(ruls, vec![2, 1, 0, 1, 0]);
    }

    #[test]
    fn test_test_rul_offsets_by_true_remaining_life() {
        let rows = unit_rows(1, 3);
        let rul_map: RulMap = [(1, 7)].into_iter().collect();
        let labeled = label_test(&rows, &rul_map).unwrap();
        let ruls: Vec<u32> = labeled.iter().map(|l| l.rul).collect();
        // Total life is 3 + 7 = 10; last observed row keeps RUL = R.
        assert_eq!(ruls, vec![9, 8, 7]);
    }

    #[test]
    fn test_missing_rul_entry_is_an_error() {
        let mut rows = unit_rows(1, 3);
        rows.extend(unit_rows(2, 4));
        let rul_map: RulMap = [(1, 7)].into_iter().collect();
        let err = label_test(&rows, &rul_map).unwrap_err();
        assert!(matches!(err, DataIntegrityError::MissingRulEntry { unit_nr: 2 }));
    }

    #[test]
    fn test_rul_entry_without_rows_is_an_error() {
        let rows = unit_rows(1, 3);
        let rul_map: RulMap = [(1, 7), (9, 2)].into_iter().collect();
        let err = label_test(&rows, &rul_map).unwrap_err();
        assert!(matches!(err, DataIntegrityError::EmptyUnit { unit_nr: 9 }));
    }

    #[test]
    fn test_cycle_gap_is_an_error() {
        let mut rows = unit_rows(1, 4);
        rows.remove(2); // drop cycle 3
        let err = label_train(&rows).unwrap_err();
        assert!(matches!(
            err,
            DataIntegrityError::NonContiguousCycles { unit_nr: 1, expected: 3, found: 4 }
        ));
    }

    #[test]
    fn test_cycle_not_starting_at_one_is_an_error() {
        let mut rows = unit_rows(1, 3);
        rows.remove(0);
        let err = label_train(&rows).unwrap_err();
        assert!(matches!(
            err,
            DataIntegrityError::NonContiguousCycles { unit_nr: 1, expected: 1, found: 2 }
        ));
    }

    proptest! {
        #[test]
        fn prop_train_rul_strictly_decreasing(lengths in proptest::collection::vec(1u32..60, 1..6)) {
            let mut rows = Vec::new();
            for (i, len) in lengths.iter().enumerate() {
                rows.extend(unit_rows(i as u32 + 1, *len));
            }
            let labeled = label_train(&rows).unwrap();

            for window in labeled.windows(2) {
                if window[0].row.unit_nr == window[1].row.unit_nr {
                    prop_assert_eq!(window[0].rul, window[1].rul + 1);
                }
            }
            for l in &labeled {
                let is_last = l.row.time_cycles == lengths[(l.row.unit_nr - 1) as usize];
                prop_assert_eq!(l.rul == 0, is_last);
            }
        }

        #[test]
        fn prop_test_rul_ends_at_supplied_r(len in 1u32..60, r in 0u32..150) {
            let rows = unit_rows(1, len);
            let rul_map: RulMap = [(1, r)].into_iter().collect();
            let labeled = label_test(&rows, &rul_map).unwrap();
            prop_assert_eq!(labeled.last().unwrap().rul, r);
            for window in labeled.windows(2) {
                prop_assert_eq!(window[0].rul, window[1].rul + 1);
            }
        }
    }
}
