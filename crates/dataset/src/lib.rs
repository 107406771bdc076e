//! Run-to-Failure Dataset Handling
//!
//! Provides raw sensor-log parsing, per-unit integrity checks, and
//! Remaining Useful Life (RUL) label derivation for train and test regimes.

mod error;
mod labeler;
mod loader;
mod record;
mod schema;

pub use error::DataIntegrityError;
pub use labeler::{label_test, label_train, RulMap};
pub use loader::{build_rul_map, load_cycle_file, load_rul_file, parse_cycle_rows, parse_rul_values};
pub use record::{CycleRow, LabeledRow};
pub use schema::{column_names, sensor_names, setting_names, SENSOR_COUNT, SETTING_COUNT};
