//! Data Integrity Error Types

use thiserror::Error;

/// Errors raised while parsing or labeling run-to-failure logs
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    /// A raw input line could not be parsed
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// A unit's cycle sequence is not exactly 1..=max_cycle
    #[error("unit {unit_nr} has a broken cycle sequence: expected cycle {expected}, found {found}")]
    NonContiguousCycles {
        unit_nr: u32,
        expected: u32,
        found: u32,
    },

    /// A unit referenced by the RUL mapping has no rows
    #[error("unit {unit_nr} has zero rows")]
    EmptyUnit { unit_nr: u32 },

    /// A test unit is present in the rows but has no true-RUL entry
    #[error("no remaining-life entry for test unit {unit_nr}")]
    MissingRulEntry { unit_nr: u32 },

    /// The RUL file does not line up with the test units
    #[error("RUL file has {found} entries but the test set has {expected} units")]
    RulCountMismatch { expected: usize, found: usize },

    /// I/O failure reading a raw file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
