//! Errors raised while constructing machines, tables and ports.

use thiserror::Error;

/// Why a truth table was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableDefect {
    #[error("table has no rows")]
    Empty,

    #[error("key {key:?} contains characters other than '0' and '1'")]
    NonBinaryKey { key: String },

    #[error("key {key:?} has length {found}, expected {expected}")]
    KeyLength {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("key {key:?} appears more than once")]
    DuplicateKey { key: String },

    #[error("table has {found} rows, a total table over {width} inputs needs {expected}")]
    Incomplete {
        width: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {key:?} has {found} outputs, expected {expected}")]
    OutputWidth {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("row {key:?} contains a disconnected value")]
    DisallowedValue { key: String },
}

/// Errors for the machine-level building blocks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid machine name: {0:?}")]
    InvalidMachineName(String),

    #[error("invalid truth table: {0}")]
    InvalidTruthTable(#[from] TableDefect),

    #[error("{0} is not a port")]
    NotAPort(i64),
}
