//! Error types for vtkscan-rs.

use thiserror::Error;

/// The main error type for vtkscan-rs operations.
#[derive(Error, Debug)]
pub enum VtkError {
    /// The file cannot be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The version, format, or dataset line does not match the legacy grammar.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// A section body does not match its expected grammar.
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    /// ASCII files, STRUCTURED_GRID bodies, or unrecognized numeric type names.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A cell-type code with no registered handler.
    #[error("unregistered cell type {0}")]
    UnregisteredCellType(i32),

    /// A topology record's declared point count disagrees with the handler's arity.
    #[error("cell {cell}: topology declares {declared} points, handler expects {expected}")]
    TopologyMismatch {
        cell: u32,
        declared: i32,
        expected: u32,
    },

    /// The parser has no parsed dataset, or the dataset kind does not match the request.
    #[error("dataset not available: {0}")]
    DatasetUnavailable(String),
}

/// A specialized Result type for vtkscan-rs operations.
pub type Result<T> = std::result::Result<T, VtkError>;
