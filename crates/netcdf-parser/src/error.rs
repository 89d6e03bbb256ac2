//! Error types for NetCDF reading and array selection.

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Variable not present in the dataset
    #[error("Variable not found: {0}")]
    MissingVariable(String),

    /// Named axis not present on a variable
    #[error("Dimension '{dimension}' not found on '{variable}'")]
    MissingDimension { variable: String, dimension: String },

    /// Selection index past the end of an axis
    #[error("Index {index} out of range for dimension '{dimension}' of '{variable}' (length {len})")]
    IndexOutOfRange {
        variable: String,
        dimension: String,
        index: usize,
        len: usize,
    },

    /// Same axis name with different sizes across variables
    #[error("Dimension '{dimension}' has length {found} on '{variable}', expected {expected}")]
    InconsistentDimension {
        dimension: String,
        variable: String,
        expected: usize,
        found: usize,
    },

    /// Arrays that must line up do not
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}
