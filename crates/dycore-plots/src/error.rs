//! Error types for the plotting pipeline.

use dycore_common::PlotError;
use netcdf_parser::NetCdfError;
use thiserror::Error;

/// Errors that can occur while planning or rendering plots.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read dataset: {0}")]
    NetCdf(#[from] NetCdfError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("Failed to render '{label}': {message}")]
    Render { label: String, message: String },

    #[error("Cannot plot '{label}': expected a 1-D or 2-D slice, found {rank}-D")]
    UnsupportedRank { label: String, rank: usize },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
