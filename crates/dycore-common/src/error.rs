//! Error types for model resolution and plot planning.

use thiserror::Error;

use crate::model::ModelVariant;

/// Result type alias using PlotError.
pub type PlotResult<T> = Result<T, PlotError>;

/// Errors raised while resolving a model variant or planning plots.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Unknown model variant '{0}' (expected one of: swe, tswe, ce, mce)")]
    UnknownModel(String),

    #[error(
        "Model '{model}' has {required} prognostic densities but the dataset only has {available} density slots"
    )]
    InsufficientDensitySlots {
        model: ModelVariant,
        required: usize,
        available: usize,
    },

    #[error("Ensemble member {requested} out of range (dataset has {available})")]
    InvalidEnsemble { requested: usize, available: usize },
}

impl PlotError {
    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            PlotError::UnknownModel(_) => "unknown_model",
            PlotError::InsufficientDensitySlots { .. } => "insufficient_density_slots",
            PlotError::InvalidEnsemble { .. } => "invalid_ensemble",
        }
    }
}
