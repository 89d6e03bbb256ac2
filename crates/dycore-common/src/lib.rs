//! Common types shared by the dycore plotting tools.
//!
//! Holds the closed table of model variants, the density-slot naming that
//! derives from it, and the error type for both.

pub mod error;
pub mod model;
pub mod naming;

pub use error::{PlotError, PlotResult};
pub use model::{ModelVariant, VariantProfile};
pub use naming::{DensityNames, DensitySlot};
