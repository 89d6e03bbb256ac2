//! Plot pipeline for dycore output.
//!
//! A run is split in two steps:
//!
//! 1. [`PlotPlan::build`] turns a model variant and the dataset's axis sizes
//!    into an ordered list of plot requests.
//! 2. [`execute_plan`] resolves each request against the loaded dataset and
//!    hands the data to a [`PlotSink`], such as [`PngFileSink`].
//!
//! Soundings skip the plan and go straight to [`render_sounding`].

pub mod config;
pub mod error;
pub mod execute;
pub mod logging;
pub mod plan;
pub mod sink;
pub mod sounding;

pub use config::PlotConfig;
pub use error::{PipelineError, PipelineResult};
pub use execute::{execute_plan, ExecutionSummary, PlotSink};
pub use logging::init_tracing;
pub use plan::{PlanDims, PlanOptions, PlotKind, PlotPlan, PlotRequest, PlotSource, Selection};
pub use sink::PngFileSink;
pub use sounding::render_sounding;
