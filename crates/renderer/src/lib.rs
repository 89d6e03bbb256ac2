//! Raster rendering for dycore diagnostics.
//!
//! Implements the plot types the plotting tools need:
//! - Scalar field heatmaps with a colorbar
//! - Time-series line plots
//! - Skew-T log-P sounding diagrams
//!
//! Everything renders onto a `tiny_skia::Pixmap`, with labels set in an
//! embedded font through rusttype, and is encoded with the in-crate PNG
//! writer.

pub mod colormap;
mod draw;
pub mod heatmap;
pub mod png;
pub mod series;
pub mod skewt;
pub mod style;
pub mod text;
pub mod thermo;

pub use colormap::{Color, Colormap};
pub use heatmap::{render_field, FieldPlotOptions};
pub use png::encode_pixmap;
pub use series::{relative_change, render_series, SeriesPlotOptions};
pub use skewt::{LineStyle, SkewT, SkewTConfig};
pub use style::{ColormapConfig, StyleError};
pub use text::PlotLabels;
