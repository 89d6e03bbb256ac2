//! NetCDF reader for dycore model output.
//!
//! This crate reads NetCDF-4 files into an in-memory [`Dataset`] of
//! named-axis arrays and provides xarray-style selection on them.
//!
//! # Data Structure
//!
//! Dycore output variables are laid out as
//! `(t, nens, <var>_ndofs, <grid axes...>)`, where the grid axes are either
//! primal or dual cell counts. Static fields such as the surface height
//! `hs` have no `t` axis. Soundings are three 1-D profiles along `z`.
//!
//! # Implementation Notes
//!
//! Whole variables are loaded eagerly; the datasets produced by the
//! idealized test cases are small enough to hold in memory.

pub mod dataset;
pub mod error;
pub mod native;
pub mod sounding;

pub use dataset::{DataArray, Dataset, Dimension};
pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_dataset, load_dataset_variables, silence_hdf5_errors};
pub use sounding::{load_sounding, Sounding};
