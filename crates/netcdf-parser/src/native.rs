//! Native NetCDF reading using the netcdf library.
//!
//! Loads whole variables into a [`Dataset`]. Packed variables are unpacked
//! (`scale_factor`/`add_offset`) and `_FillValue` entries become NaN, so
//! callers only ever see physical values as `f64`.

use std::path::Path;
use std::sync::Once;

use tracing::{debug, info};

use ndarray::{ArrayD, IxDyn};

use crate::dataset::{DataArray, Dataset};
use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist).
///
/// This function disables that output by calling H5Eset_auto2 with null handlers.
/// It only needs to be called once per process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Load every variable of a NetCDF file into memory.
pub fn load_dataset(path: impl AsRef<Path>) -> NetCdfResult<Dataset> {
    load_filtered(path.as_ref(), |_| true)
}

/// Load only the named variables (plus every dimension of the file).
///
/// Names that are absent from the file are skipped; callers that need them
/// get a `MissingVariable` error when they look them up.
pub fn load_dataset_variables(path: impl AsRef<Path>, names: &[&str]) -> NetCdfResult<Dataset> {
    load_filtered(path.as_ref(), |name| names.contains(&name))
}

fn load_filtered<F>(path: &Path, keep: F) -> NetCdfResult<Dataset>
where
    F: Fn(&str) -> bool,
{
    silence_hdf5_errors();

    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let nc_file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let mut dataset = Dataset::new();

    for dim in nc_file.dimensions() {
        dataset.declare_dimension(dim.name(), dim.len())?;
    }

    for var in nc_file.variables() {
        let name = var.name();
        if !keep(&name) {
            continue;
        }
        let array = read_array(&var)?;
        debug!(variable = %name, shape = ?array.shape(), "Loaded variable");
        dataset.insert(array)?;
    }

    info!(
        path = %path.display(),
        variables = dataset.variable_names().count(),
        "Loaded NetCDF dataset"
    );

    Ok(dataset)
}

/// Read one variable with its axes, unpacking and masking fill values.
fn read_array(var: &netcdf::Variable) -> NetCdfResult<DataArray> {
    let name = var.name();
    let axes: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();

    // netcdf-c converts any stored numeric type to double on read
    let raw = var
        .get::<f64, _>(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f64_attr(var, "_FillValue");

    let shape = raw.shape().to_vec();
    let values: Vec<f64> = raw
        .iter()
        .map(|&val| {
            if fill_value == Some(val) {
                f64::NAN
            } else {
                val * scale_factor + add_offset
            }
        })
        .collect();
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values)
        .map_err(|e| NetCdfError::ShapeMismatch(format!("{}: {}", name, e)))?;

    let array = DataArray::from_array(name, axes, data)?;
    Ok(match get_string_attr(var, "units") {
        Some(units) => array.with_units(units),
        None => array,
    })
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Double(d) => Some(d),
        netcdf::AttributeValue::Float(f) => Some(f as f64),
        netcdf::AttributeValue::Int(i) => Some(i as f64),
        netcdf::AttributeValue::Short(s) => Some(s as f64),
        _ => None,
    }
}

/// Helper to get a text attribute.
fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
