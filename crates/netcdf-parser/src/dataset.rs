//! In-memory named-axis arrays.
//!
//! A [`Dataset`] is a set of [`DataArray`]s whose axes are identified by name.
//! Values live in an `ndarray::ArrayD`. Selection by axis name
//! ([`DataArray::isel`]) drops the selected axes and keeps the rest in their
//! original order, so a 5-D model variable indexed on three axes comes back
//! as a 2-D slice.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayD, Axis, IxDyn};

use crate::error::{NetCdfError, NetCdfResult};

/// A named axis and its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// A multi-dimensional array labeled by named axes.
///
/// Data is held in standard (row-major) layout so [`DataArray::values`] can
/// hand out a flat slice.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: String,
    axes: Vec<String>,
    data: ArrayD<f64>,
    units: Option<String>,
}

impl DataArray {
    /// Create an array, checking that `values` fills the shape exactly.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<Dimension>,
        values: Vec<f64>,
    ) -> NetCdfResult<Self> {
        let name = name.into();
        let shape: Vec<usize> = dims.iter().map(|d| d.len).collect();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
            NetCdfError::ShapeMismatch(format!("'{}' does not fit shape {:?}: {}", name, shape, e))
        })?;
        Self::from_array(name, dims.into_iter().map(|d| d.name).collect(), data)
    }

    /// Wrap an existing array, one axis name per array dimension.
    pub fn from_array(
        name: impl Into<String>,
        axes: Vec<String>,
        data: ArrayD<f64>,
    ) -> NetCdfResult<Self> {
        let name = name.into();
        if axes.len() != data.ndim() {
            return Err(NetCdfError::ShapeMismatch(format!(
                "'{}' has {} axis names for a {}-D array",
                name,
                axes.len(),
                data.ndim()
            )));
        }
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].contains(axis) {
                return Err(NetCdfError::InvalidFormat(format!(
                    "'{}' repeats dimension '{}'",
                    name, axis
                )));
            }
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self {
            name,
            axes,
            data,
            units: None,
        })
    }

    /// Convenience constructor for 1-D arrays.
    pub fn from_vec(name: impl Into<String>, dim: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            axes: vec![dim.into()],
            data: Array1::from(values).into_dyn(),
            units: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis names, outermost first.
    pub fn dim_names(&self) -> &[String] {
        &self.axes
    }

    /// Axis names paired with their lengths.
    pub fn dims(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.axes
            .iter()
            .zip(self.data.shape())
            .map(|(name, &len)| Dimension::new(name.clone(), len))
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Values in row-major order.
    pub fn values(&self) -> &[f64] {
        // Constructors keep standard layout, so this is always contiguous
        self.data.as_slice().unwrap_or(&[])
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.data.shape().to_vec()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the named axis, if this array has it.
    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.axis(name).map(|axis| self.data.len_of(Axis(axis)))
    }

    fn axis(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a == name)
    }

    /// Select one index along each named axis.
    ///
    /// Selected axes are removed from the result; the remaining axes keep
    /// their order. Selecting every axis yields a 0-D array with one value.
    pub fn isel(&self, selectors: &[(&str, usize)]) -> NetCdfResult<DataArray> {
        let mut picks: Vec<(usize, usize)> = Vec::with_capacity(selectors.len());

        for &(dim_name, index) in selectors {
            let axis = self
                .axis(dim_name)
                .ok_or_else(|| NetCdfError::MissingDimension {
                    variable: self.name.clone(),
                    dimension: dim_name.to_string(),
                })?;
            if picks.iter().any(|&(picked, _)| picked == axis) {
                return Err(NetCdfError::InvalidFormat(format!(
                    "dimension '{}' of '{}' selected twice",
                    dim_name, self.name
                )));
            }
            let len = self.data.len_of(Axis(axis));
            if index >= len {
                return Err(NetCdfError::IndexOutOfRange {
                    variable: self.name.clone(),
                    dimension: dim_name.to_string(),
                    index,
                    len,
                });
            }
            picks.push((axis, index));
        }

        // Innermost first so earlier axis numbers stay valid
        picks.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        let mut view = self.data.view();
        for &(axis, index) in &picks {
            view = view.index_axis_move(Axis(axis), index);
        }

        let axes = self
            .axes
            .iter()
            .enumerate()
            .filter(|(i, _)| !picks.iter().any(|&(axis, _)| axis == *i))
            .map(|(_, name)| name.clone())
            .collect();

        Ok(DataArray {
            name: self.name.clone(),
            axes,
            data: view.as_standard_layout().into_owned(),
            units: self.units.clone(),
        })
    }

    /// Elementwise quotient `self / other`. Shapes must match exactly.
    pub fn divide(&self, other: &DataArray) -> NetCdfResult<DataArray> {
        if self.data.shape() != other.data.shape() {
            return Err(NetCdfError::ShapeMismatch(format!(
                "cannot divide '{}' {:?} by '{}' {:?}",
                self.name,
                self.shape(),
                other.name,
                other.shape()
            )));
        }
        Ok(DataArray {
            name: format!("{}/{}", self.name, other.name),
            axes: self.axes.clone(),
            data: &self.data / &other.data,
            units: None,
        })
    }

    /// Number of exactly-zero values.
    pub fn count_zeros(&self) -> usize {
        self.data.iter().filter(|&&v| v == 0.0).count()
    }
}

/// A collection of named arrays sharing a consistent set of named axes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    dimensions: BTreeMap<String, usize>,
    variables: BTreeMap<String, DataArray>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an axis without attaching it to a variable.
    pub fn declare_dimension(&mut self, name: impl Into<String>, len: usize) -> NetCdfResult<()> {
        let name = name.into();
        match self.dimensions.get(&name) {
            Some(&existing) if existing != len => Err(NetCdfError::InconsistentDimension {
                dimension: name,
                variable: "<dataset>".to_string(),
                expected: existing,
                found: len,
            }),
            _ => {
                self.dimensions.insert(name, len);
                Ok(())
            }
        }
    }

    /// Add a variable. Every axis it carries must agree in length with
    /// axes of the same name already in the dataset.
    pub fn insert(&mut self, array: DataArray) -> NetCdfResult<()> {
        for dim in array.dims() {
            if let Some(&expected) = self.dimensions.get(&dim.name) {
                if expected != dim.len {
                    return Err(NetCdfError::InconsistentDimension {
                        dimension: dim.name.clone(),
                        variable: array.name().to_string(),
                        expected,
                        found: dim.len,
                    });
                }
            }
        }
        for dim in array.dims() {
            self.dimensions.insert(dim.name.clone(), dim.len);
        }
        self.variables.insert(array.name().to_string(), array);
        Ok(())
    }

    /// Length of a named axis.
    pub fn dim(&self, name: &str) -> NetCdfResult<usize> {
        self.dimensions
            .get(name)
            .copied()
            .ok_or_else(|| NetCdfError::MissingDimension {
                variable: "<dataset>".to_string(),
                dimension: name.to_string(),
            })
    }

    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dimensions.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> NetCdfResult<&DataArray> {
        self.variables
            .get(name)
            .ok_or_else(|| NetCdfError::MissingVariable(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.dimensions.iter().map(|(name, &len)| (name.as_str(), len))
    }
}
