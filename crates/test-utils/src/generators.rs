//! Synthetic dycore output and sounding files.
//!
//! Values follow simple closed-form patterns so tests can check exactly
//! what a selection returns. Every density slot is strictly positive, so
//! ratio fields are finite.

use std::path::Path;

use netcdf_parser::{DataArray, Dataset, Dimension, NetCdfResult};

use crate::fixtures::shapes::DycoreShape;
use crate::fixtures::soundings;

/// One variable to generate: name, axes, and a value function of the
/// multi-index.
struct VarSpec {
    name: &'static str,
    dims: Vec<(String, usize)>,
    value: fn(&[usize]) -> f64,
}

fn dim(name: &str, len: usize) -> (String, usize) {
    (name.to_string(), len)
}

/// Density value at time `t`, member `n`, slot `l`, cell (`z`, `x`).
///
/// Slot `l` is `(l + 1)` times slot 0, so `dens[l] / dens[0] == l + 1`.
pub fn density_value(t: usize, n: usize, l: usize, z: usize, x: usize) -> f64 {
    (l + 1) as f64 * (1.0 + 0.1 * t as f64 + 0.01 * x as f64 + 0.001 * z as f64 + n as f64)
}

/// Scalar statistic value at time `t`, member `n`, component `k`.
pub fn statistic_value(t: usize, n: usize, k: usize) -> f64 {
    100.0 * (k + 1) as f64 + n as f64 + 1e-3 * t as f64
}

fn series(name: &'static str, ndofs: usize, shape: &DycoreShape) -> VarSpec {
    VarSpec {
        name,
        dims: vec![
            dim("t", shape.nt),
            dim("nens", shape.nens),
            dim(&format!("{}_ndofs", name), ndofs),
        ],
        value: |i| statistic_value(i[0], i[1], i[2]),
    }
}

fn grid_field(
    name: &'static str,
    ndofs: usize,
    grid: &str,
    nz: usize,
    shape: &DycoreShape,
    value: fn(&[usize]) -> f64,
) -> VarSpec {
    VarSpec {
        name,
        dims: vec![
            dim("t", shape.nt),
            dim("nens", shape.nens),
            dim(&format!("{}_ndofs", name), ndofs),
            dim(&format!("{}_ncells_z", grid), nz),
            dim(&format!("{}_ncells_y", grid), 1),
            dim(&format!("{}_ncells_x", grid), shape.nx),
        ],
        value,
    }
}

fn specs(shape: &DycoreShape) -> Vec<VarSpec> {
    let d = shape.ndensity;
    let dual_nz = shape.dual_nz();
    vec![
        series("mass", d, shape),
        series("densmin", d, shape),
        series("densmax", d, shape),
        series("energy", 4, shape),
        series("pens", 1, shape),
        series("pv", 1, shape),
        grid_field("dens", d, "dual", dual_nz, shape, |i| {
            density_value(i[0], i[1], i[2], i[3], i[5])
        }),
        grid_field("densl", d, "primal", shape.nz, shape, |i| {
            density_value(i[0], i[1], i[2], i[3], i[5]) * 0.5
        }),
        grid_field("QXZl", 1, "dual", dual_nz, shape, |i| {
            (i[5] as f64 - i[3] as f64) * 0.1 + i[0] as f64
        }),
        grid_field("v", 1, "primal", shape.nz, shape, |i| {
            (i[5] as f64 * 0.5).sin() + i[0] as f64
        }),
        grid_field("w", 1, "primal", shape.nz, shape, |i| {
            (i[3] as f64 * 0.5).cos() - i[0] as f64
        }),
        VarSpec {
            name: "hs",
            dims: vec![
                dim("nens", shape.nens),
                dim("hs_ndofs", 1),
                dim("dual_ncells_y", 1),
                dim("dual_ncells_x", shape.nx),
            ],
            value: |i| 10.0 * (i[3] as f64 * 0.3).sin().abs(),
        },
        VarSpec {
            name: "coriolisxz",
            dims: vec![
                dim("nens", shape.nens),
                dim("coriolisxz_ndofs", 1),
                dim("primal_ncells_z", shape.nz),
                dim("primal_ncells_y", 1),
                dim("primal_ncells_x", shape.nx),
            ],
            value: |_| 1e-4,
        },
    ]
}

/// Evaluate `value` over every multi-index of `lens`, last axis fastest.
fn fill(lens: &[usize], value: fn(&[usize]) -> f64) -> Vec<f64> {
    let total: usize = lens.iter().product();
    let mut out = Vec::with_capacity(total);
    let mut index = vec![0usize; lens.len()];
    for _ in 0..total {
        out.push(value(&index));
        for axis in (0..lens.len()).rev() {
            index[axis] += 1;
            if index[axis] < lens[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    out
}

/// Build a synthetic dycore dataset in memory.
pub fn create_dycore_dataset(shape: &DycoreShape) -> NetCdfResult<Dataset> {
    let mut dataset = Dataset::new();
    for spec in specs(shape) {
        let lens: Vec<usize> = spec.dims.iter().map(|(_, len)| *len).collect();
        let dims = spec
            .dims
            .iter()
            .map(|(name, len)| Dimension::new(name.clone(), *len))
            .collect();
        dataset.insert(DataArray::new(spec.name, dims, fill(&lens, spec.value))?)?;
    }
    Ok(dataset)
}

/// Write the same synthetic dataset as a NetCDF file.
pub fn write_dycore_file(path: &Path, shape: &DycoreShape) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    let specs = specs(shape);

    let mut declared: Vec<&str> = Vec::new();
    for spec in &specs {
        for (name, len) in &spec.dims {
            if !declared.contains(&name.as_str()) {
                file.add_dimension(name, *len)?;
                declared.push(name);
            }
        }
    }

    for spec in &specs {
        let names: Vec<&str> = spec.dims.iter().map(|(name, _)| name.as_str()).collect();
        let lens: Vec<usize> = spec.dims.iter().map(|(_, len)| *len).collect();
        let mut var = file.add_variable::<f64>(spec.name, &names)?;
        var.put_values(&fill(&lens, spec.value), ..)?;
    }
    Ok(())
}

/// Write a sounding file in model units (Pa, K, °C) with a `z` coordinate.
pub fn write_sounding_file(path: &Path) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    let n = soundings::PRESSURE_PA.len();
    file.add_dimension("z", n)?;

    let mut p = file.add_variable::<f64>("pressure", &["z"])?;
    p.put_values(&soundings::PRESSURE_PA, ..)?;
    let mut t = file.add_variable::<f64>("temperature", &["z"])?;
    t.put_values(&soundings::TEMPERATURE_K, ..)?;
    let mut td = file.add_variable::<f64>("dew_point", &["z"])?;
    td.put_values(&soundings::DEW_POINT_C, ..)?;
    let mut z = file.add_variable::<f64>("z", &["z"])?;
    z.put_values(&soundings::HEIGHT_M, ..)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::shapes::SWE_MINIMAL;

    #[test]
    fn test_fill_order() {
        let v = fill(&[2, 3], |i| (i[0] * 10 + i[1]) as f64);
        assert_eq!(v, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_dataset_dimensions() {
        let ds = create_dycore_dataset(&SWE_MINIMAL).unwrap();
        assert_eq!(ds.dim("t").unwrap(), 2);
        assert_eq!(ds.dim("nens").unwrap(), 1);
        assert_eq!(ds.dim("dens_ndofs").unwrap(), 1);
        assert_eq!(ds.dim("dual_ncells_z").unwrap(), 5);
        assert_eq!(ds.dim("primal_ncells_z").unwrap(), 4);
        assert_eq!(ds.variable_names().count(), 13);
    }

    #[test]
    fn test_density_selection_matches_formula() {
        let ds = create_dycore_dataset(&SWE_MINIMAL).unwrap();
        let slice = ds
            .variable("dens")
            .unwrap()
            .isel(&[("t", 1), ("dens_ndofs", 0), ("dual_ncells_y", 0), ("nens", 0)])
            .unwrap();
        assert_eq!(slice.shape(), vec![5, 8]);
        assert_eq!(slice.values()[8 + 3], density_value(1, 0, 0, 1, 3));
    }
}
