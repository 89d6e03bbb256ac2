//! Vertical sounding profiles.
//!
//! A sounding is three parallel profiles (pressure, temperature, dew point)
//! indexed by vertical level. Files written by the model store pressure in
//! Pa, temperature in K and dew point in °C; everything here is normalized
//! to hPa and °C on load.

use std::path::Path;

use tracing::debug;

use crate::dataset::{DataArray, Dataset};
use crate::error::{NetCdfError, NetCdfResult};
use crate::native::load_dataset_variables;

pub const PRESSURE_VAR: &str = "pressure";
pub const TEMPERATURE_VAR: &str = "temperature";
pub const DEW_POINT_VAR: &str = "dew_point";

const KELVIN_OFFSET: f64 = 273.15;

/// Pressure values above this are taken to be in Pa when no unit is given.
const PASCAL_THRESHOLD: f64 = 2000.0;

/// Temperatures whose mean exceeds this are taken to be in K when no unit is given.
const KELVIN_THRESHOLD: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    Pascal,
    Hectopascal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
}

/// One sounding in hPa and °C.
#[derive(Debug, Clone, PartialEq)]
pub struct Sounding {
    pub pressure_hpa: Vec<f64>,
    pub temperature_c: Vec<f64>,
    pub dew_point_c: Vec<f64>,
}

impl Sounding {
    /// Build a sounding from already-normalized profiles.
    pub fn new(
        pressure_hpa: Vec<f64>,
        temperature_c: Vec<f64>,
        dew_point_c: Vec<f64>,
    ) -> NetCdfResult<Self> {
        if pressure_hpa.len() != temperature_c.len() || pressure_hpa.len() != dew_point_c.len() {
            return Err(NetCdfError::ShapeMismatch(format!(
                "sounding profiles differ in length: pressure={}, temperature={}, dew_point={}",
                pressure_hpa.len(),
                temperature_c.len(),
                dew_point_c.len()
            )));
        }
        Ok(Self {
            pressure_hpa,
            temperature_c,
            dew_point_c,
        })
    }

    /// Extract and normalize the sounding variables of a dataset.
    pub fn from_dataset(dataset: &Dataset) -> NetCdfResult<Self> {
        let pressure = dataset.variable(PRESSURE_VAR)?;
        let temperature = dataset.variable(TEMPERATURE_VAR)?;
        let dew_point = dataset.variable(DEW_POINT_VAR)?;

        for array in [pressure, temperature, dew_point] {
            if array.ndim() != 1 {
                return Err(NetCdfError::InvalidFormat(format!(
                    "'{}' must be 1-D, found shape {:?}",
                    array.name(),
                    array.shape()
                )));
            }
        }

        let p_unit = pressure_unit(pressure);
        let t_unit = temperature_unit(temperature);
        let td_unit = temperature_unit(dew_point);
        debug!(?p_unit, ?t_unit, ?td_unit, "Sounding units");

        Self::new(
            to_hpa(pressure.values(), p_unit),
            to_celsius(temperature.values(), t_unit),
            to_celsius(dew_point.values(), td_unit),
        )
    }

    pub fn len(&self) -> usize {
        self.pressure_hpa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure_hpa.is_empty()
    }
}

/// Read a sounding file.
pub fn load_sounding(path: impl AsRef<Path>) -> NetCdfResult<Sounding> {
    let dataset = load_dataset_variables(path, &[PRESSURE_VAR, TEMPERATURE_VAR, DEW_POINT_VAR])?;
    Sounding::from_dataset(&dataset)
}

/// Pressure unit from the `units` attribute, or inferred from magnitude.
pub fn pressure_unit(array: &DataArray) -> PressureUnit {
    match array.units().map(|u| u.trim().to_ascii_lowercase()).as_deref() {
        Some("pa") => PressureUnit::Pascal,
        Some("hpa") | Some("mb") | Some("mbar") | Some("millibar") => PressureUnit::Hectopascal,
        _ => {
            if array.values().iter().any(|&p| p > PASCAL_THRESHOLD) {
                PressureUnit::Pascal
            } else {
                PressureUnit::Hectopascal
            }
        }
    }
}

/// Temperature unit from the `units` attribute, or inferred from magnitude.
pub fn temperature_unit(array: &DataArray) -> TemperatureUnit {
    match array.units().map(|u| u.trim().to_ascii_lowercase()).as_deref() {
        Some("k") | Some("kelvin") => TemperatureUnit::Kelvin,
        Some("c") | Some("degc") | Some("deg_c") | Some("celsius") | Some("degrees_c") => {
            TemperatureUnit::Celsius
        }
        _ => {
            let finite: Vec<f64> = array
                .values()
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            if finite.is_empty() {
                return TemperatureUnit::Celsius;
            }
            let mean = finite.iter().sum::<f64>() / finite.len() as f64;
            if mean > KELVIN_THRESHOLD {
                TemperatureUnit::Kelvin
            } else {
                TemperatureUnit::Celsius
            }
        }
    }
}

fn to_hpa(values: &[f64], unit: PressureUnit) -> Vec<f64> {
    match unit {
        PressureUnit::Pascal => values.iter().map(|p| p / 100.0).collect(),
        PressureUnit::Hectopascal => values.to_vec(),
    }
}

fn to_celsius(values: &[f64], unit: TemperatureUnit) -> Vec<f64> {
    match unit {
        TemperatureUnit::Kelvin => values.iter().map(|t| t - KELVIN_OFFSET).collect(),
        TemperatureUnit::Celsius => values.to_vec(),
    }
}
