//! Common test fixtures for dycore plotting tests.
//!
//! This module provides pre-defined shapes and profiles that represent
//! the idealized test cases the plotting tools run against.

/// Axis sizes of synthetic dycore datasets.
pub mod shapes {
    /// Sizes of a synthetic dycore output file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DycoreShape {
        /// Ensemble members (`nens`)
        pub nens: usize,
        /// Output times (`t`)
        pub nt: usize,
        /// Density slots (`dens_ndofs`)
        pub ndensity: usize,
        /// Cells along x (both grids)
        pub nx: usize,
        /// Primal cells along z; the dual grid has one more
        pub nz: usize,
    }

    impl DycoreShape {
        pub fn dual_nz(&self) -> usize {
            self.nz + 1
        }

        /// Plots a full run over this shape produces with ratio fields on.
        pub fn expected_plots(&self) -> usize {
            let d = self.ndensity;
            self.nens * (3 * d + 6) + self.nens * (2 + self.nt * (3 + 3 * d))
        }
    }

    /// Shallow water, one member, two outputs: 9 statistics and 14 fields.
    pub const SWE_MINIMAL: DycoreShape = DycoreShape {
        nens: 1,
        nt: 2,
        ndensity: 1,
        nx: 8,
        nz: 4,
    };

    /// Thermal shallow water with one passive tracer.
    pub const TSWE_TRACER: DycoreShape = DycoreShape {
        nens: 1,
        nt: 2,
        ndensity: 3,
        nx: 6,
        nz: 3,
    };

    /// Compressible Euler with two ensemble members.
    pub const CE_ENSEMBLE: DycoreShape = DycoreShape {
        nens: 2,
        nt: 1,
        ndensity: 2,
        nx: 4,
        nz: 3,
    };

    /// Moist Euler with the full five prognostic densities.
    pub const MCE_FULL: DycoreShape = DycoreShape {
        nens: 1,
        nt: 1,
        ndensity: 5,
        nx: 4,
        nz: 2,
    };
}

/// Sounding profiles in the units the model writes them.
pub mod soundings {
    /// Pressure levels (Pa), surface first.
    pub const PRESSURE_PA: [f64; 8] = [
        100_000.0, 92_500.0, 85_000.0, 70_000.0, 50_000.0, 30_000.0, 20_000.0, 10_000.0,
    ];

    /// Temperature (K) on [`PRESSURE_PA`].
    pub const TEMPERATURE_K: [f64; 8] = [300.0, 295.0, 290.0, 281.0, 265.0, 240.0, 220.0, 205.0];

    /// Dew point (°C) on [`PRESSURE_PA`].
    pub const DEW_POINT_C: [f64; 8] = [22.0, 18.0, 13.0, 2.0, -15.0, -40.0, -60.0, -75.0];

    /// Level heights (m) on [`PRESSURE_PA`].
    pub const HEIGHT_M: [f64; 8] = [110.0, 760.0, 1_460.0, 3_010.0, 5_570.0, 9_160.0, 11_780.0, 16_180.0];
}

/// Model tags accepted by the field plotter.
pub const MODEL_TAGS: [&str; 4] = ["swe", "tswe", "ce", "mce"];

#[cfg(test)]
mod tests {
    use super::shapes::*;
    use super::soundings::*;

    #[test]
    fn test_swe_minimal_plot_count() {
        assert_eq!(SWE_MINIMAL.expected_plots(), 9 + 14);
    }

    #[test]
    fn test_sounding_profiles_align() {
        assert_eq!(PRESSURE_PA.len(), TEMPERATURE_K.len());
        assert_eq!(PRESSURE_PA.len(), DEW_POINT_C.len());
        assert!(PRESSURE_PA.windows(2).all(|w| w[0] > w[1]));
    }
}
