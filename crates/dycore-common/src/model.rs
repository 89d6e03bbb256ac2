//! Model variants of the idealized dycore and their naming tables.
//!
//! Each variant fixes how many density slots are prognostic and what those
//! slots are called, both on field plots and on the scalar statistics that
//! track their totals. Slots past the prognostic ones are tracers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlotError;

/// A dycore model variant, as passed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Shallow water equations
    Swe,
    /// Thermal shallow water equations
    Tswe,
    /// Compressible Euler equations
    Ce,
    /// Moist compressible Euler equations
    Mce,
}

/// Fixed naming record for one model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantProfile {
    /// Display names of the prognostic density fields, in slot order
    pub field_names: &'static [&'static str],
    /// Display names of the matching total/min/max statistics
    pub stat_names: &'static [&'static str],
}

impl VariantProfile {
    /// Number of prognostic density slots.
    pub fn prognostic_count(&self) -> usize {
        self.field_names.len()
    }
}

const SWE: VariantProfile = VariantProfile {
    field_names: &["h"],
    stat_names: &["mass"],
};

const TSWE: VariantProfile = VariantProfile {
    field_names: &["h", "S"],
    stat_names: &["mass", "bouyancy"],
};

const CE: VariantProfile = VariantProfile {
    field_names: &["rho", "Theta"],
    stat_names: &["mass", "entropic_var_density"],
};

// Assumes the rho (total density) layout; the dry-density layouts share the
// slot count but not the meaning of slot 0.
const MCE: VariantProfile = VariantProfile {
    field_names: &["rho", "Theta", "rho_v", "rho_l", "rho_i"],
    stat_names: &["mass", "entropic_var_density", "vapor", "liquid", "ice"],
};

impl ModelVariant {
    pub const ALL: [ModelVariant; 4] = [
        ModelVariant::Swe,
        ModelVariant::Tswe,
        ModelVariant::Ce,
        ModelVariant::Mce,
    ];

    /// Command-line tag for this variant.
    pub fn tag(self) -> &'static str {
        match self {
            ModelVariant::Swe => "swe",
            ModelVariant::Tswe => "tswe",
            ModelVariant::Ce => "ce",
            ModelVariant::Mce => "mce",
        }
    }

    /// Human-readable model name, for logs and plan listings.
    pub fn description(self) -> &'static str {
        match self {
            ModelVariant::Swe => "shallow water",
            ModelVariant::Tswe => "thermal shallow water",
            ModelVariant::Ce => "compressible Euler",
            ModelVariant::Mce => "moist compressible Euler",
        }
    }

    /// The static naming record for this variant.
    pub fn profile(self) -> &'static VariantProfile {
        match self {
            ModelVariant::Swe => &SWE,
            ModelVariant::Tswe => &TSWE,
            ModelVariant::Ce => &CE,
            ModelVariant::Mce => &MCE,
        }
    }

    pub fn prognostic_count(self) -> usize {
        self.profile().prognostic_count()
    }
}

impl FromStr for ModelVariant {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelVariant::ALL
            .into_iter()
            .find(|variant| variant.tag() == s)
            .ok_or_else(|| PlotError::UnknownModel(s.to_string()))
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prognostic_counts() {
        assert_eq!(ModelVariant::Swe.prognostic_count(), 1);
        assert_eq!(ModelVariant::Tswe.prognostic_count(), 2);
        assert_eq!(ModelVariant::Ce.prognostic_count(), 2);
        assert_eq!(ModelVariant::Mce.prognostic_count(), 5);
    }

    #[test]
    fn test_profiles_are_parallel() {
        for variant in ModelVariant::ALL {
            let profile = variant.profile();
            assert_eq!(
                profile.field_names.len(),
                profile.stat_names.len(),
                "{} has mismatched name lists",
                variant
            );
        }
    }

    #[test]
    fn test_tag_round_trip() {
        for variant in ModelVariant::ALL {
            assert_eq!(variant.tag().parse::<ModelVariant>().unwrap(), variant);
        }
    }

    #[test]
    fn test_descriptions_are_distinct() {
        let mut seen: Vec<&str> = ModelVariant::ALL.iter().map(|v| v.description()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ModelVariant::ALL.len());
        assert_eq!(ModelVariant::Mce.description(), "moist compressible Euler");
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!("SWE".parse::<ModelVariant>().is_err());
        assert!(" swe".parse::<ModelVariant>().is_err());
    }
}
