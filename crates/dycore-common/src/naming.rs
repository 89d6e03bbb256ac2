//! Density-slot naming.
//!
//! A dataset stacks `D` density-like fields along its `dens_ndofs` axis. The
//! first `P` slots are the prognostic fields of the model variant; every
//! slot after that is a passive tracer named by its offset from `P`.

use crate::error::{PlotError, PlotResult};
use crate::model::ModelVariant;

/// Resolved names for every density slot of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityNames {
    variant: ModelVariant,
    field_names: Vec<String>,
    stat_names: Vec<String>,
}

/// One density slot with both of its display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensitySlot<'a> {
    pub index: usize,
    pub field_name: &'a str,
    pub stat_name: &'a str,
}

impl DensityNames {
    /// Resolve names for `ndensity` slots.
    ///
    /// Fails when the dataset carries fewer slots than the variant has
    /// prognostic fields.
    pub fn resolve(variant: ModelVariant, ndensity: usize) -> PlotResult<Self> {
        let profile = variant.profile();
        let prognostic = profile.prognostic_count();

        if ndensity < prognostic {
            return Err(PlotError::InsufficientDensitySlots {
                model: variant,
                required: prognostic,
                available: ndensity,
            });
        }

        let mut field_names: Vec<String> =
            profile.field_names.iter().map(|s| s.to_string()).collect();
        let mut stat_names: Vec<String> =
            profile.stat_names.iter().map(|s| s.to_string()).collect();

        for k in 0..ndensity - prognostic {
            field_names.push(format!("T{}", k));
            stat_names.push(format!("tracer{}", k));
        }

        Ok(Self {
            variant,
            field_names,
            stat_names,
        })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Total number of slots (`D`).
    pub fn len(&self) -> usize {
        self.field_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_names.is_empty()
    }

    pub fn prognostic_count(&self) -> usize {
        self.variant.prognostic_count()
    }

    pub fn tracer_count(&self) -> usize {
        self.len() - self.prognostic_count()
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn stat_names(&self) -> &[String] {
        &self.stat_names
    }

    pub fn slot(&self, index: usize) -> Option<DensitySlot<'_>> {
        Some(DensitySlot {
            index,
            field_name: self.field_names.get(index)?,
            stat_name: self.stat_names.get(index)?,
        })
    }

    /// Iterate slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = DensitySlot<'_>> + '_ {
        self.field_names
            .iter()
            .zip(&self.stat_names)
            .enumerate()
            .map(|(index, (field_name, stat_name))| DensitySlot {
                index,
                field_name,
                stat_name,
            })
    }
}
