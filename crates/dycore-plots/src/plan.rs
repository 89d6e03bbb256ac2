//! Plot plan construction.
//!
//! The plan is the complete, ordered list of plots one run produces. It is
//! built from the model variant and the dataset's axis sizes alone, so it
//! can be listed or counted without touching any data.
//!
//! Order is fixed: the statistics pass for every ensemble member, then the
//! field pass for every member. Within the field pass the two static
//! fields come first, then each time step in turn.

use std::fmt;

use dycore_common::{DensityNames, ModelVariant, PlotError};
use netcdf_parser::{DataArray, Dataset, NetCdfResult};
use serde::Serialize;

use crate::error::PipelineResult;

/// Axis holding the stacked density fields.
pub const DENSITY_AXIS: &str = "dens_ndofs";
pub const TIME_AXIS: &str = "t";
pub const ENSEMBLE_AXIS: &str = "nens";

/// Energy components stored along `energy_ndofs`.
const ENERGY_TOTAL: usize = 0;
const ENERGY_KINETIC: usize = 1;
const ENERGY_POTENTIAL: usize = 2;
const ENERGY_INTERNAL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    /// Conserved quantity, drawn relative to its initial value
    Statistic,
    /// Diagnostic drawn as-is
    RawStatistic,
    /// 2-D snapshot
    Field,
}

impl PlotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlotKind::Statistic => "statistic",
            PlotKind::RawStatistic => "raw_statistic",
            PlotKind::Field => "field",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One variable with an index chosen along some of its axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub variable: String,
    pub selectors: Vec<(String, usize)>,
}

impl Selection {
    pub fn new(variable: &str, selectors: &[(&str, usize)]) -> Self {
        Self {
            variable: variable.to_string(),
            selectors: selectors
                .iter()
                .map(|(dim, index)| (dim.to_string(), *index))
                .collect(),
        }
    }

    /// Slice the selected variable out of `dataset`.
    pub fn apply(&self, dataset: &Dataset) -> NetCdfResult<DataArray> {
        let selectors: Vec<(&str, usize)> = self
            .selectors
            .iter()
            .map(|(dim, index)| (dim.as_str(), *index))
            .collect();
        dataset.variable(&self.variable)?.isel(&selectors)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.variable)?;
        for (i, (dim, index)) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", dim, index)?;
        }
        f.write_str("]")
    }
}

/// Where the values of a plot come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotSource {
    Select(Selection),
    /// Elementwise `numerator / denominator`
    Ratio {
        numerator: Selection,
        denominator: Selection,
    },
}

impl PlotSource {
    pub fn resolve(&self, dataset: &Dataset) -> NetCdfResult<DataArray> {
        match self {
            PlotSource::Select(selection) => selection.apply(dataset),
            PlotSource::Ratio {
                numerator,
                denominator,
            } => numerator.apply(dataset)?.divide(&denominator.apply(dataset)?),
        }
    }

    /// Names of the variables this source reads.
    pub fn variables(&self) -> Vec<&str> {
        match self {
            PlotSource::Select(s) => vec![s.variable.as_str()],
            PlotSource::Ratio {
                numerator,
                denominator,
            } => vec![numerator.variable.as_str(), denominator.variable.as_str()],
        }
    }
}

impl fmt::Display for PlotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotSource::Select(s) => write!(f, "{}", s),
            PlotSource::Ratio {
                numerator,
                denominator,
            } => write!(f, "{} / {}", numerator, denominator),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    pub kind: PlotKind,
    pub label: String,
    pub source: PlotSource,
    /// Time step a field snapshot belongs to; 0 for statistics
    pub time_index: usize,
}

impl PlotRequest {
    fn statistic(kind: PlotKind, label: String, selection: Selection) -> Self {
        Self {
            kind,
            label,
            source: PlotSource::Select(selection),
            time_index: 0,
        }
    }

    fn field(label: String, source: PlotSource, time_index: usize) -> Self {
        Self {
            kind: PlotKind::Field,
            label,
            source,
            time_index,
        }
    }
}

/// Axis sizes that determine the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanDims {
    pub nens: usize,
    pub nt: usize,
    pub ndensity: usize,
}

impl PlanDims {
    pub fn from_dataset(dataset: &Dataset) -> NetCdfResult<Self> {
        Ok(Self {
            nens: dataset.dim(ENSEMBLE_AXIS)?,
            nt: dataset.dim(TIME_AXIS)?,
            ndensity: dataset.dim(DENSITY_AXIS)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOptions {
    /// Restrict both passes to one ensemble member
    pub ensemble: Option<usize>,
    /// Emit the `<d>c` density ratio fields
    pub ratio_fields: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            ensemble: None,
            ratio_fields: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlotPlan {
    names: DensityNames,
    dims: PlanDims,
    requests: Vec<PlotRequest>,
}

impl PlotPlan {
    /// Build the plan for `variant` over a dataset with the given axes.
    pub fn build(variant: ModelVariant, dims: PlanDims, options: PlanOptions) -> PipelineResult<Self> {
        let names = DensityNames::resolve(variant, dims.ndensity)?;

        let members: Vec<usize> = match options.ensemble {
            Some(n) if n >= dims.nens => {
                return Err(PlotError::InvalidEnsemble {
                    requested: n,
                    available: dims.nens,
                }
                .into())
            }
            Some(n) => vec![n],
            None => (0..dims.nens).collect(),
        };

        let mut requests = Vec::new();
        for &n in &members {
            statistics_pass(&names, n, &mut requests);
        }
        for &n in &members {
            field_pass(&names, n, dims.nt, options.ratio_fields, &mut requests);
        }

        Ok(Self {
            names,
            dims,
            requests,
        })
    }

    pub fn names(&self) -> &DensityNames {
        &self.names
    }

    pub fn dims(&self) -> PlanDims {
        self.dims
    }

    pub fn requests(&self) -> &[PlotRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn count(&self, kind: PlotKind) -> usize {
        self.requests.iter().filter(|r| r.kind == kind).count()
    }

    /// Requests of the statistics pass (both statistic kinds).
    pub fn statistics(&self) -> impl Iterator<Item = &PlotRequest> {
        self.requests.iter().filter(|r| r.kind != PlotKind::Field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &PlotRequest> {
        self.requests.iter().filter(|r| r.kind == PlotKind::Field)
    }

    /// Every variable some request reads, sorted and deduplicated.
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = self
            .requests
            .iter()
            .flat_map(|r| r.source.variables())
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }
}

impl<'a> IntoIterator for &'a PlotPlan {
    type Item = &'a PlotRequest;
    type IntoIter = std::slice::Iter<'a, PlotRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

fn statistics_pass(names: &DensityNames, n: usize, out: &mut Vec<PlotRequest>) {
    use PlotKind::{RawStatistic, Statistic};

    for slot in names.iter() {
        let l = slot.index;
        let s = slot.stat_name;
        out.push(PlotRequest::statistic(
            Statistic,
            format!("total_{}.{}", s, n),
            Selection::new("mass", &[("mass_ndofs", l), (ENSEMBLE_AXIS, n)]),
        ));
        out.push(PlotRequest::statistic(
            RawStatistic,
            format!("min_{}.{}", s, n),
            Selection::new("densmin", &[("densmin_ndofs", l), (ENSEMBLE_AXIS, n)]),
        ));
        out.push(PlotRequest::statistic(
            RawStatistic,
            format!("max_{}.{}", s, n),
            Selection::new("densmax", &[("densmax_ndofs", l), (ENSEMBLE_AXIS, n)]),
        ));
    }

    let energy = |component: usize| {
        Selection::new("energy", &[("energy_ndofs", component), (ENSEMBLE_AXIS, n)])
    };
    out.push(PlotRequest::statistic(
        RawStatistic,
        format!("internal_energy.{}", n),
        energy(ENERGY_INTERNAL),
    ));
    out.push(PlotRequest::statistic(
        RawStatistic,
        format!("potential_energy.{}", n),
        energy(ENERGY_POTENTIAL),
    ));
    out.push(PlotRequest::statistic(
        RawStatistic,
        format!("kinetic_energy.{}", n),
        energy(ENERGY_KINETIC),
    ));
    out.push(PlotRequest::statistic(
        Statistic,
        format!("total_energy.{}", n),
        energy(ENERGY_TOTAL),
    ));
    out.push(PlotRequest::statistic(
        Statistic,
        format!("total_pens.{}", n),
        Selection::new("pens", &[("pens_ndofs", 0), (ENSEMBLE_AXIS, n)]),
    ));
    out.push(PlotRequest::statistic(
        Statistic,
        format!("total_pv.{}", n),
        Selection::new("pv", &[("pv_ndofs", 0), (ENSEMBLE_AXIS, n)]),
    ));
}

fn field_pass(
    names: &DensityNames,
    n: usize,
    nt: usize,
    ratio_fields: bool,
    out: &mut Vec<PlotRequest>,
) {
    let select = |label: String, variable: &str, selectors: &[(&str, usize)], i: usize| {
        PlotRequest::field(label, PlotSource::Select(Selection::new(variable, selectors)), i)
    };

    out.push(select(
        format!("hs.{}", n),
        "hs",
        &[("hs_ndofs", 0), ("dual_ncells_y", 0), (ENSEMBLE_AXIS, n)],
        0,
    ));
    out.push(select(
        format!("coriolisxz.{}", n),
        "coriolisxz",
        &[("coriolisxz_ndofs", 0), ("primal_ncells_y", 0), (ENSEMBLE_AXIS, n)],
        0,
    ));

    for i in 0..nt {
        out.push(select(
            format!("qxz.{}", n),
            "QXZl",
            &[(TIME_AXIS, i), ("QXZl_ndofs", 0), ("dual_ncells_y", 0), (ENSEMBLE_AXIS, n)],
            i,
        ));
        out.push(select(
            format!("v.{}", n),
            "v",
            &[(TIME_AXIS, i), ("v_ndofs", 0), ("primal_ncells_y", 0), (ENSEMBLE_AXIS, n)],
            i,
        ));
        out.push(select(
            format!("w.{}", n),
            "w",
            &[(TIME_AXIS, i), ("w_ndofs", 0), ("primal_ncells_y", 0), (ENSEMBLE_AXIS, n)],
            i,
        ));

        let density = |l: usize| {
            Selection::new(
                "dens",
                &[(TIME_AXIS, i), (DENSITY_AXIS, l), ("dual_ncells_y", 0), (ENSEMBLE_AXIS, n)],
            )
        };
        for slot in names.iter() {
            let l = slot.index;
            let d = slot.field_name;
            out.push(PlotRequest::field(
                format!("{}.{}", d, n),
                PlotSource::Select(density(l)),
                i,
            ));
            out.push(select(
                format!("{}l.{}", d, n),
                "densl",
                &[(TIME_AXIS, i), ("densl_ndofs", l), ("primal_ncells_y", 0), (ENSEMBLE_AXIS, n)],
                i,
            ));
            // Slot 0 is taken to be total density
            if ratio_fields {
                out.push(PlotRequest::field(
                    format!("{}c.{}", d, n),
                    PlotSource::Ratio {
                        numerator: density(l),
                        denominator: density(0),
                    },
                    i,
                ));
            }
        }
    }
}
