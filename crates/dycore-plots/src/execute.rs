//! Plan execution.

use netcdf_parser::{DataArray, Dataset};
use tracing::{debug, info, warn};

use crate::error::PipelineResult;
use crate::plan::{PlotKind, PlotPlan, PlotRequest, PlotSource};

/// Receiver of resolved plot data.
///
/// The executor calls exactly one method per plan request, in plan order.
pub trait PlotSink {
    /// A 2-D snapshot belonging to time step `time_index`.
    fn scalar_field(&mut self, label: &str, data: &DataArray, time_index: usize) -> PipelineResult<()>;

    /// A conserved quantity's time series.
    fn statistic(&mut self, label: &str, data: &DataArray) -> PipelineResult<()>;

    /// A diagnostic time series shown as raw values.
    fn raw_statistic(&mut self, label: &str, data: &DataArray) -> PipelineResult<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub statistics: usize,
    pub raw_statistics: usize,
    pub fields: usize,
    /// Ratio fields whose denominator contained zeros
    pub zero_denominators: usize,
}

impl ExecutionSummary {
    pub fn total(&self) -> usize {
        self.statistics + self.raw_statistics + self.fields
    }
}

/// Resolve a request's data, warning if a ratio divides by zero.
fn resolve(request: &PlotRequest, dataset: &Dataset, summary: &mut ExecutionSummary) -> PipelineResult<DataArray> {
    match &request.source {
        PlotSource::Select(selection) => Ok(selection.apply(dataset)?),
        PlotSource::Ratio {
            numerator,
            denominator,
        } => {
            let num = numerator.apply(dataset)?;
            let den = denominator.apply(dataset)?;
            let zeros = den.count_zeros();
            if zeros > 0 {
                summary.zero_denominators += 1;
                warn!(
                    label = %request.label,
                    time_index = request.time_index,
                    zeros,
                    denominator = %denominator,
                    "Density slot 0 contains zeros; ratio field will have non-finite values"
                );
            }
            Ok(num.divide(&den)?)
        }
    }
}

/// Run every request of `plan` against `dataset`, stopping at the first error.
pub fn execute_plan<S: PlotSink + ?Sized>(
    plan: &PlotPlan,
    dataset: &Dataset,
    sink: &mut S,
) -> PipelineResult<ExecutionSummary> {
    let mut summary = ExecutionSummary::default();

    for request in plan {
        let data = resolve(request, dataset, &mut summary)?;
        debug!(
            kind = %request.kind,
            label = %request.label,
            time_index = request.time_index,
            shape = ?data.shape(),
            "Plotting"
        );

        match request.kind {
            PlotKind::Statistic => {
                sink.statistic(&request.label, &data)?;
                summary.statistics += 1;
            }
            PlotKind::RawStatistic => {
                sink.raw_statistic(&request.label, &data)?;
                summary.raw_statistics += 1;
            }
            PlotKind::Field => {
                sink.scalar_field(&request.label, &data, request.time_index)?;
                summary.fields += 1;
            }
        }
    }

    info!(
        statistics = summary.statistics,
        raw_statistics = summary.raw_statistics,
        fields = summary.fields,
        zero_denominators = summary.zero_denominators,
        "Plot plan complete"
    );
    Ok(summary)
}
