//! Plan and execution tests against synthetic dycore datasets.

use dycore_common::{ModelVariant, PlotError};
use dycore_plots::{
    execute_plan, PipelineError, PipelineResult, PlanDims, PlanOptions, PlotConfig, PlotKind,
    PlotPlan, PlotSink, PngFileSink,
};
use netcdf_parser::{load_dataset, DataArray, Dataset};
use test_utils::shapes::{DycoreShape, CE_ENSEMBLE, MCE_FULL, SWE_MINIMAL, TSWE_TRACER};
use test_utils::{assert_approx_eq, create_dycore_dataset, temp_test_dir, write_dycore_file};

/// Sink that records every call.
#[derive(Default)]
struct RecordingSink {
    calls: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    kind: PlotKind,
    label: String,
    time_index: Option<usize>,
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl RecordingSink {
    fn record(&mut self, kind: PlotKind, label: &str, data: &DataArray, time_index: Option<usize>) {
        self.calls.push(Call {
            kind,
            label: label.to_string(),
            time_index,
            shape: data.shape(),
            values: data.values().to_vec(),
        });
    }

    fn count(&self, kind: PlotKind) -> usize {
        self.calls.iter().filter(|c| c.kind == kind).count()
    }

    fn labels(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.label.as_str()).collect()
    }
}

impl PlotSink for RecordingSink {
    fn scalar_field(&mut self, label: &str, data: &DataArray, time_index: usize) -> PipelineResult<()> {
        self.record(PlotKind::Field, label, data, Some(time_index));
        Ok(())
    }

    fn statistic(&mut self, label: &str, data: &DataArray) -> PipelineResult<()> {
        self.record(PlotKind::Statistic, label, data, None);
        Ok(())
    }

    fn raw_statistic(&mut self, label: &str, data: &DataArray) -> PipelineResult<()> {
        self.record(PlotKind::RawStatistic, label, data, None);
        Ok(())
    }
}

fn run(variant: ModelVariant, shape: &DycoreShape) -> (Dataset, RecordingSink) {
    let dataset = create_dycore_dataset(shape).unwrap();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let plan = PlotPlan::build(variant, dims, PlanOptions::default()).unwrap();
    let mut sink = RecordingSink::default();
    execute_plan(&plan, &dataset, &mut sink).unwrap();
    (dataset, sink)
}

#[test]
fn test_swe_minimal_run() {
    let (_, sink) = run(ModelVariant::Swe, &SWE_MINIMAL);

    let statistics = sink.count(PlotKind::Statistic) + sink.count(PlotKind::RawStatistic);
    assert_eq!(statistics, 9);
    assert_eq!(sink.count(PlotKind::Field), 14);

    let labels = sink.labels();
    assert_eq!(
        &labels[..9],
        &[
            "total_mass.0",
            "min_mass.0",
            "max_mass.0",
            "internal_energy.0",
            "potential_energy.0",
            "kinetic_energy.0",
            "total_energy.0",
            "total_pens.0",
            "total_pv.0",
        ]
    );
    assert_eq!(
        &labels[9..],
        &[
            "hs.0",
            "coriolisxz.0",
            "qxz.0", "v.0", "w.0", "h.0", "hl.0", "hc.0",
            "qxz.0", "v.0", "w.0", "h.0", "hl.0", "hc.0",
        ]
    );
}

#[test]
fn test_field_time_indices() {
    let (_, sink) = run(ModelVariant::Swe, &SWE_MINIMAL);
    let times: Vec<usize> = sink
        .calls
        .iter()
        .filter(|c| c.kind == PlotKind::Field)
        .map(|c| c.time_index.unwrap())
        .collect();
    assert_eq!(times, vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]);
}

#[test]
fn test_statistic_kinds() {
    let (_, sink) = run(ModelVariant::Swe, &SWE_MINIMAL);
    let kind_of = |label: &str| sink.calls.iter().find(|c| c.label == label).unwrap().kind;
    assert_eq!(kind_of("total_mass.0"), PlotKind::Statistic);
    assert_eq!(kind_of("min_mass.0"), PlotKind::RawStatistic);
    assert_eq!(kind_of("kinetic_energy.0"), PlotKind::RawStatistic);
    assert_eq!(kind_of("total_energy.0"), PlotKind::Statistic);
    assert_eq!(kind_of("total_pv.0"), PlotKind::Statistic);
}

#[test]
fn test_statistic_series_selects_component() {
    let (_, sink) = run(ModelVariant::Swe, &SWE_MINIMAL);
    let kinetic = sink.calls.iter().find(|c| c.label == "kinetic_energy.0").unwrap();
    assert_eq!(kinetic.shape, vec![SWE_MINIMAL.nt]);
    // energy_ndofs=1 for kinetic energy
    assert_approx_eq!(kinetic.values[0], test_utils::statistic_value(0, 0, 1), 1e-12);
}

#[test]
fn test_ratio_slot_zero_is_one() {
    let (_, sink) = run(ModelVariant::Swe, &SWE_MINIMAL);
    let ratios: Vec<&Call> = sink.calls.iter().filter(|c| c.label == "hc.0").collect();
    assert_eq!(ratios.len(), SWE_MINIMAL.nt);
    for call in ratios {
        assert!(call.values.iter().all(|&v| v == 1.0));
    }
}

#[test]
fn test_tracer_ratio_is_slot_multiple() {
    let (_, sink) = run(ModelVariant::Tswe, &TSWE_TRACER);
    let t0c = sink.calls.iter().find(|c| c.label == "T0c.0").unwrap();
    // Generated slot l is (l + 1) times slot 0
    assert!(t0c.values.iter().all(|&v| (v - 3.0).abs() < 1e-12));
    assert!(sink.labels().contains(&"total_tracer0.0"));
    assert!(sink.labels().contains(&"Sl.0"));
}

#[test]
fn test_field_slices_are_two_dimensional() {
    let (_, sink) = run(ModelVariant::Swe, &SWE_MINIMAL);
    let h = sink.calls.iter().find(|c| c.label == "h.0").unwrap();
    assert_eq!(h.shape, vec![SWE_MINIMAL.dual_nz(), SWE_MINIMAL.nx]);
    let hl = sink.calls.iter().find(|c| c.label == "hl.0").unwrap();
    assert_eq!(hl.shape, vec![SWE_MINIMAL.nz, SWE_MINIMAL.nx]);
    let hs = sink.calls.iter().find(|c| c.label == "hs.0").unwrap();
    assert_eq!(hs.shape, vec![SWE_MINIMAL.nx]);
}

#[test]
fn test_counts_match_formulas() {
    let cases = [
        (ModelVariant::Swe, SWE_MINIMAL),
        (ModelVariant::Tswe, TSWE_TRACER),
        (ModelVariant::Ce, CE_ENSEMBLE),
        (ModelVariant::Mce, MCE_FULL),
    ];
    for (variant, shape) in cases {
        let (_, sink) = run(variant, &shape);
        let d = shape.ndensity;
        let statistics = sink.count(PlotKind::Statistic) + sink.count(PlotKind::RawStatistic);
        assert_eq!(statistics, shape.nens * (3 * d + 6), "{variant}");
        assert_eq!(
            sink.count(PlotKind::Field),
            shape.nens * (2 + shape.nt * (3 + 3 * d)),
            "{variant}"
        );
        assert_eq!(sink.calls.len(), shape.expected_plots());
    }
}

#[test]
fn test_ensemble_major_order() {
    let (_, sink) = run(ModelVariant::Ce, &CE_ENSEMBLE);
    let labels = sink.labels();
    let stats_per_member = 3 * CE_ENSEMBLE.ndensity + 6;
    assert_eq!(labels[0], "total_mass.0");
    assert_eq!(labels[stats_per_member], "total_mass.1");
    assert_eq!(labels[2 * stats_per_member], "hs.0");
    assert_eq!(labels.last(), Some(&"Thetac.1"));
}

#[test]
fn test_single_member_subset() {
    let dataset = create_dycore_dataset(&CE_ENSEMBLE).unwrap();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let options = PlanOptions {
        ensemble: Some(1),
        ..Default::default()
    };
    let plan = PlotPlan::build(ModelVariant::Ce, dims, options).unwrap();
    let mut sink = RecordingSink::default();
    execute_plan(&plan, &dataset, &mut sink).unwrap();
    assert!(sink.labels().iter().all(|l| l.ends_with(".1")));
}

#[test]
fn test_too_few_density_slots() {
    let dataset = create_dycore_dataset(&SWE_MINIMAL).unwrap();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let err = PlotPlan::build(ModelVariant::Ce, dims, PlanOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Plot(PlotError::InsufficientDensitySlots {
            required: 2,
            available: 1,
            ..
        })
    ));
}

#[test]
fn test_missing_variable_stops_run() {
    let mut dataset = Dataset::new();
    dataset.declare_dimension("t", 1).unwrap();
    dataset.declare_dimension("nens", 1).unwrap();
    dataset.declare_dimension("dens_ndofs", 1).unwrap();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let plan = PlotPlan::build(ModelVariant::Swe, dims, PlanOptions::default()).unwrap();

    let mut sink = RecordingSink::default();
    let err = execute_plan(&plan, &dataset, &mut sink).unwrap_err();
    assert!(matches!(err, PipelineError::NetCdf(_)));
    assert!(sink.calls.is_empty());
}

#[test]
fn test_png_sink_writes_named_files() {
    let dir = temp_test_dir();
    let nc_path = dir.path().join("test_dycore.nc");
    write_dycore_file(&nc_path, &SWE_MINIMAL).unwrap();

    let dataset = load_dataset(&nc_path).unwrap();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let plan = PlotPlan::build(ModelVariant::Swe, dims, PlanOptions::default()).unwrap();

    let out = dir.path().join("plots");
    let mut sink = PngFileSink::new(&out, PlotConfig::default()).unwrap();
    let summary = execute_plan(&plan, &dataset, &mut sink).unwrap();

    assert_eq!(summary.total(), 23);
    assert_eq!(summary.zero_denominators, 0);
    assert_eq!(sink.written().len(), 23);
    for name in [
        "total_mass.0.png",
        "kinetic_energy.0.png",
        "hs.0.t0000.png",
        "hc.0.t0001.png",
        "qxz.0.t0001.png",
    ] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }
    // Same label at each time step gets its own file
    assert!(out.join("h.0.t0000.png").is_file());
    assert!(out.join("h.0.t0001.png").is_file());
}

/// Copy of the SWE dataset with one zero in density slot 0 at t=0.
fn dataset_with_zero_density() -> Dataset {
    let mut dataset = create_dycore_dataset(&SWE_MINIMAL).unwrap();
    let dens = dataset.variable("dens").unwrap();
    let mut values = dens.values().to_vec();
    // Row-major: t=0, nens=0, slot 0, z=0, y=0, x=2
    values[2] = 0.0;
    let patched = DataArray::new("dens", dens.dims().collect(), values).unwrap();
    dataset.insert(patched).unwrap();
    dataset
}

#[test]
fn test_zero_denominator_is_counted_and_kept() {
    let dataset = dataset_with_zero_density();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let plan = PlotPlan::build(ModelVariant::Swe, dims, PlanOptions::default()).unwrap();
    let mut sink = RecordingSink::default();
    let summary = execute_plan(&plan, &dataset, &mut sink).unwrap();

    assert_eq!(summary.zero_denominators, 1);
    let ratios: Vec<&Call> = sink.calls.iter().filter(|c| c.label == "hc.0").collect();
    assert_eq!(ratios.len(), SWE_MINIMAL.nt);
    // 0 / 0 at the patched cell
    assert!(ratios[0].values[2].is_nan());
    assert_eq!(ratios[0].values.iter().filter(|v| !v.is_finite()).count(), 1);
    assert!(ratios[1].values.iter().all(|v| v.is_finite()));
}

#[test]
fn test_png_sink_renders_non_finite_ratio() {
    let dataset = dataset_with_zero_density();
    let dims = PlanDims::from_dataset(&dataset).unwrap();
    let plan = PlotPlan::build(ModelVariant::Swe, dims, PlanOptions::default()).unwrap();

    let dir = temp_test_dir();
    let mut sink = PngFileSink::new(dir.path(), PlotConfig::default()).unwrap();
    let summary = execute_plan(&plan, &dataset, &mut sink).unwrap();

    assert_eq!(summary.zero_denominators, 1);
    assert_eq!(sink.written().len(), 23);
    assert!(dir.path().join("hc.0.t0000.png").is_file());
}
