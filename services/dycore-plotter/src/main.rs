//! Dycore diagnostics plotter.
//!
//! Reads a dycore output file and writes one PNG per conserved statistic,
//! diagnostic series and field snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dycore_common::{ModelVariant, PlotError};
use dycore_plots::{
    execute_plan, init_tracing, PipelineError, PlanDims, PlanOptions, PlotConfig, PlotPlan,
    PngFileSink,
};
use netcdf_parser::{load_dataset_variables, silence_hdf5_errors};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "plot-dycore")]
#[command(about = "Plot statistics and fields from dycore output")]
struct Args {
    /// Model variant (swe, tswe, ce, mce)
    model: ModelVariant,

    /// Dycore output file
    #[arg(short, long, env = "DYCORE_FILE", default_value = "test_dycore.nc")]
    file: PathBuf,

    /// Directory plots are written to
    #[arg(short, long, env = "PLOT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// YAML rendering configuration
    #[arg(short, long, env = "PLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Print the plot plan and exit without rendering
    #[arg(long)]
    list: bool,

    /// Only plot this ensemble member
    #[arg(long)]
    ensemble: Option<usize>,

    /// Skip the density ratio fields
    #[arg(long)]
    no_ratio_fields: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    run(args).map_err(|e| {
        error!(code = error_code(&e), error = %format!("{:#}", e), "plot-dycore failed");
        e
    })
}

fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Plot(plot)) => plot.code(),
        Some(_) => "pipeline",
        None => err.downcast_ref::<PlotError>().map_or("error", PlotError::code),
    }
}

fn run(args: Args) -> Result<()> {
    let variant = args.model;
    let config = match &args.config {
        Some(path) => PlotConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlotConfig::default(),
    };

    silence_hdf5_errors();

    // Dimensions alone decide the plan
    let header = load_dataset_variables(&args.file, &[])
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let dims = PlanDims::from_dataset(&header)?;
    info!(
        model = variant.tag(),
        description = variant.description(),
        file = %args.file.display(),
        nens = dims.nens,
        nt = dims.nt,
        ndensity = dims.ndensity,
        "Planning plots"
    );

    let options = PlanOptions {
        ensemble: args.ensemble,
        ratio_fields: config.ratio_fields && !args.no_ratio_fields,
    };
    let plan = PlotPlan::build(variant, dims, options)?;

    if args.list {
        for request in &plan {
            println!(
                "{:<14} {:<28} t={:<5} {}",
                request.kind.as_str(),
                request.label,
                request.time_index,
                request.source
            );
        }
        println!("{} requests for {} ({})", plan.len(), variant.tag(), variant.description());
        return Ok(());
    }

    let dataset = load_dataset_variables(&args.file, &plan.variables())
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let mut sink = PngFileSink::new(&output_dir, config)
        .with_context(|| format!("failed to prepare {}", output_dir.display()))?;

    let summary = execute_plan(&plan, &dataset, &mut sink)?;
    info!(
        written = sink.written().len(),
        total = summary.total(),
        output_dir = %output_dir.display(),
        "Done"
    );
    Ok(())
}
