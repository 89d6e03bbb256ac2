//! Skew-T log-P plotter for a single sounding file.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dycore_plots::{init_tracing, render_sounding, PlotConfig};
use netcdf_parser::load_sounding;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "plot-skewt")]
#[command(about = "Draw a skew-T diagram of a sounding")]
struct Args {
    /// Sounding file with pressure, temperature and dew_point
    #[arg(short, long, env = "SKEWT_FILE", default_value = "skew.nc")]
    file: PathBuf,

    /// Output PNG
    #[arg(short, long, default_value = "skewt.png")]
    output: PathBuf,

    /// YAML rendering configuration
    #[arg(short, long, env = "PLOT_CONFIG")]
    config: Option<PathBuf>,

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

    run(&args).map_err(|e| {
        error!(error = %format!("{:#}", e), "plot-skewt failed");
        e
    })
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PlotConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlotConfig::default(),
    };

    let sounding = load_sounding(&args.file)
        .with_context(|| format!("failed to read sounding {}", args.file.display()))?;
    if sounding.is_empty() {
        bail!("{} holds no sounding levels", args.file.display());
    }
    info!(file = %args.file.display(), levels = sounding.len(), "Loaded sounding");

    let png = render_sounding(&sounding, &config.skewt)?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, &png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), bytes = png.len(), "Wrote skew-T");
    Ok(())
}
