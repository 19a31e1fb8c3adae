//! histmatch - histogram matching for 8-bit video clips
//!
//! Estimates per-plane remapping curves from a source/reference pair and
//! applies them to a target clip.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "histmatch")]
#[command(author, version, about = "Histogram matching for 8-bit video clips")]
#[command(long_about = "
Matches the tonal response of one clip to another by estimating a 256-level
curve per plane from a pixel-aligned source/reference pair.

Examples:
  histmatch match degraded.y4m pristine.y4m -o fixed.y4m
  histmatch match a.y4m b.y4m --target c.y4m -p 0,1,2 -o out.y4m
  histmatch match a.png b.png --show -o overlay.png
  histmatch match a.y4m b.y4m --debug -o curve.png
  histmatch curve a.png b.png --json
  histmatch curve a.png b.png --cube match.cube
  histmatch apply c.y4m --curve match.cube -o out.y4m
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a target clip to a reference
    #[command(name = "match", visible_alias = "m")]
    Match(MatchArgs),

    /// Print or export the estimated curve
    #[command(visible_alias = "c")]
    Curve(CurveArgs),

    /// Apply an exported .cube curve
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),
}

#[derive(Args)]
struct MatchArgs {
    /// Clip whose levels are mapped
    source: PathBuf,

    /// Clip providing the desired levels, pixel-aligned with the source
    reference: PathBuf,

    /// Output clip
    #[arg(short, long)]
    output: PathBuf,

    /// Clip the curves are applied to (defaults to the source)
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Keep the raw mapping without interpolation or smoothing
    #[arg(long)]
    raw: bool,

    /// Draw the curves in the top-left corner
    #[arg(long)]
    show: bool,

    /// Output a 256x256 diagram of the curve instead
    #[arg(long)]
    debug: bool,

    /// Smoothing radius
    #[arg(short = 's', long, allow_hyphen_values = true)]
    smoothing_window: Option<i64>,

    /// Planes to process, comma separated
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    planes: Option<Vec<i64>>,

    /// JSON or YAML parameter file, overridden by flags
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct CurveArgs {
    /// Clip whose levels are mapped
    source: PathBuf,

    /// Clip providing the desired levels
    reference: PathBuf,

    /// Plane to estimate
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    plane: i64,

    /// Keep the raw mapping
    #[arg(long)]
    raw: bool,

    /// Smoothing radius
    #[arg(short = 's', long, default_value = "8", allow_hyphen_values = true)]
    smoothing_window: i64,

    /// Print as JSON
    #[arg(long)]
    json: bool,

    /// Write the curve as a 1D .cube LUT
    #[arg(long)]
    cube: Option<PathBuf>,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input clip
    input: PathBuf,

    /// Curve in .cube format
    #[arg(short, long)]
    curve: PathBuf,

    /// Output clip
    #[arg(short, long)]
    output: PathBuf,

    /// Planes to remap, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "0")]
    planes: Vec<usize>,
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("Invalid log file: {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_ref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Match(args) => commands::matching::run(args, cli.verbose),
        Commands::Curve(args) => commands::curve::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
    }
}
