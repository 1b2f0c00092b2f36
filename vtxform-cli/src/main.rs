/// vtxform - apply a transform to a generated quad geometry
///
/// Builds the reference 12 x 12 vertex grid (or the grid from a settings
/// file), applies the requested transform in place and prints the bounds
/// before and after. Logging is controlled through `RUST_LOG`.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vtxform_cli::{RegressionRun, RunSettings};

#[derive(Parser)]
#[command(name = "vtxform")]
#[command(about = "Apply a geometric transform to a quad geometry's shared vertex list")]
#[command(version)]
struct Cli {
    /// TOML settings file with optional [grid], [apply] and [transform] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transform expression, e.g. "scale 1 1 2.5" or "rotate 0 0 1 90deg about 1 1 0"
    #[arg(long, short)]
    transform: Option<String>,

    /// Run the apply pass on the calling thread only
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => RunSettings::load(path)?,
        None => RunSettings::default(),
    };
    if cli.sequential {
        settings.apply.parallel = false;
    }

    let mut run = RegressionRun::from_settings(&settings, cli.transform.as_deref())?;
    let report = run.run()?;
    println!("{report}");
    Ok(())
}
