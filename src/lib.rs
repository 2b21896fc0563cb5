//! Trapseq - camera trap sequence labeling tool.
//!
//! This crate turns per-location survey CSVs and an upstream detection
//! dataset into a labeled image sequence release.

#![warn(missing_docs)]

pub mod cli;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod handoff;
pub mod listing;
pub mod pipeline;
pub mod survey;

use clap::Parser;
use cli::Cli;
use pipeline::{RunOptions, run_pipeline};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for trapseq CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let options = RunOptions {
        root: cli.root,
        upstream: cli.upstream,
        output_dir: cli.output_dir,
        output: cli.output,
        columns: cli.columns,
        force_enumeration: cli.force_enumeration,
        jobs: cli.jobs,
        sanity_check_cmd: cli.sanity_check_cmd,
        preview_cmd: cli.preview_cmd,
        preview_dir: cli.preview_dir,
        image_base: cli.image_base,
        progress: !cli.quiet && !cli.no_progress,
    };

    let start = std::time::Instant::now();
    let summary = run_pipeline(&options)?;

    info!(
        "Complete: {} sequences from {} CSVs ({} rows) in {:.2}s",
        summary.sequence_count,
        summary.csv_count,
        summary.row_count,
        start.elapsed().as_secs_f64()
    );
    info!("Release written to {}", summary.release_path.display());
    if summary.unsorted_csv_count > 0 {
        warn!("{} CSV(s) had out-of-order timestamps", summary.unsorted_csv_count);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}
