//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::constants;

/// Camera trap survey CSVs to a labeled sequence dataset.
#[derive(Debug, Parser)]
#[command(name = "trapseq")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Root directory of the camera images and survey CSVs.
    pub root: PathBuf,

    /// Upstream detection dataset to assemble the release from.
    #[arg(short, long, env = "TRAPSEQ_UPSTREAM")]
    pub upstream: PathBuf,

    /// Directory for the file cache, sequences and release files.
    #[arg(short, long, env = "TRAPSEQ_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Release file path (default: <output-dir>/idaho_camera_traps.json).
    #[arg(long, env = "TRAPSEQ_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Survey column catalog as TOML (default: built-in Idaho catalog).
    #[arg(long, env = "TRAPSEQ_COLUMNS")]
    pub columns: Option<PathBuf>,

    /// Rebuild the file listing even if a cache exists.
    #[arg(long)]
    pub force_enumeration: bool,

    /// Number of CSVs to process in parallel.
    #[arg(short, long, value_parser = parse_jobs, env = "TRAPSEQ_JOBS",
          default_value_t = constants::DEFAULT_JOBS)]
    pub jobs: usize,

    /// Command to run the database sanity checker after the release is
    /// written. Receives the release path and an `--options` JSON blob.
    #[arg(long, env = "TRAPSEQ_SANITY_CHECK_CMD")]
    pub sanity_check_cmd: Option<String>,

    /// Command to render the HTML preview after the release is written.
    /// Receives the release path, the preview directory and an
    /// `--options` JSON blob.
    #[arg(long, env = "TRAPSEQ_PREVIEW_CMD")]
    pub preview_cmd: Option<String>,

    /// Preview output directory (default: <output-dir>/preview).
    #[arg(long, env = "TRAPSEQ_PREVIEW_DIR")]
    pub preview_dir: Option<PathBuf>,

    /// Base directory image paths are resolved against during sanity
    /// checking (default: the root directory).
    #[arg(long, env = "TRAPSEQ_IMAGE_BASE")]
    pub image_base: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable progress bars without silencing log output.
    #[arg(long)]
    pub no_progress: bool,
}

/// Parse and validate the worker count.
fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("jobs must be at least 1".to_string());
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jobs_valid() {
        assert_eq!(parse_jobs("1").ok(), Some(1));
        assert_eq!(parse_jobs("16").ok(), Some(16));
    }

    #[test]
    fn test_parse_jobs_invalid() {
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("-1").is_err());
        assert!(parse_jobs("abc").is_err());
    }

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["trapseq", "/data/idfg", "--upstream", "upstream.json"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.root, PathBuf::from("/data/idfg"));
        assert_eq!(cli.jobs, 1);
        assert!(!cli.force_enumeration);
    }

    #[test]
    fn test_cli_requires_upstream() {
        let cli = Cli::try_parse_from(["trapseq", "/data/idfg"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "trapseq",
            "/data/idfg",
            "-u",
            "upstream.json",
            "-o",
            "out",
            "-j",
            "8",
            "--force-enumeration",
            "-q",
        ]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.jobs, 8);
        assert!(cli.force_enumeration);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_rejects_zero_jobs() {
        let cli = Cli::try_parse_from([
            "trapseq",
            "/data/idfg",
            "-u",
            "upstream.json",
            "--jobs",
            "0",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_collaborators() {
        let cli = Cli::try_parse_from([
            "trapseq",
            "/data/idfg",
            "-u",
            "upstream.json",
            "--sanity-check-cmd",
            "python sanity_check.py",
            "--preview-cmd",
            "python preview.py",
        ])
        .unwrap();
        assert_eq!(
            cli.sanity_check_cmd.as_deref(),
            Some("python sanity_check.py")
        );
        assert_eq!(cli.preview_cmd.as_deref(), Some("python preview.py"));
    }
}
