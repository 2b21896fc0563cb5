//! Post-run handoff to the sanity checker and preview renderer.
//!
//! Both collaborators live outside this tool. They receive the release
//! path plus a JSON options blob on the command line; a nonzero exit is
//! logged and tolerated, only failing to start them at all is an error.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Options forwarded to the database sanity checker.
#[derive(Debug, Clone, Serialize)]
pub struct SanityCheckOptions {
    /// Directory that image paths in the release are relative to.
    pub base_dir: PathBuf,
    /// Whether to read every image header to validate sizes.
    pub check_image_sizes: bool,
    /// Whether to stat every image on disk.
    pub check_image_existence: bool,
    /// Whether to report images no annotation references.
    pub find_unused_images: bool,
}

impl SanityCheckOptions {
    /// Options with all filesystem probes off. Checking millions of
    /// images is a separate, much slower run.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            check_image_sizes: false,
            check_image_existence: false,
            find_unused_images: false,
        }
    }
}

/// Options forwarded to the preview renderer.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOptions {
    /// How many sequences to sample into the preview page.
    pub num_to_visualize: usize,
    /// Whether to only render images carrying boxes.
    pub trim_to_images_with_bboxes: bool,
    /// Whether to add web search links per species label.
    pub add_search_links: bool,
    /// Sort the page by file name instead of sample order.
    pub sort_by_filename: bool,
    /// Render preview images on multiple workers.
    pub parallelize_rendering: bool,
    /// Link each preview image to its source file.
    pub include_filename_links: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            num_to_visualize: 100,
            trim_to_images_with_bboxes: false,
            add_search_links: false,
            sort_by_filename: false,
            parallelize_rendering: true,
            include_filename_links: true,
        }
    }
}

/// Run the sanity checker against the written release.
pub fn run_sanity_check(
    command: &str,
    dataset: &Path,
    options: &SanityCheckOptions,
) -> Result<()> {
    let encoded = encode_options(options)?;
    invoke(command, &[dataset.as_os_str().to_os_string()], &encoded)
}

/// Render the HTML preview for the written release and open it.
pub fn render_preview(
    command: &str,
    dataset: &Path,
    preview_dir: &Path,
    options: &PreviewOptions,
) -> Result<()> {
    let encoded = encode_options(options)?;
    invoke(
        command,
        &[
            dataset.as_os_str().to_os_string(),
            preview_dir.as_os_str().to_os_string(),
        ],
        &encoded,
    )?;

    let index = preview_dir.join("index.html");
    if index.is_file() {
        open_in_viewer(&index);
    }
    Ok(())
}

/// Open a file with the platform's default application, best effort.
pub fn open_in_viewer(path: &Path) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(all(unix, not(target_os = "macos")))]
    let opener = "xdg-open";

    match Command::new(opener).arg(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("{opener} exited with {status}"),
        Err(e) => warn!("Could not open {}: {e}", path.display()),
    }
}

fn encode_options<T: Serialize>(options: &T) -> Result<String> {
    serde_json::to_string(options).map_err(|e| Error::Internal {
        message: format!("could not encode collaborator options: {e}"),
    })
}

fn invoke(command: &str, args: &[std::ffi::OsString], options_json: &str) -> Result<()> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(Error::CollaboratorSpawn {
            command: command.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    let mut invocation = Command::new(program);
    invocation.args(parts);
    invocation.args(args);
    invocation.arg("--options").arg(options_json);

    info!("Running {command}");
    let status = invocation
        .status()
        .map_err(|e| Error::CollaboratorSpawn {
            command: command.to_string(),
            source: e,
        })?;
    if !status.success() {
        warn!("{command} exited with {status}");
    }
    Ok(())
}
