//! Input selection from the raw file listing.
//!
//! Splits the listing into camera images and usable survey CSVs. CSV
//! paths matching the blocklist are dropped, and any folder holding
//! more than one CSV is excluded outright since there is no way to
//! tell which file describes the images.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::constants::CSV_PATH_BLOCKLIST;

/// Image and CSV paths chosen from the listing.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Camera image paths.
    pub images: Vec<String>,
    /// Survey CSVs with exactly one CSV in their folder.
    pub csv_files: Vec<String>,
    /// CSVs excluded because their folder held more than one.
    pub ignored_csvs: Vec<String>,
}

/// Partition the raw listing into images and usable survey CSVs.
///
/// Input order is preserved, so a sorted listing yields sorted output.
pub fn select_inputs(all_files: &[String]) -> Selection {
    let mut images = Vec::new();
    let mut candidates = Vec::new();

    for path in all_files {
        if has_extension(path, &["jpg", "jpeg"]) {
            images.push(path.clone());
        } else if has_extension(path, &["csv"]) {
            if let Some(token) = blocklist_match(path) {
                debug!("Skipping blocklisted CSV {path} ({token})");
            } else {
                candidates.push(path.clone());
            }
        }
    }

    let mut per_folder: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in candidates {
        per_folder.entry(folder_of(&path)).or_default().push(path);
    }

    let mut csv_files = Vec::new();
    let mut ignored_csvs = Vec::new();
    for (folder, mut paths) in per_folder {
        if paths.len() > 1 {
            warn!(
                "Ignoring folder {folder} with {} survey CSVs: {}",
                paths.len(),
                paths.join(", ")
            );
            ignored_csvs.append(&mut paths);
        } else {
            csv_files.append(&mut paths);
        }
    }

    Selection {
        images,
        csv_files,
        ignored_csvs,
    }
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| extensions.contains(&e.as_str()))
}

fn blocklist_match(path: &str) -> Option<&'static str> {
    CSV_PATH_BLOCKLIST
        .iter()
        .find(|token| path.contains(*token))
        .copied()
}

fn folder_of(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
