//! End-to-end pipeline orchestration.
//!
//! Runs the four stages in order: enumerate the tree, select the
//! inputs, build sequences per CSV, assemble and write the release.
//! Collaborator handoff happens last, once the release is on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::constants::artifacts;
use crate::dataset;
use crate::error::{Error, Result};
use crate::handoff::{self, PreviewOptions, SanityCheckOptions};
use crate::listing;
use crate::pipeline::progress::{create_csv_progress, finish_progress, inc_progress};
use crate::survey::{self, CsvSequences, Sequence};

/// Everything one pipeline run needs, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root directory of the camera images and survey CSVs.
    pub root: PathBuf,
    /// Upstream detection dataset path.
    pub upstream: PathBuf,
    /// Directory for the file cache and output files.
    pub output_dir: PathBuf,
    /// Release file path override.
    pub output: Option<PathBuf>,
    /// Column catalog override.
    pub columns: Option<PathBuf>,
    /// Rebuild the file listing even if a cache exists.
    pub force_enumeration: bool,
    /// Number of CSVs to process in parallel.
    pub jobs: usize,
    /// Sanity checker command, if configured.
    pub sanity_check_cmd: Option<String>,
    /// Preview renderer command, if configured.
    pub preview_cmd: Option<String>,
    /// Preview output directory override.
    pub preview_dir: Option<PathBuf>,
    /// Base directory for sanity-check image resolution.
    pub image_base: Option<PathBuf>,
    /// Whether to draw progress bars.
    pub progress: bool,
}

/// Counts reported after a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Files found under the root.
    pub file_count: usize,
    /// Camera images among them.
    pub image_count: usize,
    /// Survey CSVs processed.
    pub csv_count: usize,
    /// CSVs excluded by the multi-CSV folder rule.
    pub ignored_csv_count: usize,
    /// Distinct camera locations.
    pub location_count: usize,
    /// CSVs whose rows needed sorting.
    pub unsorted_csv_count: usize,
    /// Survey rows across all CSVs.
    pub row_count: usize,
    /// Sequences produced.
    pub sequence_count: usize,
    /// Sequences with disagreeing presence columns.
    pub inconsistent_sequence_count: usize,
    /// Where the release was written.
    pub release_path: PathBuf,
}

/// Run the full pipeline.
pub fn run_pipeline(options: &RunOptions) -> Result<RunSummary> {
    fs::create_dir_all(&options.output_dir)?;
    let catalog = survey::load_catalog(options.columns.as_deref())?;

    let cache_path = options.output_dir.join(artifacts::FILE_LIST);
    let all_files =
        listing::enumerate_files(&options.root, &cache_path, options.force_enumeration)?;

    let selection = listing::select_inputs(&all_files);
    info!(
        "Selected {} images and {} survey CSVs ({} ignored)",
        selection.images.len(),
        selection.csv_files.len(),
        selection.ignored_csvs.len()
    );
    if selection.csv_files.is_empty() {
        return Err(Error::NoCsvFiles);
    }

    let location_count = warn_duplicate_locations(&selection.csv_files);

    let progress = create_csv_progress(selection.csv_files.len(), options.progress);
    let results: Vec<CsvSequences> = if options.jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()
            .map_err(|e| Error::Internal {
                message: format!("could not build worker pool: {e}"),
            })?;
        pool.install(|| {
            selection
                .csv_files
                .par_iter()
                .map(|csv_source| {
                    let built = survey::build_sequences(&options.root, csv_source, &catalog);
                    inc_progress(progress.as_ref());
                    built
                })
                .collect::<Result<Vec<_>>>()
        })?
    } else {
        let mut built = Vec::with_capacity(selection.csv_files.len());
        for csv_source in &selection.csv_files {
            built.push(survey::build_sequences(&options.root, csv_source, &catalog)?);
            inc_progress(progress.as_ref());
        }
        built
    };
    finish_progress(progress, "done");

    let mut row_count = 0;
    let mut unsorted_csv_count = 0;
    let mut inconsistent_sequence_count = 0;
    let mut sequences: Vec<Sequence> = Vec::new();
    for built in results {
        row_count += built.report.row_count;
        if built.report.unsorted_input {
            unsorted_csv_count += 1;
        }
        inconsistent_sequence_count += built.report.inconsistent_sequences.len();
        sequences.extend(built.sequences);
    }
    sequences.sort_by(|a, b| a.sequence_id.cmp(&b.sequence_id));

    info!(
        "Built {} sequences from {} rows across {} locations",
        sequences.len(),
        row_count,
        location_count
    );
    if inconsistent_sequence_count > 0 {
        warn!("{inconsistent_sequence_count} sequences had disagreeing presence columns");
    }

    dataset::write_sequences(&sequences, &options.output_dir.join(artifacts::SEQUENCES))?;

    let upstream = dataset::read_upstream(&options.upstream)?;
    let release = dataset::assemble(upstream);
    let release_path = options
        .output
        .clone()
        .unwrap_or_else(|| options.output_dir.join(artifacts::DATASET));
    dataset::write_dataset(&release, &release_path)?;

    if let Some(command) = &options.sanity_check_cmd {
        let base = options.image_base.as_deref().unwrap_or(&options.root);
        handoff::run_sanity_check(command, &release_path, &SanityCheckOptions::new(base))?;
    } else {
        debug!("No sanity check command configured, skipping");
    }
    if let Some(command) = &options.preview_cmd {
        let preview_dir = options
            .preview_dir
            .clone()
            .unwrap_or_else(|| options.output_dir.join(artifacts::PREVIEW_DIR));
        handoff::render_preview(command, &release_path, &preview_dir, &PreviewOptions::default())?;
    } else {
        debug!("No preview command configured, skipping");
    }

    Ok(RunSummary {
        file_count: all_files.len(),
        image_count: selection.images.len(),
        csv_count: selection.csv_files.len(),
        ignored_csv_count: selection.ignored_csvs.len(),
        location_count,
        unsorted_csv_count,
        row_count,
        sequence_count: sequences.len(),
        inconsistent_sequence_count,
        release_path,
    })
}

/// Warn about location names shared by multiple CSVs and return the
/// distinct location count. Shared names merge their bursts under one
/// id prefix, which is tolerable but worth knowing about.
fn warn_duplicate_locations(csv_files: &[String]) -> usize {
    let mut by_location: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for csv_source in csv_files {
        by_location
            .entry(survey::location_name(csv_source))
            .or_default()
            .push(csv_source);
    }
    for (location, sources) in &by_location {
        if sources.len() > 1 {
            warn!(
                "Location name {location} derived from {} CSVs: {}",
                sources.len(),
                sources.join(", ")
            );
        }
    }
    by_location.len()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_location_detection() {
        let csvs = vec![
            "Set1/CamA/data.csv".to_string(),
            "Set1/Cam A/data.csv".to_string(),
            "Set2/data.csv".to_string(),
        ];
        // "Set1/CamA" and "Set1/Cam A" collapse to the same name.
        assert_eq!(warn_duplicate_locations(&csvs), 2);
    }

    #[test]
    fn test_distinct_locations_counted() {
        let csvs = vec!["A/data.csv".to_string(), "B/data.csv".to_string()];
        assert_eq!(warn_duplicate_locations(&csvs), 2);
    }
}
