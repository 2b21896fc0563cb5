//! Application-wide constants.
//!
//! The survey-specific configuration (gap threshold, deployment window,
//! block-list, dataset info block) is fixed here rather than exposed as
//! run-time options; changing it for a different survey means editing
//! this file or supplying a column catalog file.

/// Maximum gap between consecutive images within one sequence, in seconds.
///
/// A strictly larger gap starts a new sequence.
pub const MAX_GAP_WITHIN_SEQUENCE_SECS: i64 = 10;

/// Deployment-window sanity bounds for parsed timestamps.
///
/// Not a general date validator: the survey cameras ran 2015-2019, so a
/// year outside this range means a mangled Date/Time cell.
pub mod deployment {
    /// Earliest acceptable year.
    pub const MIN_YEAR: i32 = 2015;
    /// Latest acceptable year.
    pub const MAX_YEAR: i32 = 2019;
}

/// Timestamp format used in sequence ids and serialized artifacts.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Path substrings that disqualify a `.csv` file from processing.
///
/// These mark backups, export dumps and per-survey metadata files that
/// share the extension but not the wide annotation schema.
pub const CSV_PATH_BLOCKLIST: &[&str] =
    &["Backups", "Metadata.csv", "ExportedDataFiles", "CSV Files"];

/// Artifact file names, all created under the output directory.
pub mod artifacts {
    /// Cached recursive file listing of the source tree.
    pub const FILE_LIST: &str = "all_files.json";
    /// Per-sequence results keyed by source CSV.
    pub const SEQUENCES: &str = "sequences.json";
    /// Final merged dataset.
    pub const DATASET: &str = "idaho_camera_traps.json";
    /// Preview renderer output directory name.
    pub const PREVIEW_DIR: &str = "preview";
}

/// Fixed `info` block of the output dataset.
pub mod info {
    /// Dataset contributor line.
    pub const CONTRIBUTOR: &str = "Images acquired by the Idaho Department of Fish and Game";
    /// Dataset description.
    pub const DESCRIPTION: &str = "Idaho Camera Traps";
    /// Date-stamped dataset version.
    pub const VERSION: &str = "2021.07.19";
}

/// Column-name conventions of the wide survey schema.
pub mod schema {
    /// Suffix identifying presence (species-group checkbox) columns.
    pub const PRESENCE_SUFFIX: &str = "present";
    /// Generic presence column for species outside the survey groups.
    pub const OTHER_PRESENT: &str = "otherpresent";
    /// Catch-all count column excluded from counted-species resolution.
    pub const OTHER_COUNT: &str = "other";
    /// Label used when an other-marked sequence carries no detail.
    pub const UNKNOWN_LABEL: &str = "unknown";
    /// Free-text species column.
    pub const OTHERWHAT: &str = "otherwhat";
    /// Secondary free-text column, absent from some CSVs.
    pub const COMMENT: &str = "comment";
}

/// Category rename applied during normalization: survey shorthand to the
/// published species name.
pub const CATEGORY_RENAMES: &[(&str, &str)] = &[("prong", "pronghorn")];

/// Default worker count for the per-CSV processing loop.
pub const DEFAULT_JOBS: usize = 1;
