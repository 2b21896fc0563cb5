//! Error types for trapseq.

/// Result type alias for trapseq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for trapseq.
///
/// Every variant is fatal: the conversion is a run-to-completion-or-abort
/// batch job with no partial-output recovery. Recoverable irregularities
/// are logged as warnings instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source image tree does not exist or is not a directory.
    #[error("source image directory does not exist: {path}")]
    RootNotFound {
        /// Path that was expected to be the image tree root.
        path: std::path::PathBuf,
    },

    /// Failed to read the cached file listing.
    #[error("failed to read file list '{path}'")]
    FileListRead {
        /// Path to the listing file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the cached file listing.
    #[error("failed to parse file list '{path}'")]
    FileListParse {
        /// Path to the listing file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the cached file listing.
    #[error("failed to write file list '{path}'")]
    FileListWrite {
        /// Path to the listing file.
        path: std::path::PathBuf,
        /// Underlying encode or I/O error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to open or read a survey CSV file.
    #[error("failed to read survey CSV '{path}'")]
    CsvRead {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from a survey CSV.
    #[error("required column '{column}' missing from '{csv_source}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
        /// Relative path of the CSV file.
        csv_source: String,
    },

    /// A Date/Time cell pair could not be parsed.
    #[error("unparseable timestamp '{value}' in '{csv_source}'")]
    TimestampParse {
        /// The concatenated Date/Time string.
        value: String,
        /// Relative path of the CSV file.
        csv_source: String,
    },

    /// A parsed timestamp falls outside the deployment window.
    #[error("timestamp year {year} outside deployment window in '{csv_source}'")]
    YearOutOfRange {
        /// Parsed year.
        year: i32,
        /// Relative path of the CSV file.
        csv_source: String,
    },

    /// A sequence ended up with no rows.
    #[error("sequence '{sequence_id}' has no rows")]
    EmptySequence {
        /// Offending sequence id.
        sequence_id: String,
    },

    /// A sequence's rows are not adjacent in the sorted CSV.
    #[error("sequence '{sequence_id}' has non-contiguous rows")]
    NonContiguousSequence {
        /// Offending sequence id.
        sequence_id: String,
    },

    /// A nonzero count column maps to no presence group in the catalog.
    #[error(
        "count column '{column}' in sequence '{sequence_id}' has no presence group in the catalog"
    )]
    CountWithoutPresenceGroup {
        /// Count column carrying the orphaned value.
        column: String,
        /// Offending sequence id.
        sequence_id: String,
    },

    /// Failed to read the column catalog file.
    #[error("failed to read column catalog '{path}'")]
    CatalogRead {
        /// Path to the catalog file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the column catalog file.
    #[error("failed to parse column catalog '{path}'")]
    CatalogParse {
        /// Path to the catalog file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to read the upstream images/annotations JSON.
    #[error("failed to read upstream dataset '{path}'")]
    UpstreamRead {
        /// Path to the upstream JSON.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the upstream images/annotations JSON.
    #[error("failed to parse upstream dataset '{path}'")]
    UpstreamParse {
        /// Path to the upstream JSON.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write an output artifact.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to spawn an external collaborator process.
    #[error("failed to run collaborator command '{command}'")]
    CollaboratorSpawn {
        /// The configured command.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No survey CSV files survived selection.
    #[error("no survey CSV files found under the source tree")]
    NoCsvFiles,

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
