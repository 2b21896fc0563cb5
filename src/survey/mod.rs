//! Survey CSV processing: columns, rows, clustering and labels.
//!
//! The survey stage turns one camera location's CSV into labeled image
//! sequences. [`builder::build_sequences`] is the entry point; the
//! submodules each own one step of that conversion.

mod builder;
mod columns;
mod labels;
mod row;
mod sequence;
mod timestamp;

pub use builder::{CsvReport, CsvSequences, build_sequences, location_name};
pub use columns::{ColumnCatalog, ResolvedColumns, load_catalog};
pub use labels::{LabelOutcome, derive_labels};
pub use row::{SurveyRow, load_rows};
pub use sequence::{Sequence, SequenceImage, cluster_rows};
pub use timestamp::{format_timestamp, parse_row_timestamp};
