//! Per-CSV sequence building.
//!
//! One survey CSV covers one camera location. Building loads its rows,
//! sorts them by timestamp, clusters them into bursts and derives the
//! species labels, returning the sequences together with a report of
//! everything noteworthy that happened along the way.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::survey::columns::ColumnCatalog;
use crate::survey::labels;
use crate::survey::row;
use crate::survey::sequence::{self, Sequence, SequenceImage};

/// What happened while processing one CSV.
#[derive(Debug, Clone)]
pub struct CsvReport {
    /// Root-relative path of the CSV.
    pub csv_source: String,
    /// Location name derived from the CSV's folder path.
    pub location_name: String,
    /// Number of data rows read.
    pub row_count: usize,
    /// Number of sequences produced.
    pub sequence_count: usize,
    /// Whether the rows needed sorting before clustering.
    pub unsorted_input: bool,
    /// Sequences whose presence columns disagreed across rows.
    pub inconsistent_sequences: Vec<String>,
}

/// Sequences from one CSV plus the processing report.
#[derive(Debug)]
pub struct CsvSequences {
    /// Labeled sequences, sorted by sequence id.
    pub sequences: Vec<Sequence>,
    /// Processing report for summary logging.
    pub report: CsvReport,
}

/// Build all sequences for one survey CSV.
pub fn build_sequences(
    input_base: &Path,
    csv_source: &str,
    catalog: &ColumnCatalog,
) -> Result<CsvSequences> {
    debug!("Processing {csv_source}");

    let location = location_name(csv_source);
    let csv_absolute = input_base.join(csv_source);
    let (mut rows, resolved) = row::load_rows(&csv_absolute, csv_source, catalog)?;
    let row_count = rows.len();

    let unsorted_input = !rows.is_sorted_by(|a, b| a.datetime <= b.datetime);
    if unsorted_input {
        warn!("Timestamps out of order in {csv_source}, sorting");
        rows.sort_by_key(|r| r.datetime);
    }
    if !rows.is_sorted_by(|a, b| a.datetime <= b.datetime) {
        return Err(Error::Internal {
            message: format!("rows still unsorted after sorting {csv_source}"),
        });
    }

    let assignments = sequence::cluster_rows(&rows, &location);

    let mut sequences = Vec::with_capacity(assignments.len());
    let mut inconsistent_sequences = Vec::new();

    for (sequence_id, indices) in &assignments {
        let (&first, &last) = match (indices.first(), indices.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(Error::EmptySequence {
                    sequence_id: sequence_id.clone(),
                });
            }
        };
        if !indices.windows(2).all(|pair| pair[1] == pair[0] + 1) {
            return Err(Error::NonContiguousSequence {
                sequence_id: sequence_id.clone(),
            });
        }

        let burst = &rows[first..=last];
        let outcome = labels::derive_labels(burst, &resolved, catalog, sequence_id)?;
        if outcome.inconsistent {
            inconsistent_sequences.push(sequence_id.clone());
        }

        let images = burst
            .iter()
            .enumerate()
            .map(|(frame, row)| SequenceImage {
                file_name: row.file.clone(),
                datetime: row.datetime,
                frame_number: u32::try_from(frame).unwrap_or(u32::MAX),
            })
            .collect();

        sequences.push(Sequence {
            sequence_id: sequence_id.clone(),
            csv_source: csv_source.to_string(),
            images,
            species_present: outcome.species,
        });
    }

    let report = CsvReport {
        csv_source: csv_source.to_string(),
        location_name: location,
        row_count,
        sequence_count: sequences.len(),
        unsorted_input,
        inconsistent_sequences,
    };

    Ok(CsvSequences { sequences, report })
}

/// Location name for a root-relative CSV path: the folder components
/// joined with underscores, spaces removed.
pub fn location_name(csv_source: &str) -> String {
    let folders: Vec<String> = Path::new(csv_source)
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    folders.join("_").replace(' ', "")
}
