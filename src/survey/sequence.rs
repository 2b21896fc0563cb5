//! Sequence types and burst clustering.
//!
//! Camera traps fire in bursts: consecutive rows whose timestamps are
//! close together belong to one trigger event. Clustering walks rows in
//! timestamp order and starts a new sequence whenever the gap to the
//! previous row exceeds the burst window.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_GAP_WITHIN_SEQUENCE_SECS;
use crate::survey::row::SurveyRow;
use crate::survey::timestamp;

/// One image within a labeled sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceImage {
    /// Image file name as recorded in the survey CSV.
    pub file_name: String,
    /// Capture timestamp.
    #[serde(with = "timestamp::serde_format")]
    pub datetime: NaiveDateTime,
    /// Zero-based position within the sequence.
    pub frame_number: u32,
}

/// A burst of images sharing one trigger event and one label set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    /// Stable identifier: location name, `seq`, and the first frame's
    /// timestamp.
    pub sequence_id: String,
    /// Root-relative path of the survey CSV this sequence came from.
    pub csv_source: String,
    /// Images in frame order.
    pub images: Vec<SequenceImage>,
    /// Species labels attached to every image in the burst.
    pub species_present: Vec<String>,
}

/// Assign timestamp-sorted rows to sequences.
///
/// Returns sequence ids mapped to the row indices they cover, sorted by
/// id. Indices within one sequence are expected to be adjacent; the
/// builder verifies that before materializing images.
pub fn cluster_rows(rows: &[SurveyRow], location_name: &str) -> BTreeMap<String, Vec<usize>> {
    let mut assignments: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    let mut current_id: Option<String> = None;
    let mut previous: Option<NaiveDateTime> = None;

    for (i, row) in rows.iter().enumerate() {
        let gap = previous.map(|p| (row.datetime - p).num_seconds());
        let starts_new = match gap {
            None => true,
            Some(delta) => delta > MAX_GAP_WITHIN_SEQUENCE_SECS,
        };

        if starts_new {
            current_id = Some(sequence_id(location_name, row.datetime));
        }

        let id = current_id
            .clone()
            .unwrap_or_else(|| sequence_id(location_name, row.datetime));
        assignments.entry(id).or_default().push(i);
        previous = Some(row.datetime);
    }

    assignments
}

/// Identifier for a sequence starting at the given timestamp.
fn sequence_id(location_name: &str, start: NaiveDateTime) -> String {
    format!(
        "{location_name}_seq_{}",
        timestamp::format_timestamp(start)
    )
}
