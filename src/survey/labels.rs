//! Species label derivation for one sequence.
//!
//! Labels come from three places: presence checkboxes (one column per
//! expected species), per-class individual counts used to cross-check
//! the checkboxes, and the free-text `otherwhat`/`comment` cells that
//! describe species outside the expected set.

use tracing::warn;

use crate::constants::schema;
use crate::error::{Error, Result};
use crate::survey::columns::{ColumnCatalog, ResolvedColumns};
use crate::survey::row::SurveyRow;

/// Labels for one sequence plus the data-quality flags raised while
/// deriving them.
#[derive(Debug, Clone)]
pub struct LabelOutcome {
    /// Species labels attached to every image of the sequence.
    pub species: Vec<String>,
    /// Whether any presence column disagreed across the sequence's rows.
    pub inconsistent: bool,
}

/// Derive species labels from a sequence's rows.
///
/// A presence column counts as set when any row sets it; disagreement
/// across rows is recorded but still resolves to present. A sequence
/// with no checkbox set at all gets its counts cross-checked: a
/// positive count raises a virtual mark that feeds the `otherpresent`
/// handling but never adds a species label of its own, and a positive
/// count that maps to no species group at all is fatal.
pub fn derive_labels(
    rows: &[SurveyRow],
    resolved: &ResolvedColumns,
    catalog: &ColumnCatalog,
    sequence_id: &str,
) -> Result<LabelOutcome> {
    let mut marked: Vec<String> = Vec::new();
    let mut inconsistent = false;

    for column in &resolved.presence {
        let any_set = rows.iter().any(|row| row.presence(column));
        let uniform = rows
            .windows(2)
            .all(|pair| pair[0].presence(column) == pair[1].presence(column));
        if !uniform {
            warn!("Inconsistent {column} values within sequence {sequence_id}");
            inconsistent = true;
        }
        if any_set {
            marked.push(column.clone());
        }
    }

    let survey_species: Vec<String> = marked
        .iter()
        .filter(|column| column.as_str() != schema::OTHER_PRESENT)
        .map(|column| {
            column
                .strip_suffix(schema::PRESENCE_SUFFIX)
                .unwrap_or(column)
                .to_string()
        })
        .collect();

    // Counts are only cross-checked when no checkbox is set at all. A
    // positive count then gets its checkbox marked retroactively; the
    // mark gates the otherpresent handling below but does not reopen
    // the survey species list.
    if marked.is_empty() {
        for column in &resolved.counts {
            let total: u32 = rows.iter().map(|row| row.count(column)).sum();
            if total == 0 {
                continue;
            }
            let groups: Vec<&str> = catalog.presence_groups_for(column).collect();
            if groups.is_empty() {
                return Err(Error::CountWithoutPresenceGroup {
                    column: column.clone(),
                    sequence_id: sequence_id.to_string(),
                });
            }
            for presence_column in groups {
                if !marked.iter().any(|m| m == presence_column) {
                    warn!(
                        "Positive {column} count without {presence_column} set \
                         in sequence {sequence_id}"
                    );
                    marked.push(presence_column.to_string());
                }
            }
        }
    }

    let species = if marked.iter().any(|m| m == schema::OTHER_PRESENT) {
        let mut other_species: Vec<String> = Vec::new();
        for row in rows {
            if let Some(text) = &row.otherwhat {
                push_unique(&mut other_species, text.clone());
            }
        }
        for row in rows {
            if let Some(text) = &row.comment {
                push_unique(&mut other_species, text.clone());
            }
        }
        for column in catalog.other_count_columns() {
            let total: u32 = rows.iter().map(|row| row.count(column)).sum();
            if total > 0 {
                push_unique(&mut other_species, column.to_string());
            }
        }
        if other_species.is_empty() {
            other_species.push(schema::UNKNOWN_LABEL.to_string());
        }
        other_species.extend(survey_species);
        other_species
    } else {
        survey_species
    };

    Ok(LabelOutcome {
        species,
        inconsistent,
    })
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
