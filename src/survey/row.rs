//! Survey CSV row parsing.
//!
//! The wide schema varies per CSV (different camera deployments carry
//! different presence/count columns), so rows are read by header lookup
//! rather than a fixed serde record. Handles UTF-8 BOM, quoted fields
//! and surrounding whitespace via the `csv` crate.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::constants::schema;
use crate::error::{Error, Result};
use crate::survey::columns::{ColumnCatalog, ResolvedColumns};
use crate::survey::timestamp;

/// One image's survey record, immutable after parse.
#[derive(Debug, Clone)]
pub struct SurveyRow {
    /// Image file name as recorded in the CSV.
    pub file: String,
    /// Folder cell as recorded in the CSV.
    pub folder: String,
    /// Capture timestamp built from the Date and Time cells.
    pub datetime: NaiveDateTime,
    /// Trimmed non-empty free-text species cell, if any.
    pub otherwhat: Option<String>,
    /// Trimmed non-empty comment cell, if any.
    pub comment: Option<String>,
    presence: BTreeMap<String, bool>,
    counts: BTreeMap<String, u32>,
}

impl SurveyRow {
    /// Whether the given presence column is set on this row.
    pub fn presence(&self, column: &str) -> bool {
        self.presence.get(column).copied().unwrap_or(false)
    }

    /// Recorded individual count for the given count column.
    pub fn count(&self, column: &str) -> u32 {
        self.counts.get(column).copied().unwrap_or(0)
    }
}

#[cfg(test)]
impl SurveyRow {
    pub(crate) fn synthetic(file: &str, datetime: NaiveDateTime) -> Self {
        Self {
            file: file.to_string(),
            folder: "Set1".to_string(),
            datetime,
            otherwhat: None,
            comment: None,
            presence: BTreeMap::new(),
            counts: BTreeMap::new(),
        }
    }

    pub(crate) fn with_presence(mut self, column: &str, value: bool) -> Self {
        self.presence.insert(column.to_string(), value);
        self
    }

    pub(crate) fn with_count(mut self, column: &str, value: u32) -> Self {
        self.counts.insert(column.to_string(), value);
        self
    }

    pub(crate) fn with_otherwhat(mut self, text: &str) -> Self {
        self.otherwhat = Some(text.to_string());
        self
    }

    pub(crate) fn with_comment(mut self, text: &str) -> Self {
        self.comment = Some(text.to_string());
        self
    }
}

/// Read one survey CSV into rows, resolving its columns against the
/// catalog.
///
/// Timestamps are parsed here so a bad Date/Time cell aborts before any
/// clustering happens. Row order is the file order; sorting is the
/// builder's concern.
pub fn load_rows(
    csv_absolute: &Path,
    csv_source: &str,
    catalog: &ColumnCatalog,
) -> Result<(Vec<SurveyRow>, ResolvedColumns)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(csv_absolute)
        .map_err(|e| Error::CsvRead {
            path: csv_absolute.to_path_buf(),
            source: e,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::CsvRead {
            path: csv_absolute.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(ToString::to_string)
        .collect();

    let resolved = catalog.resolve(&headers, csv_source)?;

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    if !index.contains_key(schema::COMMENT) {
        warn!("Missing comment column in {csv_source}");
    }

    let cell = |record: &csv::StringRecord, column: &str| -> String {
        index
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or_default()
            .to_string()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::CsvRead {
            path: csv_absolute.to_path_buf(),
            source: e,
        })?;

        let datetime = timestamp::parse_row_timestamp(
            &cell(&record, "Date"),
            &cell(&record, "Time"),
            csv_source,
        )?;

        let presence = resolved
            .presence
            .iter()
            .map(|column| (column.clone(), parse_flag(&cell(&record, column))))
            .collect();

        let mut counts = BTreeMap::new();
        for column in &resolved.counts {
            let raw = cell(&record, column);
            let value = parse_count(&raw).unwrap_or_else(|| {
                warn!("Unparseable count '{raw}' in column {column} of {csv_source}");
                0
            });
            counts.insert(column.clone(), value);
        }

        rows.push(SurveyRow {
            file: cell(&record, "File"),
            folder: cell(&record, "Folder"),
            datetime,
            otherwhat: non_empty(cell(&record, schema::OTHERWHAT)),
            comment: non_empty(cell(&record, schema::COMMENT)),
            presence,
            counts,
        });
    }

    Ok((rows, resolved))
}

/// Interpret a presence cell: empty, zero and explicit negatives are
/// unset, anything else counts as a checked box.
fn parse_flag(raw: &str) -> bool {
    let value = raw.trim();
    !(value.is_empty()
        || value == "0"
        || value == "0.0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no"))
}

/// Interpret a count cell: empty is zero, integral values (including
/// `2.0` style floats) parse, anything else is unusable.
fn parse_count(raw: &str) -> Option<u32> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Some(f as u32),
        _ => None,
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flag_variants() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("x"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("  "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("0.0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("No"));
    }

    #[test]
    fn test_parse_count_variants() {
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count("2.0"), Some(2));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("1.5"), None);
        assert_eq!(parse_count("two"), None);
    }

    #[test]
    fn test_load_rows_basic() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "File,Folder,Date,Time,elkpresent,otherpresent,other,otherwhat,comment,ElkSpike"
        )
        .unwrap();
        writeln!(file, "IMG_0001.JPG,Set1,1/12/2016,10:00:00,1,0,0,,seen near road,2").unwrap();
        writeln!(file, "IMG_0002.JPG,Set1,1/12/2016,10:00:05,0,0,0,,,").unwrap();
        file.flush().unwrap();

        let catalog = ColumnCatalog::default();
        let (rows, resolved) = load_rows(file.path(), "Set1/data.csv", &catalog).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file, "IMG_0001.JPG");
        assert!(rows[0].presence("elkpresent"));
        assert!(!rows[0].presence("otherpresent"));
        assert_eq!(rows[0].count("ElkSpike"), 2);
        assert_eq!(rows[0].comment.as_deref(), Some("seen near road"));
        assert_eq!(rows[1].count("ElkSpike"), 0);
        assert!(rows[1].otherwhat.is_none());
        assert_eq!(
            resolved.counts,
            vec!["other".to_string(), "ElkSpike".to_string()]
        );
    }

    #[test]
    fn test_load_rows_missing_required_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "File,Folder,Date").unwrap();
        writeln!(file, "IMG_0001.JPG,Set1,1/12/2016").unwrap();
        file.flush().unwrap();

        let catalog = ColumnCatalog::default();
        let result = load_rows(file.path(), "Set1/data.csv", &catalog);
        assert!(matches!(result, Err(Error::MissingColumn { .. })));
    }

    #[test]
    fn test_load_rows_bad_timestamp_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "File,Folder,Date,Time,otherpresent,other,otherwhat").unwrap();
        writeln!(file, "IMG_0001.JPG,Set1,notadate,10:00:00,0,0,").unwrap();
        file.flush().unwrap();

        let catalog = ColumnCatalog::default();
        let result = load_rows(file.path(), "Set1/data.csv", &catalog);
        assert!(matches!(result, Err(Error::TimestampParse { .. })));
    }

    #[test]
    fn test_load_rows_tolerates_missing_comment_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "File,Folder,Date,Time,otherpresent,other,otherwhat").unwrap();
        writeln!(file, "IMG_0001.JPG,Set1,1/12/2016,10:00:00,0,0,").unwrap();
        file.flush().unwrap();

        let catalog = ColumnCatalog::default();
        let (rows, _) = load_rows(file.path(), "Set1/data.csv", &catalog).unwrap();
        assert!(rows[0].comment.is_none());
    }
}
