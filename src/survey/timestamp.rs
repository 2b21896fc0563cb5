//! Survey timestamp construction.
//!
//! Each row records its capture moment as separate free-form `Date` and
//! `Time` cells. The cells are concatenated and matched against the
//! format variants seen across the survey's camera models; two-digit
//! year variants come first so `%Y` cannot swallow a `16` as year 16.

use chrono::{Datelike, NaiveDateTime};

use crate::constants::{TIMESTAMP_FORMAT, deployment};
use crate::error::{Error, Result};

/// Accepted `Date Time` format variants, tried in order.
const FORMATS: &[&str] = &[
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

/// Parse a row's Date and Time cells into a timestamp.
///
/// Fails fast on unparseable cells and on years outside the deployment
/// window; both point at corrupted source data rather than a condition
/// worth recovering from.
pub fn parse_row_timestamp(date: &str, time: &str, csv_source: &str) -> Result<NaiveDateTime> {
    let value = format!("{} {}", date.trim(), time.trim());

    let parsed = FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .ok_or_else(|| Error::TimestampParse {
            value: value.clone(),
            csv_source: csv_source.to_string(),
        })?;

    let year = parsed.year();
    if !(deployment::MIN_YEAR..=deployment::MAX_YEAR).contains(&year) {
        return Err(Error::YearOutOfRange {
            year,
            csv_source: csv_source.to_string(),
        });
    }

    Ok(parsed)
}

/// Render a timestamp in the survey's canonical `%Y-%m-%d %H:%M:%S` form.
pub fn format_timestamp(datetime: NaiveDateTime) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter serializing timestamps in the canonical form.
pub mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::constants::TIMESTAMP_FORMAT;

    /// Serialize a timestamp as `%Y-%m-%d %H:%M:%S`.
    pub fn serialize<S>(datetime: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Deserialize a timestamp from `%Y-%m-%d %H:%M:%S`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
