//! Declarative presence/count column catalog.
//!
//! The wide survey schema records each species group twice: a
//! boolean-like presence column (`elkpresent`) and a set of per-subtype
//! count columns (`ElkSpike`, `ElkCalf`, ...). The catalog names the
//! required columns, the presence columns the survey is expected to
//! carry, and the presence-to-count grouping, and is passed into the
//! sequence builder explicitly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::constants::schema;
use crate::error::{Error, Result};

/// Column configuration for one survey's CSV schema.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnCatalog {
    /// Columns every CSV must carry.
    required: Vec<String>,
    /// Presence columns the survey is expected to carry.
    expected_presence: Vec<String>,
    /// Presence column to count columns, one entry per species group.
    groups: BTreeMap<String, Vec<String>>,
}

/// Presence and count columns actually present in one CSV's header row.
#[derive(Debug, Clone)]
pub struct ResolvedColumns {
    /// Presence columns, in header order.
    pub presence: Vec<String>,
    /// Recognized count columns, in header order.
    pub counts: Vec<String>,
}

impl Default for ColumnCatalog {
    /// The Idaho survey configuration: elk, deer and pronghorn as the
    /// tracked groups, everything else under `otherpresent`.
    fn default() -> Self {
        let to_strings = |names: &[&str]| names.iter().map(ToString::to_string).collect();

        let mut groups = BTreeMap::new();
        groups.insert(
            schema::OTHER_PRESENT.to_string(),
            to_strings(&[
                "MooseAntlerless",
                "MooseCalf",
                "MooseOther",
                "MooseBull",
                "MooseUnkn",
                "BlackBearAdult",
                "BlackBearCub",
                "LionAdult",
                "LionKitten",
                "WolfAdult",
                "WolfPup",
                "CattleCow",
                "CattleCalf",
                "other",
            ]),
        );
        groups.insert(
            "elkpresent".to_string(),
            to_strings(&[
                "ElkSpike",
                "ElkAntlerless",
                "ElkCalf",
                "ElkRaghorn",
                "ElkMatBull",
                "ElkUnkn",
                "ElkPedNub",
            ]),
        );
        groups.insert(
            "deerpresent".to_string(),
            to_strings(&[
                "MDbuck",
                "MDantlerless",
                "MDfawn",
                "WTDbuck",
                "WTDantlerless",
                "WTDfawn",
                "WTDunkn",
                "MDunkn",
            ]),
        );
        groups.insert(
            "prongpresent".to_string(),
            to_strings(&["PronghornBuck", "PronghornFawn", "PHunkn"]),
        );

        Self {
            required: to_strings(&[
                "File",
                "Folder",
                "Date",
                "Time",
                "otherpresent",
                "other",
                "otherwhat",
            ]),
            expected_presence: to_strings(&[
                "elkpresent",
                "deerpresent",
                "prongpresent",
                "humanpresent",
                "otherpresent",
            ]),
            groups,
        }
    }
}

impl ColumnCatalog {
    /// Load a catalog from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::CatalogRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| Error::CatalogParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Columns every CSV must carry.
    pub fn required_columns(&self) -> &[String] {
        &self.required
    }

    /// Union of all count columns across species groups.
    pub fn expected_count_columns(&self) -> BTreeSet<&str> {
        self.groups
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Count columns of the generic other group, excluding the literal
    /// catch-all `other` column.
    pub fn other_count_columns(&self) -> impl Iterator<Item = &str> {
        self.groups
            .get(schema::OTHER_PRESENT)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|name| *name != schema::OTHER_COUNT)
    }

    /// Presence columns whose group contains the given count column.
    pub fn presence_groups_for(&self, count_column: &str) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .filter(move |(_, counts)| counts.iter().any(|c| c == count_column))
            .map(|(presence, _)| presence.as_str())
    }

    /// Match one CSV's header row against the catalog.
    ///
    /// Missing required columns are fatal. Unexpected presence columns
    /// and missing expected presence/count columns are warned and
    /// processing continues with whatever columns exist.
    pub fn resolve(&self, headers: &[String], csv_source: &str) -> Result<ResolvedColumns> {
        for required in &self.required {
            if !headers.iter().any(|h| h == required) {
                return Err(Error::MissingColumn {
                    column: required.clone(),
                    csv_source: csv_source.to_string(),
                });
            }
        }

        let presence: Vec<String> = headers
            .iter()
            .filter(|h| h.ends_with(schema::PRESENCE_SUFFIX))
            .cloned()
            .collect();

        let expected_counts = self.expected_count_columns();
        let counts: Vec<String> = headers
            .iter()
            .filter(|h| expected_counts.contains(h.as_str()))
            .cloned()
            .collect();

        for column in &presence {
            if !self.expected_presence.contains(column) {
                warn!("Unexpected presence column {column} in {csv_source}");
            }
        }
        for column in &self.expected_presence {
            if !presence.contains(column) {
                warn!("Missing presence column {column} in {csv_source}");
            }
        }
        for column in &expected_counts {
            if !counts.iter().any(|c| c == column) {
                warn!("Missing count column {column} in {csv_source}");
            }
        }

        Ok(ResolvedColumns { presence, counts })
    }
}

/// Load the catalog from an optional override file, falling back to the
/// built-in survey configuration.
pub fn load_catalog(path: Option<&Path>) -> Result<ColumnCatalog> {
    path.map_or_else(|| Ok(ColumnCatalog::default()), ColumnCatalog::from_toml_file)
}
