//! Dataset types for the release file.
//!
//! Images and annotations come from the upstream detection pipeline and
//! pass through untouched, so they stay as raw JSON values. Categories
//! are typed because their names get normalized here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::info;

/// One species category with its numeric id.
///
/// Unknown keys are carried through so upstream annotations keep
/// whatever bookkeeping they arrived with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Numeric category id referenced by annotations.
    pub id: i64,
    /// Species name.
    pub name: String,
    /// Upstream keys beyond `id`/`name`, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Dataset produced by the upstream detection pipeline.
#[derive(Debug, Deserialize)]
pub struct UpstreamDataset {
    /// Image records, passed through untouched.
    pub images: Vec<Value>,
    /// Annotation records, passed through untouched.
    pub annotations: Vec<Value>,
    /// Categories referenced by the annotations.
    pub categories: Vec<Category>,
}

/// Release metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Release version, a date stamp.
    pub version: String,
    /// Human-readable dataset name.
    pub description: String,
    /// Attribution line.
    pub contributor: String,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            version: info::VERSION.to_string(),
            description: info::DESCRIPTION.to_string(),
            contributor: info::CONTRIBUTOR.to_string(),
        }
    }
}

/// The release file written at the end of the run.
///
/// Field order is the serialized key order.
#[derive(Debug, Serialize)]
pub struct OutputDataset {
    /// Image records from upstream.
    pub images: Vec<Value>,
    /// Annotation records from upstream.
    pub annotations: Vec<Value>,
    /// Normalized categories.
    pub categories: Vec<Category>,
    /// Release metadata.
    pub info: DatasetInfo,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_extra_keys() {
        let raw = serde_json::json!({"id": 3, "name": "elk", "count": 120});
        let category: Category = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(category.id, 3);
        assert_eq!(category.name, "elk");
        assert_eq!(serde_json::to_value(&category).unwrap(), raw);
    }

    #[test]
    fn test_info_defaults() {
        let info = DatasetInfo::default();
        assert_eq!(info.version, "2021.07.19");
        assert_eq!(info.description, "Idaho Camera Traps");
    }

    #[test]
    fn test_output_key_order() {
        let dataset = OutputDataset {
            images: vec![],
            annotations: vec![],
            categories: vec![],
            info: DatasetInfo::default(),
        };
        let encoded = serde_json::to_string(&dataset).unwrap();
        let images = encoded.find("\"images\"").unwrap();
        let annotations = encoded.find("\"annotations\"").unwrap();
        let categories = encoded.find("\"categories\"").unwrap();
        let info = encoded.find("\"info\"").unwrap();
        assert!(images < annotations && annotations < categories && categories < info);
    }
}
