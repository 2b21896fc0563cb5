//! Release assembly from the upstream dataset.

use tracing::info;

use crate::constants::CATEGORY_RENAMES;
use crate::dataset::types::{DatasetInfo, OutputDataset, UpstreamDataset};

/// Assemble the release file from the upstream dataset.
///
/// Category names first go through the historical renames, then get
/// trimmed and lowercased. Ids and ordering are untouched so upstream
/// annotations keep resolving.
pub fn assemble(upstream: UpstreamDataset) -> OutputDataset {
    let UpstreamDataset {
        images,
        annotations,
        mut categories,
    } = upstream;

    for category in &mut categories {
        if let Some(renamed) = CATEGORY_RENAMES
            .iter()
            .find(|(from, _)| *from == category.name)
        {
            category.name = renamed.1.to_string();
        }
        category.name = category.name.trim().to_lowercase();
    }

    info!(
        "Assembled release with {} images, {} annotations, {} categories",
        images.len(),
        annotations.len(),
        categories.len()
    );

    OutputDataset {
        images,
        annotations,
        categories,
        info: DatasetInfo::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dataset::types::Category;
    use serde_json::json;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_prong_renamed_to_pronghorn() {
        let upstream = UpstreamDataset {
            images: vec![],
            annotations: vec![],
            categories: vec![category(0, "prong")],
        };
        let output = assemble(upstream);
        assert_eq!(output.categories[0].name, "pronghorn");
        assert_eq!(output.categories[0].id, 0);
    }

    #[test]
    fn test_names_trimmed_and_lowercased() {
        let upstream = UpstreamDataset {
            images: vec![],
            annotations: vec![],
            categories: vec![category(1, " Red Fox ")],
        };
        let output = assemble(upstream);
        assert_eq!(output.categories[0].name, "red fox");
    }

    #[test]
    fn test_category_order_preserved() {
        let upstream = UpstreamDataset {
            images: vec![],
            annotations: vec![],
            categories: vec![category(2, "elk"), category(0, "deer"), category(1, "prong")],
        };
        let output = assemble(upstream);
        let names: Vec<&str> = output.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["elk", "deer", "pronghorn"]);
    }

    #[test]
    fn test_images_and_annotations_pass_through() {
        let image = json!({"id": "a", "file_name": "Set1/a.jpg", "seq_id": "x", "frame_num": 0});
        let annotation = json!({"id": "ann0", "image_id": "a", "category_id": 4});
        let upstream = UpstreamDataset {
            images: vec![image.clone()],
            annotations: vec![annotation.clone()],
            categories: vec![],
        };
        let output = assemble(upstream);
        assert_eq!(output.images, vec![image]);
        assert_eq!(output.annotations, vec![annotation]);
    }
}
