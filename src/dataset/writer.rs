//! Reading the upstream dataset and writing the run's JSON artifacts.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::dataset::types::{OutputDataset, UpstreamDataset};
use crate::error::{Error, Result};
use crate::survey::Sequence;

/// Load the upstream detection dataset.
pub fn read_upstream(path: &Path) -> Result<UpstreamDataset> {
    let contents = fs::read_to_string(path).map_err(|e| Error::UpstreamRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| Error::UpstreamParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the release file as pretty-printed JSON.
pub fn write_dataset(dataset: &OutputDataset, path: &Path) -> Result<()> {
    write_pretty_json(dataset, path)?;
    info!("Wrote release to {}", path.display());
    Ok(())
}

/// Write the intermediate sequences file as pretty-printed JSON.
pub fn write_sequences(sequences: &[Sequence], path: &Path) -> Result<()> {
    write_pretty_json(&sequences, path)?;
    info!("Wrote {} sequences to {}", sequences.len(), path.display());
    Ok(())
}

fn write_pretty_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let encoded = serde_json::to_string_pretty(value).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    fs::write(path, encoded).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dataset::assemble::assemble;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_upstream_round_trip_preserves_records() {
        let dir = TempDir::new().unwrap();
        let upstream_path = dir.path().join("upstream.json");
        let release_path = dir.path().join("release.json");

        let raw = json!({
            "images": [{"id": "a", "file_name": "Set1/a.jpg", "width": 640}],
            "annotations": [{"id": "ann0", "image_id": "a", "category_id": 1}],
            "categories": [{"id": 1, "name": "Prong"}]
        });
        fs::write(&upstream_path, serde_json::to_string(&raw).unwrap()).unwrap();

        let upstream = read_upstream(&upstream_path).unwrap();
        let output = assemble(upstream);
        write_dataset(&output, &release_path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&release_path).unwrap()).unwrap();
        assert_eq!(written["images"], raw["images"]);
        assert_eq!(written["annotations"], raw["annotations"]);
        // "Prong" is not the exact historical name, so only casing changes.
        assert_eq!(written["categories"][0]["name"], "prong");
        assert_eq!(written["info"]["version"], "2021.07.19");
    }

    #[test]
    fn test_missing_upstream_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = read_upstream(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::UpstreamRead { .. })));
    }

    #[test]
    fn test_malformed_upstream_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upstream.json");
        fs::write(&path, "{\"images\": 3}").unwrap();
        let result = read_upstream(&path);
        assert!(matches!(result, Err(Error::UpstreamParse { .. })));
    }
}
