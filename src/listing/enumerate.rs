//! Recursive file enumeration with a cached listing.
//!
//! Walking a multi-terabyte image tree takes long enough that the
//! listing is cached as JSON next to the other outputs. The cache is
//! trusted once written; pass `force` to rebuild it after the tree
//! changes.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// Enumerate all files under `root` as sorted root-relative paths with
/// forward slashes, reading or writing the cache at `cache_path`.
pub fn enumerate_files(root: &Path, cache_path: &Path, force: bool) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(Error::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    if cache_path.is_file() && !force {
        let contents = fs::read_to_string(cache_path).map_err(|e| Error::FileListRead {
            path: cache_path.to_path_buf(),
            source: e,
        })?;
        let files: Vec<String> =
            serde_json::from_str(&contents).map_err(|e| Error::FileListParse {
                path: cache_path.to_path_buf(),
                source: e,
            })?;
        info!("Loaded {} cached file names from {}", files.len(), cache_path.display());
        return Ok(files);
    }

    info!("Enumerating files under {}", root.display());
    let mut files = Vec::new();
    walk(root, root, &mut files)?;
    files.sort_unstable();

    let encoded = serde_json::to_string_pretty(&files).map_err(|e| Error::FileListWrite {
        path: cache_path.to_path_buf(),
        source: Box::new(e),
    })?;
    fs::write(cache_path, encoded).map_err(|e| Error::FileListWrite {
        path: cache_path.to_path_buf(),
        source: Box::new(e),
    })?;

    info!("Enumerated {} files", files.len());
    Ok(files)
}

fn walk(dir: &Path, root: &Path, files: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, root, files)?;
        } else if path.is_file() {
            files.push(relative_path(&path, root));
        }
    }
    Ok(())
}

fn relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
