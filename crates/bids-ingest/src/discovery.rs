//! Source file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::snirf::SNIRF_JSON_EXTENSION;

/// Lists JSON-rendered SNIRF files in a directory.
///
/// Returns files sorted by filename.
pub fn list_snirf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && is_snirf_json(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Case-insensitive check for the `.snirf.json` extension.
pub fn is_snirf_json(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase().ends_with(SNIRF_JSON_EXTENSION))
        .unwrap_or(false)
}
