//! JSON text rendering of an acquisition's file layout.

use std::path::{Path, PathBuf};

use bids_core::AcquisitionRecord;
use tracing::debug;

use crate::error::{Result, io_error};

/// Name of the summary written by the text output format.
pub const TEXT_SUMMARY_FILE: &str = "snirf.json";

/// Compact JSON: `{"name", "filenames": {"subject", "session"}, "sessions"}`.
pub fn render_text(acquisition: &AcquisitionRecord) -> Result<String> {
    let text = acquisition.to_text()?;
    Ok(serde_json::to_string(&text)?)
}

/// Write the summary into `directory` and return its path.
pub fn write_text(directory: &Path, acquisition: &AcquisitionRecord) -> Result<PathBuf> {
    let content = render_text(acquisition)?;
    std::fs::create_dir_all(directory).map_err(io_error(directory))?;
    let path = directory.join(TEXT_SUMMARY_FILE);
    std::fs::write(&path, content).map_err(io_error(&path))?;
    debug!(path = %path.display(), "wrote text summary");
    Ok(path)
}
