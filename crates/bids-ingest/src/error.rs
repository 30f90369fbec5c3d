//! Error types for source container access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or interpreting a source container.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Container Format Errors ===
    /// The container is not valid SNIRF JSON.
    #[error("failed to parse SNIRF container {name}: {source}")]
    ContainerParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The container has no measurement group.
    #[error("SNIRF container {name} has no nirs group")]
    EmptyContainer { name: String },

    // === Probe Errors ===
    /// The container has no probe group.
    #[error("SNIRF container {name} has no probe")]
    MissingProbe { name: String },

    /// Neither 3-D nor 2-D positions are present for both sources and detectors.
    #[error("probe has no complete set of source and detector positions")]
    MissingPositions,

    /// Both 3-D and 2-D positions are complete, so neither set is authoritative.
    #[error("probe has both 2-D and 3-D source and detector positions")]
    AmbiguousPositions,

    /// Label and position counts disagree.
    #[error("probe has {labels} {what} labels but {positions} positions")]
    LabelCountMismatch {
        what: &'static str,
        labels: usize,
        positions: usize,
    },

    /// A 1-based index points outside its table.
    #[error("{what} index {index} out of range (1..={len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    // === Time Axis Errors ===
    /// The time axis cannot yield a sampling interval.
    #[error("unusable time axis: {reason}")]
    InvalidTimeAxis { reason: String },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
