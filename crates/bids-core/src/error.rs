//! Error types for metadata records and acquisition export.

use std::path::PathBuf;

use bids_ingest::IngestError;
use bids_model::{FieldKind, FileKind};
use bids_standards::StandardsError;
use thiserror::Error;

/// Errors raised by record operations and acquisition export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// The schema has no entry for the requested file kind.
    #[error(transparent)]
    Schema(#[from] StandardsError),

    /// The name is neither a field nor a record attribute.
    #[error("unknown field '{name}' on {kind} record")]
    UnknownField { kind: FileKind, name: String },

    /// The value does not match the field's declared kind.
    #[error("value for '{name}' is not a valid {expected}")]
    InvalidValue { name: String, expected: FieldKind },

    /// Default fields cannot be removed.
    #[error("'{name}' is a default field of {kind} and cannot be removed")]
    ProtectedField { kind: FileKind, name: String },

    /// A required BIDS entity label could not be resolved.
    #[error("cannot resolve the {label} label of {source_name}")]
    MissingIdentity {
        label: &'static str,
        source_name: String,
    },

    /// A document or table on disk does not have the expected shape.
    #[error("malformed {path}: {message}")]
    Format { path: PathBuf, message: String },

    /// Failed to encode a document.
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to read or write a file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source container could not supply a value.
    #[error(transparent)]
    Source(#[from] IngestError),
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

pub(crate) fn io_error(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> RecordError + '_ {
    move |source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    }
}
