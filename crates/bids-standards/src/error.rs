//! Error types for schema loading and lookup.

use thiserror::Error;

/// Errors raised while loading or querying the field schema.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// No schema is registered for the file kind.
    #[error("No schema registered for file kind '{key}'")]
    UnknownFileKind { key: String },

    /// Failed to parse an embedded CSV table.
    #[error("Failed to parse {file}: {message}")]
    CsvParse { file: String, message: String },

    /// Invalid value in a CSV field.
    #[error("Invalid {field} value '{value}' in {file}")]
    InvalidValue {
        field: &'static str,
        value: String,
        file: String,
    },

    /// The same field is declared twice for one file kind.
    #[error("Field '{field}' declared twice for '{key}'")]
    DuplicateField { key: String, field: String },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, StandardsError>;
