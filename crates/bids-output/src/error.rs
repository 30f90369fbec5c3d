use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row for {path} has no value in key column '{key}'")]
    MissingKey { path: PathBuf, key: String },

    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Record(#[from] bids_core::RecordError),
}

pub type Result<T> = std::result::Result<T, OutputError>;

pub(crate) fn io_error(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}
