//! Dataset-level output for converted acquisitions.
//!
//! - **Dataset tables**: `participants.tsv` and `scans.tsv` are upserted so
//!   converting several acquisitions into one root accumulates rows
//! - **Text summary**: the file layout of an acquisition as compact JSON

pub mod dataset;
pub mod error;
pub mod table;
pub mod text;

pub use dataset::{
    PARTICIPANTS_FILE, SCANS_FILE, update_participants, update_scans, write_dataset_tables,
};
pub use error::{OutputError, Result};
pub use table::{DatasetTable, UpsertOutcome};
pub use text::{TEXT_SUMMARY_FILE, render_text, write_text};
