//! `participants.tsv` and `scans.tsv` at the dataset root.

use std::path::{Path, PathBuf};

use bids_core::AcquisitionRecord;
use bids_model::DatasetRow;
use tracing::info;

use crate::error::Result;
use crate::table::{DatasetTable, UpsertOutcome};

pub const PARTICIPANTS_FILE: &str = "participants.tsv";
pub const SCANS_FILE: &str = "scans.tsv";

const PARTICIPANT_KEY: &str = "participant_id";
const SCAN_KEY: &str = "filename";

/// Upsert a participant row, keyed on `participant_id`.
pub fn update_participants(root: &Path, row: &DatasetRow) -> Result<UpsertOutcome> {
    upsert_into(&root.join(PARTICIPANTS_FILE), PARTICIPANT_KEY, row)
}

/// Upsert a scan row, keyed on `filename`.
pub fn update_scans(root: &Path, row: &DatasetRow) -> Result<UpsertOutcome> {
    upsert_into(&root.join(SCANS_FILE), SCAN_KEY, row)
}

/// Record an acquisition in both dataset tables.
pub fn write_dataset_tables(root: &Path, acquisition: &AcquisitionRecord) -> Result<Vec<PathBuf>> {
    update_participants(root, acquisition.participant())?;
    update_scans(root, acquisition.scan())?;
    Ok(vec![root.join(PARTICIPANTS_FILE), root.join(SCANS_FILE)])
}

fn upsert_into(path: &Path, key: &str, row: &DatasetRow) -> Result<UpsertOutcome> {
    let mut table = DatasetTable::open(path)?;
    let outcome = table.upsert(key, row)?;
    table.save()?;
    info!(
        path = %path.display(),
        key = row.get(key).unwrap_or_default(),
        ?outcome,
        "updated dataset table"
    );
    Ok(outcome)
}
