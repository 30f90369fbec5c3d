//! Required-field checks run after export.
//!
//! Findings are warnings: they are logged and collected, never raised.

use bids_model::{ComplianceIssue, ComplianceReport, DatasetRow};
use bids_standards::SchemaDirectory;
use tracing::warn;

use crate::error::Result;
use crate::record::MetadataRecord;

/// Report every REQUIRED field of the record's kind that has no value.
pub fn check_record(record: &MetadataRecord, schema: &dyn SchemaDirectory) -> Result<ComplianceReport> {
    let key = record.file_kind().schema_key();
    missing_required(key, schema, |field| record.value(field).is_some())
}

/// Report every REQUIRED column of a dataset table row that has no value.
pub fn check_row(key: &str, row: &DatasetRow, schema: &dyn SchemaDirectory) -> Result<ComplianceReport> {
    missing_required(key, schema, |field| row.get(field).is_some())
}

fn missing_required(
    key: &str,
    schema: &dyn SchemaDirectory,
    is_present: impl Fn(&str) -> bool,
) -> Result<ComplianceReport> {
    let mut report = ComplianceReport::default();
    for (field, level) in schema.requirement_levels_for(key)? {
        if !level.is_required() || is_present(field) {
            continue;
        }
        warn!(file = key, field, "required field has no value");
        report.issues.push(ComplianceIssue {
            file: key.to_string(),
            field: field.to_string(),
            level,
        });
    }
    Ok(report)
}
