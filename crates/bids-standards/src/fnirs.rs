//! BIDS fNIRS field and channel-type loading.
//!
//! Parses the embedded CSV tables into [`FileSchema`] values, keeping the
//! row order of `Fields.csv` as the field order of each file kind.

use std::collections::BTreeMap;
use std::io::Cursor;

use bids_model::{FieldKind, RequirementLevel};
use serde::Deserialize;

use crate::embedded;
use crate::error::{Result, StandardsError};
use crate::schema::{FieldSpec, FileSchema};

// =============================================================================
// CSV Row Types
// =============================================================================

/// Row from Fields.csv.
#[derive(Debug, Deserialize)]
struct FieldCsvRow {
    #[serde(rename = "File Kind")]
    file_kind: String,
    #[serde(rename = "Field Name")]
    field_name: String,
    #[serde(rename = "Type")]
    field_type: String,
    #[serde(rename = "Requirement Level")]
    requirement_level: String,
    #[serde(rename = "Description")]
    description: String,
}

/// Row from MeasurementTypes.csv.
#[derive(Debug, Deserialize)]
struct MeasurementTypeCsvRow {
    #[serde(rename = "SNIRF Data Type")]
    data_type: String,
    #[serde(rename = "BIDS Channel Type")]
    channel_type: String,
}

// =============================================================================
// Loading Functions
// =============================================================================

/// Load the embedded file schemas, in first-seen order of their keys.
pub fn load_file_schemas() -> Result<Vec<FileSchema>> {
    load_file_schemas_from_str(embedded::FNIRS_FIELDS, "Fields.csv")
}

/// Load the embedded SNIRF data type to BIDS channel type table.
pub fn load_measurement_types() -> Result<BTreeMap<String, String>> {
    load_measurement_types_from_str(embedded::FNIRS_MEASUREMENT_TYPES, "MeasurementTypes.csv")
}

/// Load file schemas from CSV text with a `Fields.csv` header.
pub fn load_file_schemas_from_str(content: &str, file: &str) -> Result<Vec<FileSchema>> {
    let cursor = Cursor::new(content.as_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(cursor);

    let mut schemas: Vec<FileSchema> = Vec::new();

    for result in reader.deserialize::<FieldCsvRow>() {
        let row = result.map_err(|e| StandardsError::CsvParse {
            file: file.to_string(),
            message: e.to_string(),
        })?;

        let key = row.file_kind.trim();
        let name = row.field_name.trim();
        if key.is_empty() || name.is_empty() {
            continue;
        }

        let kind: FieldKind =
            row.field_type
                .parse()
                .map_err(|_| StandardsError::InvalidValue {
                    field: "Type",
                    value: row.field_type.clone(),
                    file: file.to_string(),
                })?;
        let level: RequirementLevel =
            row.requirement_level
                .parse()
                .map_err(|_| StandardsError::InvalidValue {
                    field: "Requirement Level",
                    value: row.requirement_level.clone(),
                    file: file.to_string(),
                })?;

        let mut spec = FieldSpec::new(name, kind, level);
        if let Some(description) = non_empty(&row.description) {
            spec = spec.with_description(description);
        }

        let position = match schemas.iter().position(|schema| schema.key == key) {
            Some(position) => position,
            None => {
                schemas.push(FileSchema::new(key));
                schemas.len() - 1
            }
        };
        let schema = &mut schemas[position];
        if schema.field(name).is_some() {
            return Err(StandardsError::DuplicateField {
                key: key.to_string(),
                field: name.to_string(),
            });
        }
        schema.fields.push(spec);
    }

    Ok(schemas)
}

/// Load a channel type table from CSV text.
pub fn load_measurement_types_from_str(
    content: &str,
    file: &str,
) -> Result<BTreeMap<String, String>> {
    let cursor = Cursor::new(content.as_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(cursor);

    let mut types = BTreeMap::new();
    for result in reader.deserialize::<MeasurementTypeCsvRow>() {
        let row = result.map_err(|e| StandardsError::CsvParse {
            file: file.to_string(),
            message: e.to_string(),
        })?;
        let Some(data_type) = non_empty(&row.data_type) else {
            continue;
        };
        if let Some(channel_type) = non_empty(&row.channel_type) {
            types.insert(data_type, channel_type);
        }
    }
    Ok(types)
}

// =============================================================================
// Helpers
// =============================================================================

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
