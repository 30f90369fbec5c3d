//! Records serialized as tab-separated tables.
//!
//! Every populated field is a column; element `i` of each field's sequence
//! is row `i`. Each table also carries a column-description companion
//! document (the "sidecar") built from the schema's descriptions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bids_model::{FieldKind, FileKind, Labels, Marker, Scalar, Value, build_filename};
use bids_standards::SchemaDirectory;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{RecordError, Result, io_error};
use crate::file::MetadataFile;
use crate::record::MetadataRecord;

/// Description entry of one column in a table's companion document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    #[serde(rename = "Description")]
    pub description: String,
}

/// Ordered column descriptions of a table; `None` for undocumented columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSidecar {
    entries: Vec<(String, Option<ColumnDescription>)>,
}

impl ColumnSidecar {
    pub fn entries(&self) -> &[(String, Option<ColumnDescription>)] {
        &self.entries
    }

    pub fn description(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, entry)| entry.as_ref())
            .map(|entry| entry.description.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ColumnSidecar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// A record written as a TSV table plus its column-description companion.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRecord {
    record: MetadataRecord,
    descriptions: BTreeMap<String, String>,
    sidecar: ColumnSidecar,
}

impl TabularRecord {
    pub fn new(kind: FileKind, schema: &dyn SchemaDirectory) -> Result<Self> {
        let record = MetadataRecord::new(kind, schema)?;
        let descriptions = schema.descriptions_for(kind.schema_key())?;
        let mut table = Self {
            record,
            descriptions,
            sidecar: ColumnSidecar::default(),
        };
        table.build_sidecar();
        Ok(table)
    }

    /// See [`MetadataRecord::set`]; the sidecar follows the populated columns.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        self.record.set(name, value)?;
        self.build_sidecar();
        Ok(())
    }

    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set(name, Some(value.into()))
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.record.remove(name)?;
        self.build_sidecar();
        Ok(())
    }

    pub fn retype_field(&mut self, name: &str) -> Result<()> {
        self.record.retype_field(name)?;
        self.build_sidecar();
        Ok(())
    }

    pub fn sidecar(&self) -> &ColumnSidecar {
        &self.sidecar
    }

    /// Rebuild the companion from the currently populated columns.
    pub fn build_sidecar(&mut self) {
        let entries = self
            .record
            .column_names()
            .into_iter()
            .map(|name| {
                let entry = self
                    .descriptions
                    .get(name)
                    .map(|description| ColumnDescription {
                        description: description.clone(),
                    });
                (name.to_string(), entry)
            })
            .collect();
        self.sidecar = ColumnSidecar { entries };
    }

    /// Number of rows, or a format error naming the ragged columns.
    pub fn row_count(&self) -> Result<usize> {
        let lengths: Vec<(&str, usize)> = self
            .record
            .column_names()
            .into_iter()
            .filter_map(|name| self.record.value(name).map(|v| (name, v.row_count())))
            .collect();
        let Some((_, rows)) = lengths.first().copied() else {
            return Ok(0);
        };
        if lengths.iter().any(|(_, len)| *len != rows) {
            let detail: Vec<String> = lengths
                .iter()
                .map(|(name, len)| format!("{name}={len}"))
                .collect();
            return Err(RecordError::Format {
                path: self.target_hint(),
                message: format!("columns have different lengths ({})", detail.join(", ")),
            });
        }
        Ok(rows)
    }

    /// The table text: a header row and one row per element.
    pub fn to_tsv_string(&self) -> Result<String> {
        let rows = self.row_count()?;
        let columns: Vec<(&str, &Value)> = self
            .record
            .column_names()
            .into_iter()
            .filter_map(|name| self.record.value(name).map(|value| (name, value)))
            .collect();
        if columns.is_empty() {
            return Ok(String::new());
        }

        let path = self.target_hint();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(Vec::new());
        let csv_error = |e: csv::Error| RecordError::Format {
            path: path.clone(),
            message: e.to_string(),
        };
        writer
            .write_record(columns.iter().map(|(name, _)| *name))
            .map_err(csv_error)?;
        for row in 0..rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|(_, value)| value.cells()[row].to_string())
                .collect();
            writer.write_record(&cells).map_err(csv_error)?;
        }
        let bytes = writer.into_inner().map_err(|e| RecordError::Format {
            path: path.clone(),
            message: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| RecordError::Format {
            path,
            message: e.to_string(),
        })
    }

    /// Companion document text.
    pub fn sidecar_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.sidecar
            .serialize(&mut serializer)
            .map_err(RecordError::Encode)?;
        buffer.push(b'\n');
        String::from_utf8(buffer).map_err(|e| RecordError::Format {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Write the companion document next to the table.
    pub fn export_sidecar(&self, labels: &Labels, directory: &Path) -> Result<PathBuf> {
        let path = directory.join(build_filename(
            self.record.file_kind(),
            labels,
            Some(Marker::Sidecar),
        ));
        let content = self.sidecar_json_string()?;
        std::fs::create_dir_all(directory).map_err(io_error(directory))?;
        std::fs::write(&path, content).map_err(io_error(&path))?;
        debug!(path = %path.display(), kind = %self.record.file_kind(), "wrote column sidecar");
        Ok(path)
    }

    /// Replace the companion with a document read from disk.
    ///
    /// Loaded descriptions also take precedence over the schema's when the
    /// companion is rebuilt later.
    pub fn load_sidecar(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(io_error(path))?;
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| RecordError::Format {
                path: path.to_path_buf(),
                message: format!("expected a JSON object: {e}"),
            })?;

        let mut entries = Vec::with_capacity(object.len());
        for (name, json) in object {
            let entry: Option<ColumnDescription> =
                serde_json::from_value(json).map_err(|e| RecordError::Format {
                    path: path.to_path_buf(),
                    message: format!("column '{name}': {e}"),
                })?;
            if let Some(entry) = &entry {
                self.descriptions
                    .insert(name.clone(), entry.description.clone());
            }
            entries.push((name, entry));
        }
        self.sidecar = ColumnSidecar { entries };
        Ok(())
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<(String, Value)>> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let format_error = |message: String| RecordError::Format {
            path: path.to_path_buf(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_reader(content.as_bytes());
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record.map_err(|e| format_error(e.to_string()))?,
            None => return Ok(Vec::new()),
        };

        let mut columns: Vec<(String, FieldKind, Vec<Scalar>)> = Vec::with_capacity(header.len());
        for name in &header {
            let field = self
                .record
                .field(name)
                .ok_or_else(|| RecordError::UnknownField {
                    kind: self.record.file_kind(),
                    name: name.to_string(),
                })?;
            columns.push((name.to_string(), field.kind(), Vec::new()));
        }

        for (row, record) in records.enumerate() {
            let record = record.map_err(|e| format_error(e.to_string()))?;
            for ((name, kind, cells), cell) in columns.iter_mut().zip(record.iter()) {
                let scalar = match kind {
                    FieldKind::String => Scalar::parse_text(cell),
                    FieldKind::Number => Scalar::parse_number(cell).ok_or_else(|| {
                        format_error(format!(
                            "row {}: '{cell}' in column '{name}' is not a number",
                            row + 1
                        ))
                    })?,
                };
                cells.push(scalar);
            }
        }

        Ok(columns
            .into_iter()
            .map(|(name, _, cells)| (name, Value::Sequence(cells)))
            .collect())
    }

    fn target_hint(&self) -> PathBuf {
        self.record
            .origin()
            .unwrap_or_else(|| PathBuf::from(self.record.file_kind().suffix(None)))
    }
}

impl MetadataFile for TabularRecord {
    fn record(&self) -> &MetadataRecord {
        &self.record
    }

    /// Write the table; columns of unequal length are rejected before writing.
    fn save_to(&mut self, labels: &Labels, directory: &Path) -> Result<PathBuf> {
        let path = directory.join(build_filename(self.record.file_kind(), labels, None));
        let content = self.to_tsv_string()?;
        std::fs::create_dir_all(directory).map_err(io_error(directory))?;
        std::fs::write(&path, content).map_err(io_error(&path))?;
        self.record.set_origin(&path);
        debug!(path = %path.display(), kind = %self.record.file_kind(), "wrote table");
        Ok(path)
    }

    /// Read a table whose columns are all existing fields of this record.
    ///
    /// Cells are coerced by the field's kind. Nothing is assigned unless the
    /// whole table parses.
    fn load_from(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(io_error(path))?;
        let columns = self.parse(path, &content)?;
        let mut updated = self.record.clone();
        for (name, value) in columns {
            updated.set(&name, Some(value))?;
        }
        updated.set_origin(path);
        self.record = updated;
        self.build_sidecar();
        debug!(path = %path.display(), kind = %self.record.file_kind(), "loaded table");
        Ok(())
    }
}
