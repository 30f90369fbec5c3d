//! Records serialized as flat JSON documents.

use std::path::{Path, PathBuf};

use bids_model::{FieldValue, FileKind, Labels, Scalar, Value, build_filename};
use bids_standards::SchemaDirectory;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{RecordError, Result, io_error};
use crate::file::MetadataFile;
use crate::record::{MetadataRecord, ORIGIN_FIELD};

/// A record written as one JSON object of its populated fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    record: MetadataRecord,
}

impl DocumentRecord {
    pub fn new(kind: FileKind, schema: &dyn SchemaDirectory) -> Result<Self> {
        Ok(Self {
            record: MetadataRecord::new(kind, schema)?,
        })
    }

    pub fn record_mut(&mut self) -> &mut MetadataRecord {
        &mut self.record
    }

    /// The document text: populated fields in creation order, 4-space indented.
    pub fn to_json_string(&self) -> Result<String> {
        let mut object = serde_json::Map::new();
        for name in self.record.column_names() {
            if let Some(value) = self.record.value(name) {
                let json = serde_json::to_value(value).map_err(RecordError::Encode)?;
                object.insert(name.to_string(), json);
            }
        }

        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        serde::Serialize::serialize(&object, &mut serializer).map_err(RecordError::Encode)?;
        buffer.push(b'\n');
        String::from_utf8(buffer).map_err(|e| RecordError::Format {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    fn parse(path: &Path, content: &str) -> Result<Vec<(String, FieldValue)>> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)
            .map_err(|e| RecordError::Format {
                path: path.to_path_buf(),
                message: format!("expected a JSON object: {e}"),
            })?;

        let mut fields = Vec::with_capacity(object.len());
        for (name, json) in object {
            let value: Value =
                serde_json::from_value(json).map_err(|_| RecordError::Format {
                    path: path.to_path_buf(),
                    message: format!("field '{name}' is not a scalar or a flat array"),
                })?;
            let value = match value {
                Value::Scalar(Scalar::Null) => None,
                other => Some(other),
            };
            fields.push((name, FieldValue::inferred(value)));
        }
        Ok(fields)
    }
}

impl MetadataFile for DocumentRecord {
    fn record(&self) -> &MetadataRecord {
        &self.record
    }

    fn save_to(&mut self, labels: &Labels, directory: &Path) -> Result<PathBuf> {
        let path = directory.join(build_filename(self.record.file_kind(), labels, None));
        let content = self.to_json_string()?;
        std::fs::create_dir_all(directory).map_err(io_error(directory))?;
        std::fs::write(&path, content).map_err(io_error(&path))?;
        self.record.set_origin(&path);
        debug!(path = %path.display(), kind = %self.record.file_kind(), "wrote document");
        Ok(path)
    }

    /// Replace every field with the document's keys, inferring each kind.
    ///
    /// Default fields missing from the document are re-seeded absent. The
    /// record is unchanged when the file cannot be read or parsed.
    fn load_from(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(io_error(path))?;
        let mut fields = Self::parse(path, &content)?;
        fields.retain(|(name, _)| name != ORIGIN_FIELD);
        self.record.replace_fields(fields);
        self.record.set_origin(path);
        debug!(path = %path.display(), kind = %self.record.file_kind(), "loaded document");
        Ok(())
    }
}
