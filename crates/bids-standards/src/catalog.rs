//! Schema catalog backing [`SchemaDirectory`].
//!
//! The embedded catalog is loaded once per process and shared by reference;
//! tests build small in-memory catalogs with [`SchemaCatalog::new`].

use std::collections::BTreeMap;

use crate::error::{Result, StandardsError};
use crate::fnirs;
use crate::schema::{FileSchema, SchemaDirectory};

/// Channel type used when a data type has no registered mapping.
pub const FALLBACK_CHANNEL_TYPE: &str = "MISC";

/// Immutable set of file schemas and channel type mappings.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    files: Vec<FileSchema>,
    measurement_types: BTreeMap<String, String>,
}

impl SchemaCatalog {
    pub fn new(files: Vec<FileSchema>, measurement_types: BTreeMap<String, String>) -> Self {
        Self {
            files,
            measurement_types,
        }
    }

    /// Load the BIDS fNIRS catalog compiled into the binary.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let catalog = bids_standards::SchemaCatalog::load_embedded()?;
    /// let optodes = catalog.fields_for("_optodes.tsv")?;
    /// assert_eq!(optodes[0], "name");
    /// ```
    pub fn load_embedded() -> Result<Self> {
        Ok(Self {
            files: fnirs::load_file_schemas()?,
            measurement_types: fnirs::load_measurement_types()?,
        })
    }

    pub fn files(&self) -> &[FileSchema] {
        &self.files
    }
}

impl SchemaDirectory for SchemaCatalog {
    fn schema_for(&self, key: &str) -> Result<&FileSchema> {
        self.files
            .iter()
            .find(|schema| schema.key == key)
            .ok_or_else(|| StandardsError::UnknownFileKind {
                key: key.to_string(),
            })
    }

    fn measurement_type(&self, data_type: &str) -> Option<&str> {
        self.measurement_types.get(data_type.trim()).map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.files.iter().map(|schema| schema.key.as_str()).collect()
    }
}
