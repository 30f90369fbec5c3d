//! Field schema types and the lookup trait records are built from.

use std::collections::BTreeMap;

use bids_model::{FieldKind, RequirementLevel};

use crate::catalog::FALLBACK_CHANNEL_TYPE;
use crate::error::Result;

/// One declared field of a file kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub level: RequirementLevel,
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, level: RequirementLevel) -> Self {
        Self {
            name: name.into(),
            kind,
            level,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered default fields for one file kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSchema {
    /// Schema key, e.g. `_channels.tsv`.
    pub key: String,
    pub fields: Vec<FieldSpec>,
}

impl FileSchema {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.level.is_required())
    }
}

/// Read-only source of per-file-kind field schemas.
///
/// Keys are BIDS file suffixes (`_coordsystem.json`, `_optodes.tsv`,
/// `_channels.tsv`, `_events.tsv`, `_nirs.json`) plus the dataset tables
/// `participants.tsv` and `scans.tsv`.
pub trait SchemaDirectory {
    /// Schema registered under `key`, or [`StandardsError::UnknownFileKind`].
    ///
    /// [`StandardsError::UnknownFileKind`]: crate::StandardsError::UnknownFileKind
    fn schema_for(&self, key: &str) -> Result<&FileSchema>;

    /// BIDS channel type for a SNIRF data type or data type label.
    fn measurement_type(&self, data_type: &str) -> Option<&str>;

    /// Channel type for a data type, falling back to `MISC`.
    fn channel_type_or_misc(&self, data_type: &str) -> &str {
        self.measurement_type(data_type)
            .unwrap_or(FALLBACK_CHANNEL_TYPE)
    }

    /// Registered schema keys in load order.
    fn keys(&self) -> Vec<&str>;

    /// Default field names in declaration order.
    fn fields_for(&self, key: &str) -> Result<Vec<&str>> {
        Ok(self
            .schema_for(key)?
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .collect())
    }

    fn kinds_for(&self, key: &str) -> Result<Vec<(&str, FieldKind)>> {
        Ok(self
            .schema_for(key)?
            .fields
            .iter()
            .map(|field| (field.name.as_str(), field.kind))
            .collect())
    }

    /// Column descriptions; fields without one are left out.
    fn descriptions_for(&self, key: &str) -> Result<BTreeMap<String, String>> {
        Ok(self
            .schema_for(key)?
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .description
                    .as_ref()
                    .map(|description| (field.name.clone(), description.clone()))
            })
            .collect())
    }

    fn requirement_levels_for(&self, key: &str) -> Result<Vec<(&str, RequirementLevel)>> {
        Ok(self
            .schema_for(key)?
            .fields
            .iter()
            .map(|field| (field.name.as_str(), field.level))
            .collect())
    }
}
