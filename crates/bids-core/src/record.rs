//! Schema-seeded metadata records.
//!
//! A [`MetadataRecord`] is an insertion-ordered set of named
//! [`FieldValue`]s. Construction seeds one absent field per default field
//! of the file kind's schema plus the reserved [`ORIGIN_FIELD`]. Fields
//! outside the schema can be added by assignment; their kind is inferred
//! from the first value. Default fields can be emptied but never removed.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use bids_model::{FieldKind, FieldValue, FileKind, Scalar, Value};
use bids_standards::SchemaDirectory;

use crate::error::{RecordError, Result};

/// Reserved field holding the path a record was last written to or loaded from.
pub const ORIGIN_FIELD: &str = "path2origin";

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    kind: FileKind,
    fields: Vec<(String, FieldValue)>,
    defaults: Vec<(String, FieldKind)>,
}

impl MetadataRecord {
    /// Build an empty record for `kind` from the schema.
    pub fn new(kind: FileKind, schema: &dyn SchemaDirectory) -> Result<Self> {
        let defaults = schema
            .kinds_for(kind.schema_key())?
            .into_iter()
            .map(|(name, field_kind)| (name.to_string(), field_kind))
            .collect();
        Ok(Self::with_defaults(kind, defaults))
    }

    pub(crate) fn with_defaults(kind: FileKind, defaults: Vec<(String, FieldKind)>) -> Self {
        let mut fields: Vec<(String, FieldValue)> = defaults
            .iter()
            .map(|(name, field_kind)| (name.clone(), FieldValue::new(*field_kind)))
            .collect();
        if !fields.iter().any(|(name, _)| name == ORIGIN_FIELD) {
            fields.push((ORIGIN_FIELD.to_string(), FieldValue::new(FieldKind::String)));
        }
        Self {
            kind,
            fields,
            defaults,
        }
    }

    pub fn file_kind(&self) -> FileKind {
        self.kind
    }

    /// Look up a field value, or a record attribute when no field has the name.
    ///
    /// Returns `Ok(None)` for a field that exists but has no value.
    pub fn get(&self, name: &str) -> Result<Option<Cow<'_, Value>>> {
        if let Some(field) = self.field(name) {
            return Ok(field.value().map(Cow::Borrowed));
        }
        let attribute = match name {
            "file_kind" => Value::text(self.kind.as_str()),
            "column_names" => text_sequence(self.column_names()),
            "default_fields" => text_sequence(self.default_field_names().collect()),
            _ => return Err(self.unknown(name)),
        };
        Ok(Some(Cow::Owned(attribute)))
    }

    /// The value of a field, if the field exists and is populated.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(FieldValue::value)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields
            .iter_mut()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    /// All fields in creation order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether the field is seeded by the schema (or is the reserved origin field).
    pub fn is_default(&self, name: &str) -> bool {
        name == ORIGIN_FIELD || self.defaults.iter().any(|(default, _)| default == name)
    }

    pub fn default_field_names(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(|(name, _)| name.as_str())
    }

    /// Assign a value, validating it against an existing field's kind.
    ///
    /// A new name creates a field whose kind is inferred from `value`; that
    /// path never fails. On rejection the field is left untouched. A bare
    /// null is stored as no value, matching how documents load `null`.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        let value = value.filter(|value| !matches!(value, Value::Scalar(Scalar::Null)));
        match self.field_mut(name) {
            Some(field) => {
                if !field.validate(value.as_ref()) {
                    return Err(RecordError::InvalidValue {
                        name: name.to_string(),
                        expected: field.kind(),
                    });
                }
                field.set(value);
            }
            None => self
                .fields
                .push((name.to_string(), FieldValue::inferred(value))),
        }
        Ok(())
    }

    /// Shorthand for [`set`](Self::set) with a present value.
    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set(name, Some(value.into()))
    }

    /// Delete a non-default field.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.is_default(name) {
            return Err(RecordError::ProtectedField {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        let position = self
            .fields
            .iter()
            .position(|(field_name, _)| field_name == name)
            .ok_or_else(|| self.unknown(name))?;
        self.fields.remove(position);
        Ok(())
    }

    /// Switch a field between String and Number, clearing its value.
    pub fn retype_field(&mut self, name: &str) -> Result<()> {
        let kind = self.kind;
        let field = self
            .field_mut(name)
            .ok_or_else(|| RecordError::UnknownField {
                kind,
                name: name.to_string(),
            })?;
        field.retype();
        Ok(())
    }

    /// Names of fields that hold a value, in creation order.
    pub fn populated_field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_populated())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Populated field names that are written as content (excludes the origin).
    pub fn column_names(&self) -> Vec<&str> {
        self.populated_field_names()
            .into_iter()
            .filter(|name| *name != ORIGIN_FIELD)
            .collect()
    }

    /// Path the record was last written to or loaded from.
    pub fn origin(&self) -> Option<PathBuf> {
        self.value(ORIGIN_FIELD)
            .and_then(Value::as_text)
            .map(PathBuf::from)
    }

    pub(crate) fn set_origin(&mut self, path: &Path) {
        if let Some(field) = self.field_mut(ORIGIN_FIELD) {
            field.set(Some(Value::text(path.display().to_string())));
        }
    }

    /// Replace the whole field set, keeping defaults and the origin field present.
    pub(crate) fn replace_fields(&mut self, loaded: Vec<(String, FieldValue)>) {
        let mut fields = loaded;
        for (name, field_kind) in &self.defaults {
            if !fields.iter().any(|(field_name, _)| field_name == name) {
                fields.push((name.clone(), FieldValue::new(*field_kind)));
            }
        }
        if !fields.iter().any(|(name, _)| name == ORIGIN_FIELD) {
            fields.push((ORIGIN_FIELD.to_string(), FieldValue::new(FieldKind::String)));
        }
        self.fields = fields;
    }

    fn unknown(&self, name: &str) -> RecordError {
        RecordError::UnknownField {
            kind: self.kind,
            name: name.to_string(),
        }
    }
}

fn text_sequence(names: Vec<&str>) -> Value {
    Value::Sequence(names.into_iter().map(Scalar::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> MetadataRecord {
        MetadataRecord::with_defaults(
            FileKind::Events,
            vec![
                ("onset".to_string(), FieldKind::Number),
                ("trial_type".to_string(), FieldKind::String),
            ],
        )
    }

    #[test]
    fn seeds_defaults_and_origin() {
        let record = events();
        let names: Vec<_> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["onset", "trial_type", ORIGIN_FIELD]);
        assert!(record.populated_field_names().is_empty());
    }

    #[test]
    fn attributes_resolve_when_no_field_matches() {
        let mut record = events();
        record.assign("onset", vec![1.0, 2.0]).unwrap();
        let kind = record.get("file_kind").unwrap().unwrap();
        assert_eq!(kind.as_text(), Some("events"));
        let columns = record.get("column_names").unwrap().unwrap();
        assert_eq!(columns.into_owned(), Value::from(vec!["onset"]));
        assert!(record.get("trial_type").unwrap().is_none());
        assert!(matches!(
            record.get("nope"),
            Err(RecordError::UnknownField { .. })
        ));
    }

    #[test]
    fn origin_is_protected() {
        let mut record = events();
        assert!(matches!(
            record.remove(ORIGIN_FIELD),
            Err(RecordError::ProtectedField { .. })
        ));
        assert!(record.set(ORIGIN_FIELD, Some(Value::from(1_i64))).is_err());
    }

    #[test]
    fn replace_fields_reseeds_missing_defaults() {
        let mut record = events();
        record.replace_fields(vec![(
            "extra".to_string(),
            FieldValue::inferred(Some(Value::from("x"))),
        )]);
        let names: Vec<_> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["extra", "onset", "trial_type", ORIGIN_FIELD]);
    }
}
