//! Scalar and sequence values held by metadata fields.
//!
//! A field holds either a single [`Scalar`] or a flat sequence of them
//! (one element per table row). Nested sequences are not representable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker written in tables for a missing cell.
pub const NOT_AVAILABLE: &str = "n/a";

/// A single JSON-compatible value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view of the scalar, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(value) => Some(*value as f64),
            Scalar::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Scalar::Text(_))
    }

    /// Null and non-finite floats both count as missing.
    pub fn is_null(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Float(value) => !value.is_finite(),
            _ => false,
        }
    }

    /// Parse a table cell as a number: integer first, then float.
    ///
    /// `true` and `false` read back as booleans, which number columns accept
    /// and write verbatim.
    pub fn parse_number(cell: &str) -> Option<Scalar> {
        let trimmed = cell.trim();
        if trimmed == NOT_AVAILABLE || trimmed.is_empty() {
            return Some(Scalar::Null);
        }
        match trimmed {
            "true" => return Some(Scalar::Boolean(true)),
            "false" => return Some(Scalar::Boolean(false)),
            _ => {}
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Some(Scalar::Integer(value));
        }
        trimmed.parse::<f64>().ok().map(Scalar::Float)
    }

    /// Parse a table cell as text; `n/a` becomes null.
    ///
    /// Null and the literal text `n/a` render to the same cell, so a text
    /// value of `n/a` reads back as null.
    pub fn parse_text(cell: &str) -> Scalar {
        if cell == NOT_AVAILABLE {
            Scalar::Null
        } else {
            Scalar::Text(cell.to_string())
        }
    }
}

impl fmt::Display for Scalar {
    /// Renders the scalar as a table cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Integer(value) => write!(f, "{value}"),
            Scalar::Float(value) => f.write_str(&format_float(*value)),
            Scalar::Boolean(value) => write!(f, "{value}"),
            Scalar::Null => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Format a float so that it always reads back as a float.
///
/// Non-finite values render as `n/a`.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rendered = value.to_string();
    if rendered.contains('.') {
        rendered
    } else {
        format!("{rendered}.0")
    }
}

/// Format a number without a trailing `.0` for use inside identifiers.
pub fn format_compact(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// The content of a metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(text.into()))
    }

    /// Text content of a scalar text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Scalar(scalar) => scalar.as_text(),
            Value::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Scalar]> {
        match self {
            Value::Sequence(items) => Some(items),
            Value::Scalar(_) => None,
        }
    }

    /// Cells of this value when laid out as a table column.
    ///
    /// A scalar occupies a single row.
    pub fn cells(&self) -> &[Scalar] {
        match self {
            Value::Scalar(scalar) => std::slice::from_ref(scalar),
            Value::Sequence(items) => items,
        }
    }

    /// Number of rows this value occupies as a table column.
    pub fn row_count(&self) -> usize {
        self.cells().len()
    }

    /// True for text, or a sequence of text with only nulls besides.
    pub fn is_textual(&self) -> bool {
        match self {
            Value::Scalar(scalar) => scalar.is_text(),
            Value::Sequence(items) => {
                items.iter().any(Scalar::is_text)
                    && items.iter().all(|item| item.is_text() || *item == Scalar::Null)
            }
        }
    }

    /// True for null, or a sequence with nothing but nulls.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Value::Scalar(scalar) => *scalar == Scalar::Null,
            Value::Sequence(items) => items.iter().all(|item| *item == Scalar::Null),
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Scalar::Float(value as f64), Scalar::Integer)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(value.into())
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}
