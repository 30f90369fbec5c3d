//! Typed field cells.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value::Value;

/// Declared kind of a metadata field.
///
/// `String` fields hold text (or nothing). `Number` fields hold anything
/// that is not text; the check is deliberately loose, booleans and numbers
/// are both accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
        }
    }

    /// Whether `value` may be stored in a field of this kind.
    ///
    /// Absence is valid for both kinds. Sequences are checked element-wise.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return true;
        };
        match self {
            FieldKind::String => value.is_textual() || value.is_empty_value(),
            FieldKind::Number => !value.is_textual(),
        }
    }

    /// Kind assigned to a field created on first assignment.
    ///
    /// The result always accepts `value`.
    pub fn infer(value: Option<&Value>) -> FieldKind {
        match value {
            None => FieldKind::String,
            Some(value) if value.is_textual() || value.is_empty_value() => FieldKind::String,
            Some(_) => FieldKind::Number,
        }
    }

    /// The other kind.
    pub fn flipped(&self) -> FieldKind {
        match self {
            FieldKind::String => FieldKind::Number,
            FieldKind::Number => FieldKind::String,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STRING" | "TEXT" => Ok(FieldKind::String),
            "NUMBER" | "NUMERIC" => Ok(FieldKind::Number),
            _ => Err(format!("Unknown field kind: {s}")),
        }
    }
}

/// A named field's current value and declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    kind: FieldKind,
    value: Option<Value>,
}

impl FieldValue {
    /// An absent value of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self { kind, value: None }
    }

    /// A field whose kind is inferred from its first value.
    pub fn inferred(value: Option<Value>) -> Self {
        Self {
            kind: FieldKind::infer(value.as_ref()),
            value,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.value.is_some()
    }

    /// Whether `candidate` is compatible with this field's kind.
    pub fn validate(&self, candidate: Option<&Value>) -> bool {
        self.kind.accepts(candidate)
    }

    /// Store a value without checking it.
    pub fn set(&mut self, value: Option<Value>) {
        self.value = value;
    }

    /// Flip the kind and clear the value.
    pub fn retype(&mut self) {
        self.kind = self.kind.flipped();
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn string_kind_rejects_numbers() {
        assert!(FieldKind::String.accepts(Some(&Value::from("mm"))));
        assert!(FieldKind::String.accepts(None));
        assert!(!FieldKind::String.accepts(Some(&Value::from(3.0))));
        assert!(!FieldKind::String.accepts(Some(&Value::from(vec![1.0, 2.0]))));
    }

    #[test]
    fn number_kind_is_permissive() {
        assert!(FieldKind::Number.accepts(Some(&Value::from(true))));
        assert!(FieldKind::Number.accepts(Some(&Value::from(vec![1_i64, 2]))));
        assert!(FieldKind::Number.accepts(Some(&Value::Scalar(Scalar::Null))));
        assert!(!FieldKind::Number.accepts(Some(&Value::from("10"))));
    }

    #[test]
    fn inference_prefers_string_for_empty_values() {
        assert_eq!(FieldKind::infer(None), FieldKind::String);
        assert_eq!(
            FieldKind::infer(Some(&Value::Sequence(vec![]))),
            FieldKind::String
        );
        assert_eq!(FieldKind::infer(Some(&Value::from(2_i64))), FieldKind::Number);
        let mixed = Value::Sequence(vec!["a".into(), Scalar::Integer(1)]);
        assert_eq!(FieldKind::infer(Some(&mixed)), FieldKind::Number);
        assert!(FieldKind::Number.accepts(Some(&mixed)));
    }

    #[test]
    fn retype_flips_and_clears() {
        let mut field = FieldValue::inferred(Some(Value::from("x")));
        field.retype();
        assert_eq!(field.kind(), FieldKind::Number);
        assert!(!field.is_populated());
    }

    #[test]
    fn parses_kind_names() {
        assert_eq!("string".parse::<FieldKind>().unwrap(), FieldKind::String);
        assert_eq!("Number".parse::<FieldKind>().unwrap(), FieldKind::Number);
        assert!("object".parse::<FieldKind>().is_err());
    }
}
