//! Typed coercion of raw `key=value` strings.

use std::fmt;

use crate::error::ExtractionError;

/// The declared type of a positional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer used as an identifier source.
    Id,
    Int,
    Float,
    Bool,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "unsigned integer",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Text => "text",
        })
    }
}

/// A field value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Id(u64),
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldKind {
    /// Coerce `raw` to this kind. `None` when it does not fit.
    ///
    /// Floats accept integer text; booleans accept `true`/`false` in any case.
    pub fn coerce(self, raw: &str) -> Option<FieldValue> {
        let raw = raw.trim();
        match self {
            Self::Id => raw.parse().ok().map(FieldValue::Id),
            Self::Int => raw.parse().ok().map(FieldValue::Int),
            Self::Float => raw.parse().ok().map(FieldValue::Float),
            Self::Bool => parse_bool_token(raw).map(FieldValue::Bool),
            Self::Text => Some(FieldValue::Text(raw.to_string())),
        }
    }
}

fn parse_bool_token(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl fmt::Display for FieldValue {
    /// Floats are written with six decimals and booleans as `True`/`False`,
    /// which is how game exports spell them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.6}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

pub(crate) fn id(field: &str, raw: &str) -> Result<u64, ExtractionError> {
    match FieldKind::Id.coerce(raw) {
        Some(FieldValue::Id(v)) => Ok(v),
        _ => Err(ExtractionError::field(field, FieldKind::Id, raw)),
    }
}

pub(crate) fn int(field: &str, raw: &str) -> Result<i64, ExtractionError> {
    match FieldKind::Int.coerce(raw) {
        Some(FieldValue::Int(v)) => Ok(v),
        _ => Err(ExtractionError::field(field, FieldKind::Int, raw)),
    }
}

pub(crate) fn float(field: &str, raw: &str) -> Result<f64, ExtractionError> {
    match FieldKind::Float.coerce(raw) {
        Some(FieldValue::Float(v)) => Ok(v),
        _ => Err(ExtractionError::field(field, FieldKind::Float, raw)),
    }
}

pub(crate) fn boolean(field: &str, raw: &str) -> Result<bool, ExtractionError> {
    match FieldKind::Bool.coerce(raw) {
        Some(FieldValue::Bool(v)) => Ok(v),
        _ => Err(ExtractionError::field(field, FieldKind::Bool, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionErrorKind;

    #[test]
    fn test_coerce_by_kind() {
        assert_eq!(FieldKind::Id.coerce(" 42 "), Some(FieldValue::Id(42)));
        assert_eq!(FieldKind::Int.coerce("-3"), Some(FieldValue::Int(-3)));
        assert_eq!(FieldKind::Float.coerce("7"), Some(FieldValue::Float(7.0)));
        assert_eq!(FieldKind::Bool.coerce("FALSE"), Some(FieldValue::Bool(false)));
        assert_eq!(
            FieldKind::Text.coerce("Rex"),
            Some(FieldValue::Text("Rex".into()))
        );
    }

    #[test]
    fn test_coerce_rejects_mismatched_text() {
        assert_eq!(FieldKind::Id.coerce("-1"), None);
        assert_eq!(FieldKind::Int.coerce("1.5"), None);
        assert_eq!(FieldKind::Float.coerce("abc"), None);
        assert_eq!(FieldKind::Bool.coerce("1"), None);
    }

    #[test]
    fn test_typed_helper_reports_field() {
        let err = int("CharacterLevel", "high").unwrap_err();
        assert_eq!(
            err.kind,
            ExtractionErrorKind::Coercion {
                field: "CharacterLevel".into(),
                kind: FieldKind::Int,
                value: "high".into(),
            }
        );
        assert_eq!(err.field_name(), Some("CharacterLevel"));
    }

    #[test]
    fn test_display_matches_export_spelling() {
        assert_eq!(FieldValue::Float(0.5).to_string(), "0.500000");
        assert_eq!(FieldValue::Bool(true).to_string(), "True");
        assert_eq!(FieldValue::Id(9).to_string(), "9");
    }
}
