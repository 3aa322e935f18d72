use asb_submit_core::FormatError;

use crate::fields::FieldKind;

/// Why a record could not be extracted from a normalized file.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionErrorKind {
    #[error("Missing section [{0}]")]
    MissingSection(String),

    #[error("Section [{section}] has {actual} fields, expected {expected}")]
    Cardinality {
        section: String,
        expected: String,
        actual: usize,
    },

    #[error("Field {field}: {value:?} is not a valid {kind}")]
    Coercion {
        field: String,
        kind: FieldKind,
        value: String,
    },

    #[error("Field {field}: malformed color {value:?}")]
    MalformedColor { field: String, value: String },

    #[error("Field {field}: malformed ancestor entry {value:?}")]
    MalformedAncestor { field: String, value: String },

    #[error("Identifier: {0}")]
    Identifier(#[from] FormatError),
}

/// An [`ExtractionErrorKind`] plus the file it came from, once known.
///
/// Extractors work on documents and have no idea where the text was read
/// from; callers attach the file name with [`ExtractionError::with_file`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}: {kind}", .file.as_deref().unwrap_or("<input>"))]
pub struct ExtractionError {
    pub file: Option<String>,
    pub kind: ExtractionErrorKind,
}

impl ExtractionError {
    pub fn missing_section(section: impl Into<String>) -> Self {
        ExtractionErrorKind::MissingSection(section.into()).into()
    }

    pub fn cardinality(section: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        ExtractionErrorKind::Cardinality {
            section: section.into(),
            expected: expected.into(),
            actual,
        }
        .into()
    }

    pub fn field(field: impl Into<String>, kind: FieldKind, value: impl Into<String>) -> Self {
        ExtractionErrorKind::Coercion {
            field: field.into(),
            kind,
            value: value.into(),
        }
        .into()
    }

    pub fn color(field: impl Into<String>, value: impl Into<String>) -> Self {
        ExtractionErrorKind::MalformedColor {
            field: field.into(),
            value: value.into(),
        }
        .into()
    }

    pub fn ancestor(field: impl Into<String>, value: impl Into<String>) -> Self {
        ExtractionErrorKind::MalformedAncestor {
            field: field.into(),
            value: value.into(),
        }
        .into()
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// The offending field or section, when the error names one.
    pub fn field_name(&self) -> Option<&str> {
        match &self.kind {
            ExtractionErrorKind::MissingSection(section)
            | ExtractionErrorKind::Cardinality { section, .. } => Some(section),
            ExtractionErrorKind::Coercion { field, .. }
            | ExtractionErrorKind::MalformedColor { field, .. }
            | ExtractionErrorKind::MalformedAncestor { field, .. } => Some(field),
            ExtractionErrorKind::Identifier(_) => None,
        }
    }
}

impl From<ExtractionErrorKind> for ExtractionError {
    fn from(kind: ExtractionErrorKind) -> Self {
        Self { file: None, kind }
    }
}

impl From<FormatError> for ExtractionError {
    fn from(err: FormatError) -> Self {
        ExtractionErrorKind::Identifier(err).into()
    }
}
