//! Validation error types for annotation models
//!
//! Error codes:
//! - LABELKIT_INVALID_FORMAT (field-level, raised while parsing a single field)
//! - LABELKIT_MISSING_IDENTITY (record-level, raised after all fields parsed)

use std::fmt;

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A field value does not match its required token shape
    InvalidFormat,
    /// Neither `name` nor `schema_id` was supplied
    MissingIdentity,
}

impl ValidationErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidFormat => "LABELKIT_INVALID_FORMAT",
            ValidationErrorKind::MissingIdentity => "LABELKIT_MISSING_IDENTITY",
        }
    }

    /// Returns whether the error was raised by field-level parsing
    pub fn is_field_level(&self) -> bool {
        matches!(self, ValidationErrorKind::InvalidFormat)
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation error with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    /// Field (or `$record` for cross-field checks) that failed
    field: String,
    message: String,
}

impl ValidationError {
    /// Create an invalid format error for a field
    pub fn invalid_format(
        field: impl Into<String>,
        expected: impl AsRef<str>,
        actual: impl AsRef<str>,
    ) -> Self {
        let field = field.into();
        Self {
            kind: ValidationErrorKind::InvalidFormat,
            message: format!(
                "field '{}': expected {}, got '{}'",
                field,
                expected.as_ref(),
                actual.as_ref()
            ),
            field,
        }
    }

    /// Create a missing identity error
    pub fn missing_identity() -> Self {
        Self {
            kind: ValidationErrorKind::MissingIdentity,
            field: "$record".into(),
            message: "Must set either schema_id or name for all feature schemas".into(),
        }
    }

    /// Returns the error kind
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the offending field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
