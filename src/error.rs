//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout duckwrangler.
//! All errors are structured and map to specific error codes for JSON output.
//!
//! # Error Categories
//! - `DocumentNotFound` / `DocumentUnreadable`: the secrets document could not be read
//! - `MalformedDocument`: YAML syntax errors or a document with the wrong shape
//! - `UnknownCredentialType`: an entry's `type` tag names no known variant
//! - `ValidationFailed`: every field-level problem found in one document
//! - `MissingEnvironmentVariable`: a `${NAME}` reference with no value
//! - `SecretNotFound`: a source references an undefined secret
//! - `StatementRegistrationFailed`: the engine rejected a registration statement
//! - `InvalidRequest`: malformed request envelope
//!
//! No variant ever carries a credential value. Field errors name the field,
//! the variant and the expected type only.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for duckwrangler operations
#[derive(Error, Debug)]
pub enum WranglerError {
    /// Secrets document does not exist
    #[error("Secrets document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    /// Secrets document exists but could not be read
    #[error("Could not read secrets document {}: {detail}", path.display())]
    DocumentUnreadable { path: PathBuf, detail: String },

    /// YAML syntax error or a document that is not a mapping
    #[error("Malformed secrets document{}: {detail}", format_location(*line, *column))]
    MalformedDocument {
        line: Option<usize>,
        column: Option<usize>,
        detail: String,
    },

    /// Entry `type` tag names no known variant
    #[error("Unknown credential type '{tag}' for secret '{entry}'")]
    UnknownCredentialType { entry: String, tag: String },

    /// One or more entries failed validation
    #[error("Secret validation failed: {}", FieldErrors(errors))]
    ValidationFailed { errors: Vec<FieldError> },

    /// Referenced environment variable is not set
    #[error("Environment variable not set: {variable} (referenced by {path})")]
    MissingEnvironmentVariable { variable: String, path: String },

    /// Source references a secret that the document does not define
    #[error("Secret '{name}' referenced by source '{alias}' not found in secrets document")]
    SecretNotFound { name: String, alias: String },

    /// Engine rejected a registration statement (message already redacted)
    #[error("Registering secret '{name}' failed: {detail}")]
    StatementRegistrationFailed { name: String, detail: String },

    /// Malformed request envelope or source reference
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl WranglerError {
    /// Convert error to error code string for JSON output
    ///
    /// Error codes are stable and suitable for programmatic handling by agents.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::DocumentUnreadable { .. } => "DOCUMENT_UNREADABLE",
            Self::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
            Self::UnknownCredentialType { .. } => "UNKNOWN_CREDENTIAL_TYPE",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::MissingEnvironmentVariable { .. } => "MISSING_ENVIRONMENT_VARIABLE",
            Self::SecretNotFound { .. } => "SECRET_NOT_FOUND",
            Self::StatementRegistrationFailed { .. } => "STATEMENT_REGISTRATION_FAILED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    /// Get human-readable error message (agent-appropriate, no credential values)
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Field-level errors, empty for every category except `ValidationFailed`
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationFailed { errors } => errors,
            _ => &[],
        }
    }

    pub fn document_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DocumentNotFound { path: path.into() }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedDocument {
            line: None,
            column: None,
            detail: detail.into(),
        }
    }

    pub fn unknown_type(entry: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnknownCredentialType {
            entry: entry.into(),
            tag: tag.into(),
        }
    }

    pub fn missing_env(variable: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingEnvironmentVariable {
            variable: variable.into(),
            path: path.into(),
        }
    }

    pub fn secret_not_found(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::SecretNotFound {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<serde_yaml::Error> for WranglerError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        Self::MalformedDocument {
            line: location.as_ref().map(serde_yaml::Location::line),
            column: location.as_ref().map(serde_yaml::Location::column),
            detail: err.to_string(),
        }
    }
}

fn format_location(line: Option<usize>, column: Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line} column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

/// A single entry-level validation problem
///
/// `path` is dotted from the document root, e.g. `secrets.warehouse.port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// What went wrong with a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    MissingRequired { field: String, variant: String },
    UnexpectedField { field: String, variant: String },
    TypeMismatch {
        field: String,
        expected: String,
        variant: String,
    },
    ConstraintViolation { variant: String, constraint: String },
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { field, variant } => {
                write!(f, "missing required field '{field}' for {variant}")
            }
            Self::UnexpectedField { field, variant } => {
                write!(f, "unexpected field '{field}' for {variant}")
            }
            Self::TypeMismatch {
                field,
                expected,
                variant,
            } => {
                write!(f, "field '{field}' for {variant} must be {expected}")
            }
            Self::ConstraintViolation {
                variant,
                constraint,
            } => {
                write!(f, "{variant} constraint violated: {constraint}")
            }
        }
    }
}

struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// Result type alias for duckwrangler operations
pub type Result<T> = std::result::Result<T, WranglerError>;
