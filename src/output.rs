//! JSON Output Envelope Types
//!
//! Every CLI command prints exactly one envelope to stdout.
//!
//! # Output Contract
//! - Success: `{"ok": true, "command": "...", "data": {...}, "meta": {...}}`
//! - Error: `{"ok": false, "command": "...", "error": {"code": "...", "message": "...", "details": [...]}}`
//!
//! Envelopes never carry credential values: statements are rendered redacted
//! and errors are built from `WranglerError`, which holds none.

use serde::{Deserialize, Serialize};

use crate::error::WranglerError;

/// Success envelope for command results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always true for success envelopes
    pub ok: bool,

    /// Command that was executed (check, render, plan)
    pub command: String,

    /// Command-specific data
    pub data: T,

    pub meta: Metadata,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(command: impl Into<String>, data: T, meta: Metadata) -> Self {
        Self {
            ok: true,
            command: command.into(),
            data,
            meta,
        }
    }
}

/// Error envelope for command failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always false for error envelopes
    pub ok: bool,

    pub command: String,

    pub error: ErrorInfo,
}

impl ErrorEnvelope {
    pub fn new(command: impl Into<String>, error: ErrorInfo) -> Self {
        Self {
            ok: false,
            command: command.into(),
            error,
        }
    }

    /// Create error envelope from `WranglerError`
    pub fn from_error(command: impl Into<String>, err: &WranglerError) -> Self {
        let details = err
            .field_errors()
            .iter()
            .map(|e| ErrorDetail {
                path: e.path.clone(),
                message: e.kind.to_string(),
            })
            .collect();
        Self::new(
            command,
            ErrorInfo {
                code: err.error_code().to_string(),
                message: err.message(),
                details,
            },
        )
    }
}

/// Error information structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code (e.g., "VALIDATION_FAILED", "SECRET_NOT_FOUND")
    pub code: String,

    /// Human-readable error message (no credential values)
    pub message: String,

    /// One entry per field-level problem, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub path: String,
    pub message: String,
}

/// Execution metadata included in all success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Execution time in milliseconds
    pub execution_ms: u64,

    /// Number of registration statements involved (None when not applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<usize>,
}

impl Metadata {
    pub fn new(execution_ms: u64) -> Self {
        Self {
            execution_ms,
            statements: None,
        }
    }

    pub fn with_statements(execution_ms: u64, statements: usize) -> Self {
        Self {
            execution_ms,
            statements: Some(statements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FieldError, FieldErrorKind};

    #[test]
    fn test_success_envelope_serialization() {
        let envelope = SuccessEnvelope::new(
            "render",
            serde_json::json!({"result": "test"}),
            Metadata::with_statements(42, 3),
        );

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""ok":true"#));
        assert!(json.contains(r#""command":"render"#));
        assert!(json.contains(r#""execution_ms":42"#));
        assert!(json.contains(r#""statements":3"#));
    }

    #[test]
    fn test_error_envelope_serialization() {
        let envelope = ErrorEnvelope::new(
            "check",
            ErrorInfo::new("DOCUMENT_NOT_FOUND", "Secrets document not found"),
        );

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""ok":false"#));
        assert!(json.contains(r#""command":"check"#));
        assert!(json.contains(r#""code":"DOCUMENT_NOT_FOUND"#));
        // details omitted when empty
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_error_envelope_from_validation_error() {
        let err = WranglerError::ValidationFailed {
            errors: vec![FieldError::new(
                "secrets.pg.database",
                FieldErrorKind::MissingRequired {
                    field: "database".into(),
                    variant: "postgres".into(),
                },
            )],
        };
        let envelope = ErrorEnvelope::from_error("check", &err);

        assert!(!envelope.ok);
        assert_eq!(envelope.command, "check");
        assert_eq!(envelope.error.code, "VALIDATION_FAILED");
        assert_eq!(
            envelope.error.details,
            vec![ErrorDetail {
                path: "secrets.pg.database".into(),
                message: "missing required field 'database' for postgres".into(),
            }]
        );
    }

    #[test]
    fn test_metadata_without_statements() {
        let json = serde_json::to_string(&Metadata::new(100)).unwrap();
        assert!(json.contains(r#""execution_ms":100"#));
        assert!(!json.contains("statements"));
    }
}
