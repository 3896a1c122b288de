//! duckwrangler - Credential layer for an embedded analytical database
//!
//! duckwrangler turns a YAML secrets document into engine-native
//! `CREATE SECRET` statements and binds data-source references to them.
//!
//! # Core Principles
//! - All-or-nothing parsing (a document either validates completely or not at all)
//! - Every validation problem reported at once, in document order
//! - Deterministic rendering (identical inputs → identical statements)
//! - Credential values never appear in errors, logs or CLI output
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`output`] - JSON output envelope types
//! - [`secrets`] - Environment expansion, descriptors, document parser, statement rendering
//! - [`binder`] - Source reference binding
//! - [`registry`] - Registration against the engine
//! - [`request`] - Request envelope and planning

pub mod binder;
pub mod error;
pub mod output;
pub mod registry;
pub mod request;
pub mod secrets;

pub use binder::{bind, bind_all, SourceRef};
pub use error::{FieldError, FieldErrorKind, Result, WranglerError};
pub use output::{ErrorDetail, ErrorEnvelope, ErrorInfo, Metadata, SuccessEnvelope};
pub use registry::{register_all, SecretRegistry, StatementLog};
pub use request::{Plan, PlanReport, Request};
pub use secrets::{
    render, render_document, render_redacted, ConfigDocument, Descriptor, Disclosure,
    DocumentOptions, EnvLookup, MapEnv, ProcessEnv, SecretStatement, Sensitive,
};
