//! Credential descriptors
//!
//! Parsing, validating and rendering the secrets document:
//! - `env`: `${NAME}` expansion against an injected environment
//! - `field` / `constraint`: declarative field sets and cross-field rules
//! - `variant`: one descriptor per external system, plus the tag registry
//! - `document`: the YAML document parser
//! - `statement`: `CREATE SECRET` rendering and escaping

pub mod constraint;
pub mod document;
pub mod env;
pub mod field;
pub mod sensitive;
pub mod statement;
pub mod variant;

pub use document::{ConfigDocument, DocumentOptions};
pub use env::{EnvLookup, MapEnv, ProcessEnv};
pub use sensitive::Sensitive;
pub use statement::{render, render_document, render_redacted, Disclosure, SecretStatement};
pub use variant::{lookup, Descriptor, Variant, VariantDef, VARIANTS};
