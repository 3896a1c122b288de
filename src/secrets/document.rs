//! Secrets document parsing
//!
//! A secrets document is a YAML file of the form
//!
//! ```yaml
//! secrets:
//!   warehouse:
//!     type: postgres
//!     host: db.internal
//!     password: ${PG_PASSWORD}
//! options:
//!   persistent: false
//! ```
//!
//! Parsing is all-or-nothing: a [`ConfigDocument`] exists only when every
//! entry validated. Field-level problems across all entries are collected
//! into one [`WranglerError::ValidationFailed`], in document order. An unknown
//! `type` tag or an unset environment variable stops parsing immediately.

use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use super::env::{expand_value, EnvLookup, ProcessEnv};
use super::field::{check_fields, key_name, DefaultValue, FieldSpec, FieldType};
use super::variant::{lookup, Descriptor};
use crate::error::{FieldError, FieldErrorKind, Result, WranglerError};

const SECRETS_KEY: &str = "secrets";
const OPTIONS_KEY: &str = "options";
const TYPE_KEY: &str = "type";

const OPTION_FIELDS: &[FieldSpec] = &[FieldSpec::defaulted(
    "persistent",
    FieldType::Boolean,
    DefaultValue::Boolean(false),
)];

/// Document-level settings applied to every rendered statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// Register with `CREATE PERSISTENT SECRET` instead of in-memory secrets
    pub persistent: bool,
}

/// Validated, ordered set of named credential descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    secrets: IndexMap<String, Descriptor>,
    options: DocumentOptions,
}

impl ConfigDocument {
    /// A document with no secrets, used when a request names no secrets file
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from `path`, resolving `${NAME}` against the process environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_env(path, &ProcessEnv)
    }

    /// Load from `path`, resolving `${NAME}` against `env`
    pub fn load_with_env(path: impl AsRef<Path>, env: &dyn EnvLookup) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => WranglerError::document_not_found(path),
            _ => WranglerError::DocumentUnreadable {
                path: path.to_path_buf(),
                detail: err.to_string(),
            },
        })?;

        let document = Self::from_str_with_env(&text, env)?;
        info!(path = %path.display(), secrets = document.len(), "loaded secrets document");
        Ok(document)
    }

    /// Parse document text, resolving `${NAME}` against `env`
    pub fn from_str_with_env(text: &str, env: &dyn EnvLookup) -> Result<Self> {
        let mut root: Value = serde_yaml::from_str(text)?;
        root.apply_merge()?;
        let root = match root {
            Value::Mapping(map) => map,
            Value::Null => return Err(WranglerError::malformed("document is empty")),
            _ => return Err(WranglerError::malformed("document root must be a mapping")),
        };

        let mut errors = Vec::new();
        let mut secrets = IndexMap::new();
        let mut options = DocumentOptions::default();
        let mut saw_secrets = false;

        for (key, value) in &root {
            match key.as_str() {
                Some(SECRETS_KEY) => {
                    saw_secrets = true;
                    parse_secrets(value, env, &mut secrets, &mut errors)?;
                }
                Some(OPTIONS_KEY) => {
                    if let Some(parsed) = parse_options(value, env, &mut errors)? {
                        options = parsed;
                    }
                }
                _ => {
                    let field = key_name(key);
                    errors.push(FieldError::new(
                        field.clone(),
                        FieldErrorKind::UnexpectedField {
                            field,
                            variant: "document".to_string(),
                        },
                    ));
                }
            }
        }

        if !saw_secrets {
            errors.push(FieldError::new(
                SECRETS_KEY,
                FieldErrorKind::MissingRequired {
                    field: SECRETS_KEY.to_string(),
                    variant: "document".to_string(),
                },
            ));
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "secrets document failed validation");
            return Err(WranglerError::ValidationFailed { errors });
        }

        Ok(Self { secrets, options })
    }

    /// Descriptor registered under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.secrets.get(name)
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.secrets
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    #[must_use]
    pub const fn options(&self) -> &DocumentOptions {
        &self.options
    }
}

fn parse_secrets(
    value: &Value,
    env: &dyn EnvLookup,
    secrets: &mut IndexMap<String, Descriptor>,
    errors: &mut Vec<FieldError>,
) -> Result<()> {
    let entries = match value {
        Value::Mapping(map) => map,
        Value::Null => return Ok(()),
        _ => {
            errors.push(FieldError::new(
                SECRETS_KEY,
                FieldErrorKind::TypeMismatch {
                    field: SECRETS_KEY.to_string(),
                    expected: "a mapping of named secrets".to_string(),
                    variant: "document".to_string(),
                },
            ));
            return Ok(());
        }
    };

    for (key, entry) in entries {
        let Value::String(name) = key else {
            let field = key_name(key);
            errors.push(FieldError::new(
                format!("{SECRETS_KEY}.{field}"),
                FieldErrorKind::TypeMismatch {
                    field,
                    expected: "a string name".to_string(),
                    variant: "secrets".to_string(),
                },
            ));
            continue;
        };
        let path = format!("{SECRETS_KEY}.{name}");
        if let Some(descriptor) = parse_entry(name, &path, entry, env, errors)? {
            debug!(secret = %name, kind = descriptor.kind(), "validated secret entry");
            secrets.insert(name.clone(), descriptor);
        }
    }
    Ok(())
}

/// Validate one entry; `Ok(None)` means its problems were appended to `errors`
fn parse_entry(
    name: &str,
    path: &str,
    entry: &Value,
    env: &dyn EnvLookup,
    errors: &mut Vec<FieldError>,
) -> Result<Option<Descriptor>> {
    let Value::Mapping(raw) = entry else {
        errors.push(FieldError::new(
            path,
            FieldErrorKind::TypeMismatch {
                field: name.to_string(),
                expected: "a mapping".to_string(),
                variant: "secret entry".to_string(),
            },
        ));
        return Ok(None);
    };

    let tag = match raw.get(TYPE_KEY) {
        Some(Value::String(tag)) => tag.as_str(),
        Some(_) => {
            errors.push(FieldError::new(
                format!("{path}.{TYPE_KEY}"),
                FieldErrorKind::TypeMismatch {
                    field: TYPE_KEY.to_string(),
                    expected: "a string".to_string(),
                    variant: "secret entry".to_string(),
                },
            ));
            return Ok(None);
        }
        None => {
            errors.push(FieldError::new(
                format!("{path}.{TYPE_KEY}"),
                FieldErrorKind::MissingRequired {
                    field: TYPE_KEY.to_string(),
                    variant: "secret entry".to_string(),
                },
            ));
            return Ok(None);
        }
    };

    let def = lookup(tag).ok_or_else(|| WranglerError::unknown_type(name, tag))?;

    let fields: Mapping = raw
        .iter()
        .filter(|(key, _)| key.as_str() != Some(TYPE_KEY))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let expanded = match expand_value(&Value::Mapping(fields), path, env)? {
        Value::Mapping(map) => map,
        _ => Mapping::new(),
    };

    match def.validate(&expanded, path) {
        Ok(descriptor) => Ok(Some(descriptor)),
        Err(entry_errors) => {
            errors.extend(entry_errors);
            Ok(None)
        }
    }
}

fn parse_options(
    value: &Value,
    env: &dyn EnvLookup,
    errors: &mut Vec<FieldError>,
) -> Result<Option<DocumentOptions>> {
    let raw = match expand_value(value, OPTIONS_KEY, env)? {
        Value::Mapping(map) => map,
        Value::Null => return Ok(None),
        _ => {
            errors.push(FieldError::new(
                OPTIONS_KEY,
                FieldErrorKind::TypeMismatch {
                    field: OPTIONS_KEY.to_string(),
                    expected: "a mapping".to_string(),
                    variant: "document".to_string(),
                },
            ));
            return Ok(None);
        }
    };

    let Some(fields) = check_fields(OPTIONS_KEY, OPTION_FIELDS, &raw, OPTIONS_KEY, errors) else {
        return Ok(None);
    };
    let persistent = fields
        .get("persistent")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Ok(Some(DocumentOptions { persistent }))
}
