//! Source binding
//!
//! A data-source reference may name a secret from the document. Binding
//! resolves that name and folds the secret's connection fields into the
//! source's parameters: the secret supplies defaults and anything the source
//! sets itself wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, WranglerError};
use crate::secrets::statement::REDACTED;
use crate::secrets::variant::VARIANTS;
use crate::secrets::ConfigDocument;

/// Credential keys a source may carry inline instead of naming a secret
const INLINE_CREDENTIAL_KEYS: &[&str] = &["aws_access_key_id", "aws_secret_access_key"];

/// A data source as it appears in a request
///
/// Keys other than `type`, `alias` and `secret` are kept verbatim in
/// `params` (table names, file paths, reader options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub alias: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl SourceRef {
    #[must_use]
    pub fn new(kind: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            alias: alias.into(),
            secret: None,
            params: Map::new(),
        }
    }

    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Copy with every credential-bearing parameter masked
    ///
    /// A key is masked when any credential type marks a field of that name
    /// sensitive, or when it is an inline credential key. This holds whether
    /// or not the source names a secret.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for (key, value) in &mut copy.params {
            if is_sensitive_param(key) {
                *value = Value::from(REDACTED);
            }
        }
        copy
    }
}

fn is_sensitive_param(key: &str) -> bool {
    if INLINE_CREDENTIAL_KEYS.contains(&key) {
        return true;
    }
    VARIANTS
        .iter()
        .flat_map(|def| def.fields)
        .any(|spec| spec.sensitive && spec.name == key)
}

/// Resolve `source.secret` against `document`
///
/// A source without a `secret` comes back unchanged.
pub fn bind(source: &SourceRef, document: &ConfigDocument) -> Result<SourceRef> {
    if source.alias.trim().is_empty() {
        let message = format!("source of type '{}' has no alias", source.kind);
        return Err(WranglerError::invalid_request(message));
    }

    let Some(name) = source.secret.as_deref() else {
        return Ok(source.clone());
    };
    let descriptor = document
        .get(name)
        .ok_or_else(|| WranglerError::secret_not_found(name, &source.alias))?;

    let mut params = descriptor.connection_fields();
    for (key, value) in &source.params {
        params.insert(key.clone(), value.clone());
    }

    debug!(
        alias = %source.alias,
        secret = %name,
        kind = descriptor.kind(),
        "bound source to secret"
    );
    Ok(SourceRef {
        kind: source.kind.clone(),
        alias: source.alias.clone(),
        secret: Some(name.to_string()),
        params,
    })
}

/// Bind every source, stopping at the first failure
pub fn bind_all(sources: &[SourceRef], document: &ConfigDocument) -> Result<Vec<SourceRef>> {
    sources.iter().map(|source| bind(source, document)).collect()
}
