//! Request envelope
//!
//! A request arrives as one JSON object:
//!
//! ```json
//! {"query": "SELECT * FROM db", "secrets_file": "secrets.yaml",
//!  "sources": [{"type": "postgres", "alias": "db", "secret": "pg", "table": "users"}],
//!  "options": {"max_rows": 100}}
//! ```
//!
//! Planning loads the secrets document, renders its registrations and binds
//! every source. Executing the query itself happens elsewhere; `options` are
//! carried through untouched for that step.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::binder::{bind_all, SourceRef};
use crate::error::{Result, WranglerError};
use crate::registry::{register_all, SecretRegistry};
use crate::secrets::{
    render_document, ConfigDocument, Disclosure, EnvLookup, ProcessEnv, SecretStatement,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets_file: Option<PathBuf>,

    #[serde(default)]
    pub sources: Vec<SourceRef>,

    #[serde(default)]
    pub options: Map<String, Value>,
}

impl Request {
    /// Parse and check a request envelope
    pub fn from_json(text: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(text).map_err(malformed_request)?;
        if request.query.trim().is_empty() {
            return Err(WranglerError::invalid_request("'query' must not be empty"));
        }
        Ok(request)
    }

    /// Plan against the process environment
    pub fn plan(&self) -> Result<Plan> {
        self.plan_with_env(&ProcessEnv)
    }

    /// Load the secrets document (if any) and bind every source
    pub fn plan_with_env(&self, env: &dyn EnvLookup) -> Result<Plan> {
        let document = match &self.secrets_file {
            Some(path) => ConfigDocument::load_with_env(path, env)?,
            None => {
                if let Some(source) = self.sources.iter().find(|s| s.secret.is_some()) {
                    return Err(WranglerError::invalid_request(format!(
                        "source '{}' references secret '{}' but no secrets_file was given",
                        source.alias,
                        source.secret.as_deref().unwrap_or_default()
                    )));
                }
                ConfigDocument::empty()
            }
        };

        let sources = bind_all(&self.sources, &document)?;
        Ok(Plan {
            query: self.query.clone(),
            document,
            sources,
            options: self.options.clone(),
        })
    }
}

fn malformed_request(err: serde_json::Error) -> WranglerError {
    WranglerError::invalid_request(format!("malformed request JSON: {err}"))
}

/// Everything needed to run a request, in execution order
#[derive(Debug, Clone)]
pub struct Plan {
    pub query: String,
    pub document: ConfigDocument,
    pub sources: Vec<SourceRef>,
    pub options: Map<String, Value>,
}

impl Plan {
    /// Registration statements in document order
    #[must_use]
    pub fn statements(&self, disclosure: Disclosure) -> Vec<SecretStatement> {
        render_document(&self.document, disclosure)
    }

    /// Register every secret with `registry`
    pub fn register(&self, registry: &mut dyn SecretRegistry) -> Result<usize> {
        register_all(registry, &self.document)
    }

    /// Display form with every credential masked
    #[must_use]
    pub fn report(&self) -> PlanReport {
        PlanReport {
            query: self.query.clone(),
            secrets: self.statements(Disclosure::Redact),
            sources: self.sources.iter().map(SourceRef::redacted).collect(),
            options: self.options.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub query: String,
    pub secrets: Vec<SecretStatement>,
    pub sources: Vec<SourceRef>,
    pub options: Map<String, Value>,
}
