//! Secret registration against the engine
//!
//! The engine is reached only through [`SecretRegistry`], which executes one
//! statement at a time. Registration stops at the first rejected statement;
//! the engine's message is scrubbed of every credential value the statement
//! carried before it is surfaced.

use tracing::{debug, info, warn};

use crate::error::{Result, WranglerError};
use crate::secrets::statement::{conn_value, escape_string, render, REDACTED};
use crate::secrets::ConfigDocument;

/// Something that can execute registration statements
pub trait SecretRegistry {
    /// Execute one statement; `Err` carries the engine's message
    fn execute(&mut self, sql: &str) -> std::result::Result<(), String>;
}

/// In-memory registry that records every statement it is given
#[derive(Debug, Default, Clone)]
pub struct StatementLog {
    statements: Vec<String>,
}

impl StatementLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

impl SecretRegistry for StatementLog {
    fn execute(&mut self, sql: &str) -> std::result::Result<(), String> {
        self.statements.push(sql.to_string());
        Ok(())
    }
}

/// Register every secret of `document`, in document order
///
/// Returns the number of statements executed.
pub fn register_all(
    registry: &mut dyn SecretRegistry,
    document: &ConfigDocument,
) -> Result<usize> {
    for (name, descriptor) in document.iter() {
        let sql = render(name, descriptor, document.options());
        if let Err(detail) = registry.execute(&sql) {
            warn!(secret = %name, kind = descriptor.kind(), "engine rejected secret registration");
            return Err(WranglerError::StatementRegistrationFailed {
                name: name.to_string(),
                detail: redact(&detail, &descriptor.sensitive_values()),
            });
        }
        debug!(secret = %name, kind = descriptor.kind(), "registered secret");
    }

    info!(secrets = document.len(), "registered all secrets");
    Ok(document.len())
}

/// Replace every occurrence of each secret, raw or in its quoted forms, with `***`
#[must_use]
pub fn redact(message: &str, secrets: &[String]) -> String {
    let mut forms: Vec<String> = secrets
        .iter()
        .filter(|s| !s.is_empty())
        .flat_map(|s| {
            let literal = escape_string(s);
            let inner = literal[1..literal.len() - 1].to_string();
            let conn = conn_value(s);
            let conn_in_literal = conn.replace('\'', "''");
            [s.clone(), inner, conn, conn_in_literal]
        })
        .collect();
    // Longest first, so a quoted form is not left half-masked by its raw form.
    forms.sort_by_key(|f| std::cmp::Reverse(f.len()));
    forms.dedup();

    let mut redacted = message.to_string();
    for form in &forms {
        redacted = redacted.replace(form.as_str(), REDACTED);
    }
    redacted
}
