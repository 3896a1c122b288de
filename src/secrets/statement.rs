//! `CREATE SECRET` statement generation
//!
//! Rendering is pure and deterministic: the same descriptor and options
//! always give byte-identical SQL. Every user-supplied value goes through
//! [`escape_string`] or [`escape_identifier`]; the only bare values are the
//! `TYPE` tag and keyword fields, both drawn from closed sets.
//!
//! Statement shape:
//!
//! ```text
//! CREATE OR REPLACE [PERSISTENT] SECRET "<name>" (TYPE <tag>, KEY 'value', ...)
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::document::{ConfigDocument, DocumentOptions};
use super::variant::Descriptor;

/// Placeholder written in place of a credential value
pub const REDACTED: &str = "***";

/// Whether credential values are written out or masked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    /// Real values, for the engine
    Reveal,
    /// `***` in place of every sensitive value, for logs and display
    Redact,
}

/// Quote `value` as a SQL string literal, doubling embedded `'`
#[must_use]
pub fn escape_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote `value` as a SQL identifier, doubling embedded `"`
#[must_use]
pub fn escape_identifier(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quote a value inside a libpq-style `key=value` connection string
///
/// Plain tokens are written as-is; anything empty or containing whitespace,
/// `'` or `\` is single-quoted with `\` and `'` backslash-escaped.
#[must_use]
pub fn conn_value(value: &str) -> String {
    let special = |c: char| c.is_whitespace() || c == '\'' || c == '\\';
    if !value.is_empty() && !value.chars().any(special) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// One component of a connection string
#[derive(Debug, Clone, Copy)]
pub enum ConnPart<'a> {
    Plain(&'a str),
    Secret(&'a str),
}

/// Accumulates the `, KEY value` parameter list of one statement
#[derive(Debug)]
pub struct ParamWriter {
    out: String,
    disclosure: Disclosure,
}

impl ParamWriter {
    fn new(disclosure: Disclosure) -> Self {
        Self {
            out: String::new(),
            disclosure,
        }
    }

    fn push(&mut self, key: &str, rendered: &str) {
        self.out.push_str(", ");
        self.out.push_str(key);
        self.out.push(' ');
        self.out.push_str(rendered);
    }

    fn mask<'a>(&self, value: &'a str) -> &'a str {
        match self.disclosure {
            Disclosure::Reveal => value,
            Disclosure::Redact => REDACTED,
        }
    }

    /// Bare keyword; callers only pass values validated against a closed set
    pub fn keyword(&mut self, key: &str, value: &str) {
        self.push(key, value);
    }

    pub fn string(&mut self, key: &str, value: &str) {
        self.push(key, &escape_string(value));
    }

    pub fn opt_string(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.string(key, value);
        }
    }

    pub fn secret(&mut self, key: &str, value: &str) {
        let value = self.mask(value);
        self.push(key, &escape_string(value));
    }

    pub fn opt_secret(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.secret(key, value);
        }
    }

    pub fn boolean(&mut self, key: &str, value: bool) {
        self.push(key, if value { "true" } else { "false" });
    }

    /// `MAP {'k': 'v', ...}` with keys shown and values masked when redacting
    pub fn secret_map(&mut self, key: &str, entries: &IndexMap<String, String>) {
        let pairs: Vec<String> = entries
            .iter()
            .map(|(k, v)| format!("{}: {}", escape_string(k), escape_string(self.mask(v))))
            .collect();
        self.push(key, &format!("MAP {{{}}}", pairs.join(", ")));
    }

    /// libpq-style `key=value` list written as one string literal
    pub fn connection_string(&mut self, key: &str, parts: &[(&str, ConnPart<'_>)]) {
        let joined = parts
            .iter()
            .map(|(name, part)| {
                let value = match part {
                    ConnPart::Plain(v) => conn_value(v),
                    ConnPart::Secret(v) => conn_value(self.mask(v)),
                };
                format!("{name}={value}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.push(key, &escape_string(&joined));
    }
}

fn render_with(
    name: &str,
    descriptor: &Descriptor,
    options: &DocumentOptions,
    disclosure: Disclosure,
) -> String {
    let mut writer = ParamWriter::new(disclosure);
    descriptor.write_params(&mut writer);

    let persistence = if options.persistent {
        "PERSISTENT "
    } else {
        ""
    };
    format!(
        "CREATE OR REPLACE {persistence}SECRET {} (TYPE {}{})",
        escape_identifier(name),
        descriptor.kind(),
        writer.out
    )
}

/// Registration statement with real credential values
#[must_use]
pub fn render(name: &str, descriptor: &Descriptor, options: &DocumentOptions) -> String {
    render_with(name, descriptor, options, Disclosure::Reveal)
}

/// Registration statement with every sensitive value replaced by `***`
#[must_use]
pub fn render_redacted(name: &str, descriptor: &Descriptor, options: &DocumentOptions) -> String {
    render_with(name, descriptor, options, Disclosure::Redact)
}

/// A rendered statement together with the entry it registers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretStatement {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub statement: String,
}

/// Render every entry of `document`, in document order
#[must_use]
pub fn render_document(document: &ConfigDocument, disclosure: Disclosure) -> Vec<SecretStatement> {
    document
        .iter()
        .map(|(name, descriptor)| {
            debug!(secret = %name, kind = descriptor.kind(), "rendering secret statement");
            SecretStatement {
                name: name.to_string(),
                kind: descriptor.kind().to_string(),
                statement: render_with(name, descriptor, document.options(), disclosure),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::sensitive::Sensitive;
    use crate::secrets::variant::{
        AzureProvider, AzureSecret, DuckLakeSecret, HttpSecret, MySqlSecret, PostgresSecret,
        S3Secret,
    };
    use pretty_assertions::assert_eq;

    /// Inverse of `escape_string`; `None` when the text is not a well-formed literal
    fn unescape_string(literal: &str) -> Option<String> {
        let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\'' {
                // A lone quote inside the literal would end it early.
                if chars.next()? != '\'' {
                    return None;
                }
            }
            out.push(c);
        }
        Some(out)
    }

    fn postgres() -> Descriptor {
        PostgresSecret {
            host: "db.x".into(),
            port: 5432,
            user: "app".into(),
            password: Sensitive::new("p1".into()),
            database: "main".into(),
            schema: "public".into(),
        }
        .into()
    }

    #[test]
    fn test_escape_string_round_trip() {
        let inputs = [
            "",
            "plain",
            "it's",
            "''",
            "a'b'c",
            "x'); DROP TABLE t; --",
            "\\'",
            "ünï'cødé",
        ];
        for input in inputs {
            let escaped = escape_string(input);
            assert_eq!(
                unescape_string(&escaped).as_deref(),
                Some(input),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("pg"), "\"pg\"");
        assert_eq!(escape_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_conn_value_quoting() {
        assert_eq!(conn_value("db.x"), "db.x");
        assert_eq!(conn_value(""), "''");
        assert_eq!(conn_value("p w"), "'p w'");
        assert_eq!(conn_value("it's"), "'it\\'s'");
        assert_eq!(conn_value("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_render_postgres() {
        let sql = render("warehouse", &postgres(), &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "warehouse" (TYPE postgres, CONNECTION_STRING 'host=db.x port=5432 user=app password=p1 dbname=main')"#);
    }

    #[test]
    fn test_render_postgres_redacted() {
        let sql = render_redacted("warehouse", &postgres(), &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "warehouse" (TYPE postgres, CONNECTION_STRING 'host=db.x port=5432 user=app password=*** dbname=main')"#);
    }

    #[test]
    fn test_render_persistent() {
        let options = DocumentOptions { persistent: true };
        let sql = render("warehouse", &postgres(), &options);
        assert!(sql.starts_with("CREATE OR REPLACE PERSISTENT SECRET \"warehouse\""));
    }

    #[test]
    fn test_render_mysql_password_with_quote() {
        let d: Descriptor = MySqlSecret {
            host: "h".into(),
            port: 3306,
            user: "u".into(),
            password: Sensitive::new("it's a pw".into()),
            database: "d".into(),
        }
        .into();
        let sql = render("my", &d, &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "my" (TYPE mysql, CONNECTION_STRING 'host=h port=3306 user=u password=''it\''s a pw'' database=d')"#);
    }

    #[test]
    fn test_render_s3_optional_params() {
        let mut s3 = S3Secret {
            key_id: "AKIA".into(),
            secret: Sensitive::new("sk".into()),
            region: "us-east-1".into(),
            scope: None,
            endpoint: None,
            use_ssl: true,
        };
        let sql = render("lake", &s3.clone().into(), &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "lake" (TYPE s3, KEY_ID 'AKIA', SECRET 'sk', REGION 'us-east-1')"#);

        s3.endpoint = Some("minio:9000".into());
        s3.use_ssl = false;
        s3.scope = Some("s3://bucket".into());
        let sql = render("lake", &s3.into(), &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "lake" (TYPE s3, KEY_ID 'AKIA', SECRET 'sk', REGION 'us-east-1', ENDPOINT 'minio:9000', USE_SSL false, SCOPE 's3://bucket')"#);
    }

    #[test]
    fn test_render_azure_keyword_provider() {
        let d: Descriptor = AzureSecret {
            provider: Some(AzureProvider::CredentialChain),
            account_name: Some("acct".into()),
            account_key: None,
            connection_string: None,
            tenant_id: None,
            client_id: None,
            client_secret: None,
            client_certificate_path: None,
            chain: Some("cli;env".into()),
        }
        .into();
        let sql = render("az", &d, &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "az" (TYPE azure, PROVIDER credential_chain, ACCOUNT_NAME 'acct', CHAIN 'cli;env')"#);
    }

    #[test]
    fn test_render_http_map_and_redaction() {
        let mut headers = IndexMap::new();
        headers.insert("X-Api-Key".to_string(), "k'1".to_string());
        headers.insert("Accept".to_string(), "json".to_string());
        let d: Descriptor = HttpSecret {
            bearer_token: Some(Sensitive::new("tok".into())),
            extra_http_headers: Some(Sensitive::new(headers)),
            http_proxy: None,
            http_proxy_username: None,
            http_proxy_password: None,
        }
        .into();

        let sql = render("api", &d, &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "api" (TYPE http, BEARER_TOKEN 'tok', EXTRA_HTTP_HEADERS MAP {'X-Api-Key': 'k''1', 'Accept': 'json'})"#);

        let redacted = render_redacted("api", &d, &DocumentOptions::default());
        insta::assert_snapshot!(redacted, @r#"CREATE OR REPLACE SECRET "api" (TYPE http, BEARER_TOKEN '***', EXTRA_HTTP_HEADERS MAP {'X-Api-Key': '***', 'Accept': '***'})"#);
    }

    #[test]
    fn test_render_ducklake() {
        let d: Descriptor = DuckLakeSecret {
            metadata_path: "postgres:dbname=meta".into(),
            data_path: "s3://lake/".into(),
            metadata_parameters: None,
        }
        .into();
        let sql = render("lake", &d, &DocumentOptions::default());
        insta::assert_snapshot!(sql, @r#"CREATE OR REPLACE SECRET "lake" (TYPE ducklake, METADATA_PATH 'postgres:dbname=meta', DATA_PATH 's3://lake/')"#);
    }

    #[test]
    fn test_injection_attempt_stays_inside_literal() {
        let d: Descriptor = S3Secret {
            key_id: "k', SECRET 'x".into(),
            secret: Sensitive::new("s".into()),
            region: "r".into(),
            scope: None,
            endpoint: None,
            use_ssl: true,
        }
        .into();
        let sql = render("evil\" (TYPE x", &d, &DocumentOptions::default());
        assert!(sql.starts_with("CREATE OR REPLACE SECRET \"evil\"\" (TYPE x\" (TYPE s3"));
        assert!(sql.contains("KEY_ID 'k'', SECRET ''x'"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let options = DocumentOptions::default();
        let first = render("a", &postgres(), &options);
        assert_eq!(first, render("a", &postgres(), &options));
    }
}
