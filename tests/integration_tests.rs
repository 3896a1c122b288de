//! End-to-End Integration Tests
//!
//! Exercises the full path a request takes: secrets document on disk →
//! environment expansion → validation → rendering → registration → source
//! binding. It validates:
//! - Document files are loaded and every entry is validated
//! - Environment references resolve through the injected lookup
//! - Validation problems are collected across entries, in document order
//! - Registration runs in document order and nothing is registered on failure
//! - Sources are bound against the parsed document
//!
//! The process environment is never touched; every test injects a `MapEnv`.

use std::io::Write;

use duckwrangler::{
    bind, register_all, render, ConfigDocument, Descriptor, FieldErrorKind, MapEnv, Request,
    SourceRef, StatementLog, WranglerError,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Test Helpers
// ============================================================================

fn write_document(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create temp file");
    file.write_all(yaml.as_bytes()).expect("write document");
    file
}

const POSTGRES_DOC: &str = "\
secrets:
  warehouse:
    type: postgres
    host: db.x
    user: analyst
    password: ${PW}
    database: sales
";

// ============================================================================
// Document Loading Scenarios
// ============================================================================

#[test]
fn test_postgres_with_env_password() {
    let file = write_document(POSTGRES_DOC);
    let env = MapEnv::new().with("PW", "p1");
    let doc = ConfigDocument::load_with_env(file.path(), &env).expect("valid document");

    let Some(Descriptor::Postgres(pg)) = doc.get("warehouse") else {
        panic!("expected a postgres descriptor");
    };
    assert_eq!(pg.port, 5432);
    assert_eq!(pg.schema, "public");

    let sql = render("warehouse", doc.get("warehouse").unwrap(), doc.options());
    assert!(sql.contains("host=db.x"));
    assert!(sql.contains("p1"));
}

#[test]
fn test_unset_env_var_produces_no_document() {
    let file = write_document(POSTGRES_DOC);
    let err = ConfigDocument::load_with_env(file.path(), &MapEnv::new()).unwrap_err();

    match err {
        WranglerError::MissingEnvironmentVariable { variable, path } => {
            assert_eq!(variable, "PW");
            assert_eq!(path, "secrets.warehouse.password");
        }
        other => panic!("expected MissingEnvironmentVariable, got {other:?}"),
    }
}

#[test]
fn test_missing_env_reported_before_field_errors() {
    // The entry also lacks `database`; the unset variable wins.
    let yaml = concat!(
        "secrets:\n  pg:\n    type: postgres\n",
        "    host: h\n    user: u\n    password: ${PW}\n",
    );
    let err = ConfigDocument::from_str_with_env(yaml, &MapEnv::new()).unwrap_err();
    assert_eq!(err.error_code(), "MISSING_ENVIRONMENT_VARIABLE");
}

#[test]
fn test_two_bad_entries_collected_in_document_order() {
    let yaml = "\
secrets:
  first:
    type: mysql
    host: h
    user: u
    password: p
  fine:
    type: gcs
    key_id: k
    secret: s
  second:
    type: s3
    key_id: k
    secret: s
    region: r
    colour: blue
";
    let file = write_document(yaml);
    let err = ConfigDocument::load_with_env(file.path(), &MapEnv::new()).unwrap_err();

    let errors = err.field_errors();
    let missing = FieldErrorKind::MissingRequired {
        field: "database".into(),
        variant: "mysql".into(),
    };
    let unexpected = FieldErrorKind::UnexpectedField {
        field: "colour".into(),
        variant: "s3".into(),
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].path, "secrets.first.database");
    assert_eq!(errors[0].kind, missing);
    assert_eq!(errors[1].path, "secrets.second.colour");
    assert_eq!(errors[1].kind, unexpected);
}

#[test]
fn test_azure_key_and_connection_string_rejected() {
    let yaml = concat!(
        "secrets:\n  blob:\n    type: azure\n    account_name: acct\n",
        "    account_key: k\n    connection_string: c\n",
    );
    let file = write_document(yaml);
    let err = ConfigDocument::load_with_env(file.path(), &MapEnv::new()).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    let kind = &err.field_errors()[0].kind;
    assert!(matches!(kind, FieldErrorKind::ConstraintViolation { .. }));
}

#[test]
fn test_missing_document_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    match ConfigDocument::load_with_env(&path, &MapEnv::new()).unwrap_err() {
        WranglerError::DocumentNotFound { path: reported } => assert_eq!(reported, path),
        other => panic!("expected DocumentNotFound, got {other:?}"),
    }
}

#[test]
fn test_directory_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigDocument::load_with_env(dir.path(), &MapEnv::new()).unwrap_err();
    assert_eq!(err.error_code(), "DOCUMENT_UNREADABLE");
}

#[test]
fn test_syntax_error_has_location() {
    let file = write_document("secrets:\n  pg:\n    type: postgres\n   host: [unclosed\n");
    match ConfigDocument::load_with_env(file.path(), &MapEnv::new()).unwrap_err() {
        WranglerError::MalformedDocument { line, .. } => assert!(line.is_some()),
        other => panic!("expected MalformedDocument, got {other:?}"),
    }
}

// ============================================================================
// Registration and Binding
// ============================================================================

#[test]
fn test_register_every_variant_in_document_order() {
    let yaml = "\
secrets:
  pg:
    type: postgres
    host: h
    user: u
    password: p
    database: d
  my:
    type: mysql
    host: h
    user: u
    password: p
    database: d
  s3:
    type: s3
    key_id: k
    secret: s
    region: r
  gcs:
    type: gcs
    key_id: k
    secret: s
  az:
    type: azure
    connection_string: c
  r2:
    type: r2
    key_id: k
    secret: s
    account_id: a
  http:
    type: http
    bearer_token: t
  ice:
    type: iceberg
    token: t
  lake:
    type: ducklake
    metadata_path: m
    data_path: d
  hf:
    type: huggingface
    token: t
options:
  persistent: true
";
    let doc = ConfigDocument::from_str_with_env(yaml, &MapEnv::new()).unwrap();
    let mut log = StatementLog::new();
    assert_eq!(register_all(&mut log, &doc).unwrap(), 10);

    let types: Vec<_> = log
        .statements()
        .iter()
        .map(|sql| {
            assert!(sql.starts_with("CREATE OR REPLACE PERSISTENT SECRET"));
            let (_, rest) = sql.split_once("(TYPE ").unwrap();
            let end = rest.find([',', ')']).unwrap();
            rest[..end].to_string()
        })
        .collect();
    let expected = [
        "postgres",
        "mysql",
        "s3",
        "gcs",
        "azure",
        "r2",
        "http",
        "iceberg",
        "ducklake",
        "huggingface",
    ];
    assert_eq!(types, expected);
}

#[test]
fn test_bind_identity_and_unknown_secret() {
    let file = write_document(POSTGRES_DOC);
    let env = MapEnv::new().with("PW", "p1");
    let doc = ConfigDocument::load_with_env(file.path(), &env).unwrap();

    let plain = SourceRef::new("file", "events").with_param("path", "events.parquet");
    assert_eq!(bind(&plain, &doc).unwrap(), plain);

    let dangling = SourceRef::new("postgres", "orders").with_secret("nope");
    match bind(&dangling, &doc).unwrap_err() {
        WranglerError::SecretNotFound { name, alias } => {
            assert_eq!(name, "nope");
            assert_eq!(alias, "orders");
        }
        other => panic!("expected SecretNotFound, got {other:?}"),
    }
}

#[test]
fn test_request_plan_end_to_end() {
    let file = write_document(POSTGRES_DOC);
    let request_json = serde_json::json!({
        "query": "SELECT count(*) FROM db",
        "secrets_file": file.path(),
        "sources": [{"type": "postgres", "alias": "db", "secret": "warehouse", "table": "orders"}],
        "options": {"max_rows": 10}
    })
    .to_string();

    let plan = Request::from_json(&request_json)
        .unwrap()
        .plan_with_env(&MapEnv::new().with("PW", "p1"))
        .unwrap();

    assert_eq!(plan.sources.len(), 1);
    assert_eq!(plan.sources[0].params["host"], "db.x");
    assert_eq!(plan.sources[0].params["table"], "orders");
    assert_eq!(plan.options["max_rows"], 10);

    let mut log = StatementLog::new();
    plan.register(&mut log).unwrap();
    assert_eq!(log.statements().len(), 1);
}

#[test]
fn test_request_plan_fails_before_registration_on_bad_document() {
    let file = write_document("secrets:\n  pg:\n    type: postgres\n    host: h\n");
    let request = Request {
        query: "SELECT 1".into(),
        secrets_file: Some(file.path().to_path_buf()),
        sources: vec![],
        options: serde_json::Map::new(),
    };
    let err = request.plan_with_env(&MapEnv::new()).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    assert_eq!(err.field_errors().len(), 3);
}
