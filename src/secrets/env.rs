//! `${NAME}` placeholder expansion
//!
//! Strings anywhere inside a YAML value may reference environment variables
//! with `${NAME}`, including mid-string (`postgres://${HOST}/db`). Expansion
//! is a single pass over the input text: content coming out of the
//! environment is never scanned again, so a variable whose value itself
//! contains `${...}` is inserted literally.
//!
//! The environment is an injected [`EnvLookup`] so callers (and tests) can
//! substitute a fixed mapping for the live process environment.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::Value;

use crate::error::{Result, WranglerError};

/// Read-only view of environment variables
pub trait EnvLookup {
    /// Value of `name`, or `None` when it is not set
    fn get(&self, name: &str) -> Option<String>;
}

/// The live process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, used in place of the process environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl EnvLookup for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

fn placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Expand every `${NAME}` in `input`
///
/// `path` only labels the error; it is never combined with any value.
pub fn expand_str(input: &str, path: &str, env: &dyn EnvLookup) -> Result<String> {
    let pattern = placeholder();
    if !pattern.is_match(input) {
        return Ok(input.to_string());
    }

    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in pattern.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = env
            .get(name.as_str())
            .ok_or_else(|| WranglerError::missing_env(name.as_str(), path))?;
        out.push_str(&input[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}

/// Expand placeholders in every string nested inside `value`
///
/// Mapping keys are left untouched; non-string scalars pass through.
pub fn expand_value(value: &Value, path: &str, env: &dyn EnvLookup) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(expand_str(s, path, env)?)),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| expand_value(item, &format!("{path}[{i}]"), env))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Value::Mapping(map) => {
            let mut expanded = serde_yaml::Mapping::with_capacity(map.len());
            for (key, item) in map {
                let child = match key.as_str() {
                    Some(k) => format!("{path}.{k}"),
                    None => path.to_string(),
                };
                expanded.insert(key.clone(), expand_value(item, &child, env)?);
            }
            Ok(Value::Mapping(expanded))
        }
        Value::Tagged(tagged) => {
            let mut tagged = tagged.as_ref().clone();
            tagged.value = expand_value(&tagged.value, path, env)?;
            Ok(Value::Tagged(Box::new(tagged)))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env() -> MapEnv {
        MapEnv::new()
            .with("HOST", "db.example.com")
            .with("PASS", "secret")
            .with("VAR1", "value1")
            .with("VAR2", "value2")
            .with("NESTED", "${HOST}")
    }

    fn expand(input: &str) -> String {
        expand_str(input, "x", &env()).unwrap()
    }

    #[test]
    fn test_single_var() {
        assert_eq!(expand("${HOST}"), "db.example.com");
    }

    #[test]
    fn test_multiple_vars_mid_string() {
        assert_eq!(expand("${VAR1}-${VAR2}"), "value1-value2");
        assert_eq!(expand("pg://${HOST}/db"), "pg://db.example.com/db");
    }

    #[test]
    fn test_no_pattern_is_unchanged() {
        assert_eq!(expand("plain string"), "plain string");
        assert_eq!(expand("${}"), "${}");
        assert_eq!(expand("${UNCLOSED"), "${UNCLOSED");
        assert_eq!(expand("$HOST"), "$HOST");
    }

    #[test]
    fn test_substituted_content_is_not_reexpanded() {
        assert_eq!(expand("${NESTED}"), "${HOST}");
    }

    #[test]
    fn test_twice_equals_once_for_plain_values() {
        let once = expand("${VAR1}:${HOST}");
        let twice = expand(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_var_names_variable_and_path() {
        let err = expand_str("pre-${NOPE_XYZ}", "secrets.pg.password", &env()).unwrap_err();
        match err {
            WranglerError::MissingEnvironmentVariable { variable, path } => {
                assert_eq!(variable, "NOPE_XYZ");
                assert_eq!(path, "secrets.pg.password");
            }
            other => panic!("expected MissingEnvironmentVariable, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_mapping_and_sequence() {
        let value: Value = serde_yaml::from_str(
            "host: ${HOST}\ncredentials:\n  password: ${PASS}\nitems: [\"${VAR1}\", \"${VAR2}\"]\n",
        )
        .unwrap();

        let expanded = expand_value(&value, "root", &env()).unwrap();
        assert_eq!(expanded["host"], Value::from("db.example.com"));
        assert_eq!(expanded["credentials"]["password"], Value::from("secret"));
        assert_eq!(expanded["items"][0], Value::from("value1"));
        assert_eq!(expanded["items"][1], Value::from("value2"));
    }

    #[test]
    fn test_missing_var_path_points_at_nested_field() {
        let value: Value = serde_yaml::from_str("headers:\n  X-Token: ${MISSING}\n").unwrap();
        let err = expand_value(&value, "secrets.api", &env()).unwrap_err();
        assert!(err.message().contains("secrets.api.headers.X-Token"));
    }

    #[test]
    fn test_non_string_passthrough() {
        for raw in ["123", "true", "~", "1.5"] {
            let value: Value = serde_yaml::from_str(raw).unwrap();
            assert_eq!(expand_value(&value, "x", &env()).unwrap(), value);
        }
    }

    #[test]
    fn test_map_env_from_iter() {
        let env: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.get("A").as_deref(), Some("1"));
        assert_eq!(env.get("C"), None);
    }
}
