//! Declarative field sets
//!
//! Every credential variant declares its fields as a static table of
//! [`FieldSpec`]s. [`check_fields`] evaluates a raw entry against such a
//! table: unexpected keys, missing required fields and type coercion are
//! checked uniformly, and defaults are filled in. The result is a normalized
//! mapping whose values already have their final YAML shape, ready to be
//! deserialized into the variant's struct.

use serde_yaml::{Mapping, Value};

use crate::error::{FieldError, FieldErrorKind};

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Any string
    String,
    /// TCP port; accepts integers and numeric strings in `1..=65535`
    Port,
    /// Accepts booleans, `0`/`1`, and `true/false`, `yes/no`, `on/off` strings
    Boolean,
    /// Mapping of string keys to string values, order preserved
    StringMap,
    /// String drawn from a closed, case-insensitive set; normalized to lowercase
    Keyword(&'static [&'static str]),
}

impl FieldType {
    /// Human-readable expectation used in type-mismatch errors
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String => "a string".to_string(),
            Self::Port => "an integer between 1 and 65535".to_string(),
            Self::Boolean => "a boolean".to_string(),
            Self::StringMap => "a mapping of strings to strings".to_string(),
            Self::Keyword(allowed) => format!("one of: {}", allowed.join(", ")),
        }
    }

    /// Coerce a raw value to this type, `None` when it cannot be
    fn coerce(&self, raw: &Value) -> Option<Value> {
        match (self, raw) {
            (Self::String, Value::String(_)) => Some(raw.clone()),
            (Self::Port, Value::Number(n)) => n.as_u64().and_then(port).map(Value::from),
            (Self::Port, Value::String(s)) => {
                s.trim().parse().ok().and_then(port).map(Value::from)
            }
            (Self::Boolean, Value::Bool(_)) => Some(raw.clone()),
            (Self::Boolean, Value::Number(n)) => match n.as_u64() {
                Some(0) => Some(Value::Bool(false)),
                Some(1) => Some(Value::Bool(true)),
                _ => None,
            },
            (Self::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            (Self::StringMap, Value::Mapping(map)) => {
                let all_strings = map.iter().all(|(k, v)| k.is_string() && v.is_string());
                all_strings.then(|| raw.clone())
            }
            (Self::Keyword(allowed), Value::String(s)) => {
                let lowered = s.trim().to_ascii_lowercase();
                let known = allowed.contains(&lowered.as_str());
                known.then(|| Value::String(lowered))
            }
            _ => None,
        }
    }
}

fn port(n: u64) -> Option<u16> {
    u16::try_from(n).ok().filter(|p| *p != 0)
}

/// Default applied when an optional field is left unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Port(u16),
    Boolean(bool),
    String(&'static str),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            Self::Port(p) => Value::from(p),
            Self::Boolean(b) => Value::Bool(b),
            Self::String(s) => Value::from(s),
        }
    }
}

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Defaulted(DefaultValue),
}

/// One declared field of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
    /// Value is a credential: redacted from logs, CLI output and engine errors
    pub sensitive: bool,
}

impl FieldSpec {
    #[must_use]
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Required,
            sensitive: false,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Optional,
            sensitive: false,
        }
    }

    #[must_use]
    pub const fn defaulted(name: &'static str, ty: FieldType, default: DefaultValue) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Defaulted(default),
            sensitive: false,
        }
    }

    #[must_use]
    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }
}

/// Display form of a mapping key for error reporting
pub(crate) fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        _ => "<complex key>".to_string(),
    }
}

/// Check `raw` against `specs` and return the normalized mapping
///
/// Problems are appended to `errors` with paths rooted at `path`. Returns
/// `None` when this entry produced any error, so no partially-checked
/// mapping ever escapes.
pub fn check_fields(
    variant: &str,
    specs: &[FieldSpec],
    raw: &Mapping,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Mapping> {
    let before = errors.len();

    for key in raw.keys() {
        let known = key
            .as_str()
            .is_some_and(|k| specs.iter().any(|s| s.name == k));
        if !known {
            let field = key_name(key);
            errors.push(FieldError::new(
                format!("{path}.{field}"),
                FieldErrorKind::UnexpectedField {
                    field,
                    variant: variant.to_string(),
                },
            ));
        }
    }

    let mut normalized = Mapping::with_capacity(specs.len());
    for spec in specs {
        let field_path = format!("{path}.{}", spec.name);
        match (raw.get(spec.name), spec.presence) {
            (None, Presence::Required) => errors.push(FieldError::new(
                field_path,
                FieldErrorKind::MissingRequired {
                    field: spec.name.to_string(),
                    variant: variant.to_string(),
                },
            )),
            (None | Some(Value::Null), Presence::Optional) => {}
            (None | Some(Value::Null), Presence::Defaulted(default)) => {
                normalized.insert(Value::from(spec.name), default.to_value());
            }
            (Some(value), _) => match spec.ty.coerce(value) {
                Some(coerced) => {
                    normalized.insert(Value::from(spec.name), coerced);
                }
                None => errors.push(FieldError::new(
                    field_path,
                    FieldErrorKind::TypeMismatch {
                        field: spec.name.to_string(),
                        expected: spec.ty.describe(),
                        variant: variant.to_string(),
                    },
                )),
            },
        }
    }

    (errors.len() == before).then_some(normalized)
}
