//! Cross-field constraints
//!
//! Constraints are attached to a variant as static data and evaluated after
//! every field-level check passed, against the normalized field mapping.
//! The only shape needed so far is "authentication modes": a set of named
//! modes, each switched on by the presence (or value) of certain fields and
//! each with its own required fields once switched on.

use serde_yaml::{Mapping, Value};

/// What switches an authentication mode on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Field is set
    Present(&'static str),
    /// Keyword field is set to this value
    Equals(&'static str, &'static str),
}

impl Trigger {
    fn holds(&self, fields: &Mapping) -> bool {
        match self {
            Self::Present(name) => fields.contains_key(*name),
            Self::Equals(name, expected) => {
                fields.get(*name).and_then(Value::as_str) == Some(*expected)
            }
        }
    }
}

/// One way of authenticating against an external system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthMode {
    pub name: &'static str,
    /// Any of these switches the mode on
    pub triggers: &'static [Trigger],
    /// All of these must be set once the mode is on
    pub requires: &'static [&'static str],
    /// At least one of these must be set once the mode is on (ignored when empty)
    pub requires_any: &'static [&'static str],
}

impl AuthMode {
    fn active(&self, fields: &Mapping) -> bool {
        self.triggers.iter().any(|t| t.holds(fields))
    }

    fn unmet_requirements(&self, fields: &Mapping) -> Option<String> {
        let missing: Vec<&str> = self
            .requires
            .iter()
            .copied()
            .filter(|f| !fields.contains_key(*f))
            .collect();
        let any_missing = !self.requires_any.is_empty()
            && !self.requires_any.iter().any(|f| fields.contains_key(*f));

        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(quoted(&missing).join(", "));
        }
        if any_missing {
            parts.push(format!("one of {}", quoted(self.requires_any).join(" or ")));
        }
        if parts.is_empty() {
            return None;
        }

        let name = self.name;
        let needs = parts.join(" and ");
        Some(format!("{name} authentication requires {needs}"))
    }
}

fn quoted(names: &[&str]) -> Vec<String> {
    names.iter().map(|f| format!("'{f}'")).collect()
}

/// Declarative cross-field constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Exactly one mode must be switched on and satisfied
    ExactlyOneMode(&'static [AuthMode]),
    /// No mode, or one satisfied mode
    AtMostOneMode(&'static [AuthMode]),
}

impl Constraint {
    /// Describe every violation; empty when the constraint holds
    #[must_use]
    pub fn violations(&self, fields: &Mapping) -> Vec<String> {
        let (modes, allow_none) = match self {
            Self::ExactlyOneMode(modes) => (*modes, false),
            Self::AtMostOneMode(modes) => (*modes, true),
        };

        let active: Vec<&AuthMode> = modes.iter().filter(|m| m.active(fields)).collect();
        match active.as_slice() {
            [] if allow_none => Vec::new(),
            [] => vec![format!(
                "exactly one authentication mode must be configured ({})",
                mode_names(modes.iter())
            )],
            [mode] => mode.unmet_requirements(fields).into_iter().collect(),
            several => vec![format!(
                "authentication modes are mutually exclusive, found {}",
                mode_names(several.iter().copied())
            )],
        }
    }
}

fn mode_names<'a>(modes: impl Iterator<Item = &'a AuthMode>) -> String {
    modes.map(|m| m.name).collect::<Vec<_>>().join(", ")
}
