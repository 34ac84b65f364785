//! Visibility rules and their human-readable rendering.
//!
//! A rule reads `IF <conditions> THEN <SHOW|HIDE> [parameter '<target>']`. Conditions
//! are conjoined with `AND`, and a single accepted value renders as `==` while several
//! render as `IN [...]`.

use ahash::AHashSet;
use itertools::Itertools;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

mod flatten;

pub use flatten::{conditions_for, rules_from_display_options};

/// The two modes of a visibility specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Show,
    Hide,
}

impl Visibility {
    /// Modes in the order their rules are emitted.
    pub const ALL: [Visibility; 2] = [Visibility::Show, Visibility::Hide];

    /// The key this mode uses inside a `displayOptions` mapping.
    pub fn key(self) -> &'static str {
        match self {
            Visibility::Show => "show",
            Visibility::Hide => "hide",
        }
    }

    /// The action keyword used in a rendered rule.
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Show => "SHOW",
            Visibility::Hide => "HIDE",
        }
    }
}

/// The values a condition accepts for its field.
#[derive(Debug, Clone, PartialEq)]
pub enum Accepted {
    /// Exactly one accepted value, rendered as `==`.
    Single(Value),
    /// Zero or several accepted values, rendered as `IN [...]`.
    AnyOf(Vec<Value>),
}

impl Accepted {
    /// A list of one collapses to [`Accepted::Single`]; any other list stays a set.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) if items.len() == 1 => Accepted::Single(items[0].clone()),
            Value::Array(items) => Accepted::AnyOf(items.clone()),
            other => Accepted::Single(other.clone()),
        }
    }
}

/// One `field == value` or `field IN [...]` clause. Nested fields use a dot-joined path.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: String,
    pub accepted: Accepted,
}

impl Condition {
    pub fn new(path: impl Into<String>, value: &Value) -> Self {
        Self {
            path: path.into(),
            accepted: Accepted::from_value(value),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.accepted {
            Accepted::Single(value) => write!(f, "{} == {}", self.path, scalar_literal(value)),
            Accepted::AnyOf(values) => write!(
                f,
                "{} IN [{}]",
                self.path,
                values.iter().map(json_literal).join(", ")
            ),
        }
    }
}

/// An implication rule derived from one mode of a visibility specification.
///
/// Rules are compared by their rendered text: two rules that print identically are the
/// same rule, even when they were built from differently shaped specifications.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionRule {
    pub conditions: Vec<Condition>,
    pub visibility: Visibility,
    pub target: Option<String>,
}

impl fmt::Display for ConditionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IF {} THEN {}",
            self.conditions.iter().join(" AND "),
            self.visibility.keyword()
        )?;
        if let Some(target) = &self.target {
            write!(f, " parameter '{}'", target)?;
        }
        Ok(())
    }
}

impl Serialize for ConditionRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Drops every rule whose rendered text was already seen, keeping first occurrences
/// in their original order.
pub fn dedupe_rules(rules: Vec<ConditionRule>) -> Vec<ConditionRule> {
    let mut seen = AHashSet::new();
    rules
        .into_iter()
        .filter(|rule| seen.insert(rule.to_string()))
        .collect()
}

/// Strings are single-quoted; everything else renders as its JSON literal.
fn scalar_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => json_literal(other),
    }
}

/// JSON text with `", "` and `": "` separators, so nested lists and objects read the
/// same way as the surrounding `IN [...]` list.
fn json_literal(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("[{}]", items.iter().map(json_literal).join(", ")),
        Value::Object(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(key, item)| format!("{}: {}", string_literal(key), json_literal(item)))
                .join(", ")
        ),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn string_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}
