//! Canonical parameter records and the ordered map that holds them.

use ahash::AHashMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

mod canonicalize;
pub mod hints;

pub use canonicalize::{Canonicalizer, MAX_NESTING_DEPTH};

/// One parameter of a node, reduced to a uniform shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form type tag such as `string`, `options` or `fixedCollection`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
    /// Present only when the raw parameter declares an `options` list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_options: Option<Vec<OptionSummary>>,
    pub natural_language_hint: String,
}

/// A short description of one entry of a parameter's `options` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Names of the nested parameters when the option is itself a group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Parameters keyed by name, iterated in insertion order.
///
/// Re-inserting an existing name replaces the spec but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<ParameterSpec>,
    index: AHashMap<String, usize>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a spec under its own name, returning the spec it replaced, if any.
    pub fn insert(&mut self, spec: ParameterSpec) -> Option<ParameterSpec> {
        match self.index.get(&spec.name) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], spec)),
            None => {
                self.index.insert(spec.name.clone(), self.entries.len());
                self.entries.push(spec);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|spec| spec.name.as_str())
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|spec| (&spec.name, spec)))
    }
}
