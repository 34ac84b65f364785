use super::{ConfigurationLogic, NormalizedNode};
use crate::conventions::{
    DISPLAY_OPTION_KEYS, NODE_DESCRIPTION_KEYS, NODE_ID_KEYS, NODE_NAME_KEYS, NODE_SNIPPET_KEYS,
    NODE_VERSION_KEYS, PARAMETER_NAME_KEYS, PARAMETER_SOURCE_KEYS, first_container,
    first_identifier, first_present, first_str,
};
use crate::error::NodeError;
use crate::params::{Canonicalizer, ParameterMap};
use crate::rules::{dedupe_rules, rules_from_display_options};
use crate::sanitize::sanitize_text;
use ahash::AHashSet;
use serde_json::{Map, Value};

/// Builds a [`NormalizedNode`] from one raw node record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeNormalizer {
    canonicalizer: Canonicalizer,
}

impl NodeNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Normalizes a record that may not be a mapping. `index` is only used for the error.
    pub fn normalize_value(&self, index: usize, raw: &Value) -> Result<NormalizedNode, NodeError> {
        raw.as_object()
            .map(|node| self.normalize(node))
            .ok_or(NodeError::NotAnObject { index })
    }

    /// Normalizes one raw node mapping.
    ///
    /// The same input always produces the same output.
    pub fn normalize(&self, raw: &Map<String, Value>) -> NormalizedNode {
        let node_id = first_identifier(raw, NODE_ID_KEYS);
        let name = first_str(raw, NODE_NAME_KEYS)
            .map(str::to_string)
            .or_else(|| node_id.clone());

        let mut rules = Vec::new();
        if let Some(display_options) = first_present(raw, DISPLAY_OPTION_KEYS) {
            rules.extend(rules_from_display_options(display_options, name.as_deref()));
        }

        let source = first_container(raw, PARAMETER_SOURCE_KEYS);
        let parameters = source
            .map(|source| self.canonicalizer.canonicalize(source, &mut rules))
            .unwrap_or_default();
        let required_sequence = required_sequence(source, &parameters);

        NormalizedNode {
            node_id,
            name,
            version: resolve_version(raw),
            semantic_context: first_str(raw, NODE_DESCRIPTION_KEYS)
                .map(sanitize_text)
                .unwrap_or_default(),
            parameters,
            configuration_logic: ConfigurationLogic {
                required_sequence,
                conditional_rules: dedupe_rules(rules),
            },
            workflow_json_snippet: first_present(raw, NODE_SNIPPET_KEYS).cloned(),
            ids_manifest: None,
        }
    }
}

/// Declaration order of explicitly named parameters for list sources, key order of the
/// canonical map otherwise.
fn required_sequence(source: Option<&Value>, parameters: &ParameterMap) -> Vec<String> {
    match source {
        Some(Value::Array(items)) => {
            let mut seen = AHashSet::new();
            items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|fragment| first_identifier(fragment, PARAMETER_NAME_KEYS))
                .filter(|name| seen.insert(name.clone()))
                .collect()
        }
        _ => parameters.names().map(str::to_string).collect(),
    }
}

/// Integer version of a node, defaulting to 1.
///
/// Floats are truncated, a list of versions yields its last numeric entry and numeric
/// strings are parsed. Anything else (such as a UUID `versionId`) falls back to 1.
fn resolve_version(raw: &Map<String, Value>) -> i64 {
    NODE_VERSION_KEYS
        .iter()
        .filter_map(|key| raw.get(*key))
        .find_map(version_number)
        .unwrap_or(1)
}

fn version_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64)),
        Value::Array(items) => items.iter().rev().find_map(version_number),
        _ => None,
    }
    .filter(|version| *version != 0)
}
