use super::hints::synthesize_hint;
use super::{OptionSummary, ParameterMap, ParameterSpec};
use crate::conventions::{
    COLLECTION_TYPE_MARKER, DISPLAY_OPTION_KEYS, NESTING_KEYS, OPTION_GROUP_KEYS,
    PARAMETER_HINT_KEYS, PARAMETER_LABEL_KEYS, PARAMETER_NAME_KEYS, first_container,
    first_identifier, first_present, first_str,
};
use crate::rules::{ConditionRule, rules_from_display_options};
use crate::sanitize::{sanitize_text, sanitize_value};
use ahash::AHashSet;
use serde_json::{Map, Value};
use tracing::warn;

/// Deepest level of nested grouping that is still descended into.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Turns a raw parameter list or mapping into a [`ParameterMap`], collecting the
/// visibility rules found at every level of nesting along the way.
///
/// Canonicalization never fails. Non-object fragments are skipped, fragments without a
/// name get a positional placeholder, and missing fields stay empty.
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer {
    max_depth: usize,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl Canonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Canonicalizes `source`, appending every rule discovered to `rules`.
    pub fn canonicalize(&self, source: &Value, rules: &mut Vec<ConditionRule>) -> ParameterMap {
        self.collection(source, 0, rules)
    }

    fn collection(&self, source: &Value, depth: usize, rules: &mut Vec<ConditionRule>) -> ParameterMap {
        let mut params = ParameterMap::new();
        if depth > self.max_depth {
            warn!(
                "Parameter nesting exceeds {} levels, deeper groups are ignored",
                self.max_depth
            );
            return params;
        }

        for entry in named_fragments(source) {
            let spec = self.fragment(entry.name, entry.target.as_deref(), entry.fragment, depth, rules);
            params.insert(spec);
        }
        params
    }

    fn fragment(
        &self,
        name: String,
        target: Option<&str>,
        fragment: &Map<String, Value>,
        depth: usize,
        rules: &mut Vec<ConditionRule>,
    ) -> ParameterSpec {
        if let Some(display_options) = first_present(fragment, DISPLAY_OPTION_KEYS) {
            rules.extend(rules_from_display_options(display_options, target));
        }

        let kind = fragment.get("type").and_then(Value::as_str).map(str::to_string);
        let is_collection = kind.as_deref().is_some_and(is_collection_type);
        if is_collection {
            // Only the rules matter here; the nested specs are summarized through
            // `availableOptions` instead.
            for key in NESTING_KEYS {
                if let Some(nested) = first_container(fragment, &[*key]) {
                    self.collection(nested, depth + 1, rules);
                }
            }
        }

        // Entries of a walked `options` list have already been visited as fragments,
        // so a grouping entry's own groups must not be walked a second time.
        let options_walked = is_collection && first_container(fragment, &["options"]).is_some();
        let available_options = fragment.get("options").and_then(Value::as_array).map(|options| {
            options
                .iter()
                .filter_map(|option| self.option_summary(option, options_walked, depth, rules))
                .collect()
        });

        let natural_language_hint = first_str(fragment, PARAMETER_HINT_KEYS)
            .map(str::to_string)
            .unwrap_or_else(|| synthesize_hint(&name, fragment));

        ParameterSpec {
            display_name: fragment
                .get("displayName")
                .and_then(Value::as_str)
                .map(str::to_string),
            kind,
            required: fragment.get("required").and_then(Value::as_bool).unwrap_or(false),
            default: fragment.get("default").cloned(),
            description: sanitize_value(fragment.get("description")),
            available_options,
            natural_language_hint,
            name,
        }
    }

    fn option_summary(
        &self,
        option: &Value,
        options_walked: bool,
        depth: usize,
        rules: &mut Vec<ConditionRule>,
    ) -> Option<OptionSummary> {
        let option = match option {
            Value::Object(option) => option,
            Value::String(s) => {
                return Some(OptionSummary {
                    name: s.clone(),
                    value: Some(Value::String(s.clone())),
                    description: None,
                    fields: Vec::new(),
                });
            }
            Value::Number(n) => {
                return Some(OptionSummary {
                    name: n.to_string(),
                    value: Some(Value::Number(n.clone())),
                    description: None,
                    fields: Vec::new(),
                });
            }
            _ => return None,
        };

        let already_visited = options_walked
            && option
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(is_collection_type);
        let fields = match first_container(option, OPTION_GROUP_KEYS) {
            Some(group) if already_visited => group_names(group),
            Some(group) => self
                .collection(group, depth + 1, rules)
                .names()
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        let value = option.get("value").cloned();
        let name = first_str(option, &["name", "displayName"])
            .map(str::to_string)
            .or_else(|| match &value {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                _ => None,
            })?;
        let description = option
            .get("description")
            .and_then(Value::as_str)
            .map(sanitize_text)
            .filter(|d| !d.is_empty());

        Some(OptionSummary {
            name,
            value,
            description,
            fields,
        })
    }
}

fn is_collection_type(kind: &str) -> bool {
    kind.to_lowercase().contains(COLLECTION_TYPE_MARKER)
}

/// One fragment of a parameter collection with the name it is stored under and the
/// target its rules point at.
struct NamedFragment<'a> {
    name: String,
    target: Option<String>,
    fragment: &'a Map<String, Value>,
}

/// Resolves the names of every object fragment in `source`, in order.
///
/// In a mapping the key is authoritative for the name. In a list the explicit
/// `name`/`key`/`id` wins, then the label, then a `param_<n>` placeholder that is not yet
/// taken, counting from the number of distinct names so far plus one.
fn named_fragments(source: &Value) -> Vec<NamedFragment<'_>> {
    match source {
        Value::Object(entries) => entries
            .iter()
            .filter_map(|(key, fragment)| {
                fragment.as_object().map(|fragment| NamedFragment {
                    name: key.clone(),
                    target: Some(key.clone()),
                    fragment,
                })
            })
            .collect(),
        Value::Array(items) => {
            let mut taken = AHashSet::new();
            let mut named = Vec::new();
            for fragment in items.iter().filter_map(Value::as_object) {
                let target = first_identifier(fragment, PARAMETER_NAME_KEYS)
                    .or_else(|| first_str(fragment, PARAMETER_LABEL_KEYS).map(str::to_string));
                let name = target
                    .clone()
                    .unwrap_or_else(|| placeholder_name(&taken));
                taken.insert(name.clone());
                named.push(NamedFragment {
                    name,
                    target,
                    fragment,
                });
            }
            named
        }
        _ => Vec::new(),
    }
}

fn placeholder_name(taken: &AHashSet<String>) -> String {
    let mut position = taken.len() + 1;
    loop {
        let candidate = format!("param_{}", position);
        if !taken.contains(&candidate) {
            return candidate;
        }
        position += 1;
    }
}

/// The names a group canonicalizes to, without descending into it.
fn group_names(group: &Value) -> Vec<String> {
    let mut seen = AHashSet::new();
    named_fragments(group)
        .into_iter()
        .map(|entry| entry.name)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
