//! Candidate field names for every place raw node JSON is searched.
//!
//! Source libraries disagree on naming, so each extraction site tries an ordered list of
//! keys and takes the first structurally valid match. Supporting a new convention means
//! adding one entry here.

use serde_json::{Map, Value};

/// Keys under which a document may hold its collection of node records.
pub const NODE_CONTAINER_KEYS: &[&str] = &["nodes", "items", "resources", "elements"];

/// Presence of any of these marks a mapping as a single node record.
pub const NODE_MARKER_KEYS: &[&str] = &[
    "name",
    "displayOptions",
    "properties",
    "parameters",
    "credentials",
];

pub const NODE_ID_KEYS: &[&str] = &["node_id", "nodeId", "id", "name", "type"];
pub const NODE_NAME_KEYS: &[&str] = &["name", "displayName"];
pub const NODE_VERSION_KEYS: &[&str] = &["version", "versionId"];
pub const NODE_DESCRIPTION_KEYS: &[&str] = &["description", "summary", "note"];
pub const NODE_SNIPPET_KEYS: &[&str] = &["workflow_json_snippet"];

/// Covers both the "properties" and "parameters" conventions plus the looser ones seen
/// in hand-written libraries.
pub const PARAMETER_SOURCE_KEYS: &[&str] = &[
    "properties",
    "parameters",
    "options",
    "inputs",
    "parametersList",
    "fields",
    "attributes",
    "props",
    "params",
];

pub const DISPLAY_OPTION_KEYS: &[&str] = &["displayOptions", "display_options", "display"];

pub const PARAMETER_NAME_KEYS: &[&str] = &["name", "key", "id"];
pub const PARAMETER_LABEL_KEYS: &[&str] = &["label", "displayName"];
pub const PARAMETER_DESCRIPTION_KEYS: &[&str] = &["description", "note"];
pub const PARAMETER_HINT_KEYS: &[&str] = &["ai_hint", "naturalLanguageHint"];

/// Where a grouping parameter keeps its nested parameters.
pub const NESTING_KEYS: &[&str] = &["options", "values", "fields", "properties", "collection"];

/// Where an entry of an `options` list keeps its own nested parameters.
pub const OPTION_GROUP_KEYS: &[&str] = &["values", "options", "fields", "properties"];

/// Substring of a lowercased `type` that marks a grouping parameter.
pub const COLLECTION_TYPE_MARKER: &str = "collection";

/// Returns the first value under `keys` that is "truthy": not null, not `false`,
/// not zero, and not an empty string, list or mapping.
pub fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

/// Returns the first non-empty string under `keys`.
pub fn first_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
}

/// Returns the first non-empty list or mapping under `keys`.
pub fn first_container<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => false,
        })
}

/// Like [`first_str`], but also accepts numbers and renders them as text. Ids are
/// sometimes numeric in hand-written libraries.
pub fn first_identifier(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
