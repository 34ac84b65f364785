//! Finds the node records inside an arbitrarily shaped source document.

use crate::conventions::{NODE_CONTAINER_KEYS, NODE_MARKER_KEYS};
use serde_json::{Map, Value};

/// Returns the node-like mappings held by `document`.
///
/// * A top-level list yields its mapping entries.
/// * A mapping with a list under one of [`NODE_CONTAINER_KEYS`] yields that list's
///   mapping entries. Keys are tried in order and the first list wins.
/// * A mapping carrying any of [`NODE_MARKER_KEYS`] is itself the single node.
///
/// Anything else yields an empty list.
pub fn locate_nodes(document: &Value) -> Vec<&Map<String, Value>> {
    match document {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        Value::Object(object) => {
            let container = NODE_CONTAINER_KEYS
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_array));
            if let Some(items) = container {
                return items.iter().filter_map(Value::as_object).collect();
            }
            if NODE_MARKER_KEYS.iter().any(|key| object.contains_key(*key)) {
                return vec![object];
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}
