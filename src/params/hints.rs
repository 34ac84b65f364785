//! Advisory hints derived from a parameter's name and declared type.

use crate::conventions::{COLLECTION_TYPE_MARKER, PARAMETER_DESCRIPTION_KEYS, first_str};
use crate::sanitize::sanitize_text;
use serde_json::{Map, Value};

pub const COLLECTION_HINT: &str =
    "This parameter is a grouped collection with nested fields; do not flatten it.";
pub const URL_HINT: &str =
    "Must include a protocol prefix (http:// or https://). Supports expression injection.";
pub const METHOD_HINT: &str = "Choose the method by REST convention: GET to read, POST to create, PUT/PATCH to update.";
pub const BOOLEAN_HINT: &str = "Boolean value: true or false.";
pub const SENSITIVE_HINT: &str =
    "Authentication-related; never write its value to public logs.";

/// Builds the hint text for one parameter.
///
/// Every matching heuristic contributes its sentence, in a fixed order, joined by
/// spaces. When nothing matches, the fragment's own description (or note) is used, and
/// failing that the hint is empty.
pub fn synthesize_hint(name: &str, fragment: &Map<String, Value>) -> String {
    let kind = fragment
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    let name = name.to_lowercase();
    let has_options = fragment
        .get("options")
        .and_then(Value::as_array)
        .is_some_and(|options| !options.is_empty());

    let mut hints = Vec::new();
    if kind.contains(COLLECTION_TYPE_MARKER) {
        hints.push(COLLECTION_HINT);
    }
    if name.contains("url") {
        hints.push(URL_HINT);
    }
    if name == "method" || (kind == "options" && has_options) {
        hints.push(METHOD_HINT);
    }
    if kind == "boolean" || name.starts_with("is") || name.starts_with("has") {
        hints.push(BOOLEAN_HINT);
    }
    if name.contains("token") || name.contains("auth") {
        hints.push(SENSITIVE_HINT);
    }

    if hints.is_empty() {
        return first_str(fragment, PARAMETER_DESCRIPTION_KEYS)
            .map(sanitize_text)
            .unwrap_or_default();
    }
    hints.join(" ")
}
