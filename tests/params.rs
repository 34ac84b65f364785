//! Tests for parameter canonicalization and hint synthesis.
use seiri::params::hints::{BOOLEAN_HINT, COLLECTION_HINT, METHOD_HINT, SENSITIVE_HINT, URL_HINT};
use seiri::prelude::*;
use serde_json::{Map, Value, json};

fn fragment(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("fixture is an object")
}

fn canonicalize(source: Value) -> (ParameterMap, Vec<ConditionRule>) {
    let mut rules = Vec::new();
    let params = Canonicalizer::new().canonicalize(&source, &mut rules);
    (params, rules)
}

#[test]
fn test_mapping_key_is_authoritative_and_order_preserved() {
    let (params, _) = canonicalize(json!({
        "url": {"name": "ignored", "type": "string"},
        "method": {"type": "options", "options": ["GET", "POST"]},
        "notAFragment": 5
    }));

    let names: Vec<&str> = params.names().collect();
    assert_eq!(names, vec!["url", "method"]);
    assert_eq!(params.get("url").unwrap().name, "url");
}

#[test]
fn test_placeholder_names_are_unique() {
    let (params, _) = canonicalize(json!([
        {"name": "param_2"},
        {"type": "string"},
        {"label": "Nice Label"},
        {"key": "apiKey"},
        {"id": 7}
    ]));

    let names: Vec<&str> = params.names().collect();
    assert_eq!(names, vec!["param_2", "param_3", "Nice Label", "apiKey", "7"]);
}

#[test]
fn test_duplicate_names_keep_first_position() {
    let (params, _) = canonicalize(json!([
        {"name": "a", "type": "string"},
        {"name": "b"},
        {"name": "a", "type": "number"}
    ]));

    let names: Vec<&str> = params.names().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(params.get("a").unwrap().kind.as_deref(), Some("number"));
}

#[test]
fn test_parameter_fields_are_populated() {
    let (params, _) = canonicalize(json!([{
        "displayName": "Limit",
        "name": "limit",
        "type": "number",
        "required": true,
        "default": 50,
        "description": "Max number of <b>results</b> to return"
    }]));

    let spec = params.get("limit").unwrap();
    assert_eq!(spec.display_name.as_deref(), Some("Limit"));
    assert_eq!(spec.kind.as_deref(), Some("number"));
    assert!(spec.required);
    assert_eq!(spec.default, Some(json!(50)));
    assert_eq!(spec.description, "Max number of **results** to return");
    assert!(spec.available_options.is_none());
    // No heuristic matches, so the description becomes the hint.
    assert_eq!(spec.natural_language_hint, "Max number of **results** to return");
}

#[test]
fn test_partial_fragment_is_tolerated() {
    let (params, _) = canonicalize(json!([{"name": "bare"}]));
    let spec = params.get("bare").unwrap();
    assert_eq!(spec.kind, None);
    assert!(!spec.required);
    assert_eq!(spec.default, None);
    assert_eq!(spec.description, "");
    assert_eq!(spec.natural_language_hint, "");

    let serialized = serde_json::to_value(spec).unwrap();
    assert_eq!(
        serialized,
        json!({"name": "bare", "required": false, "description": "", "naturalLanguageHint": ""})
    );
}

#[test]
fn test_option_summaries() {
    let (params, _) = canonicalize(json!([{
        "name": "resource",
        "type": "options",
        "options": [
            {"name": "Message", "value": "message", "description": "A <code>chat</code> message"},
            {"value": "file"},
            "raw",
            null
        ]
    }]));

    let options = params.get("resource").unwrap().available_options.as_ref().unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].name, "Message");
    assert_eq!(options[0].value, Some(json!("message")));
    assert_eq!(options[0].description.as_deref(), Some("A `chat` message"));
    assert_eq!(options[1].name, "file");
    assert_eq!(options[2].name, "raw");
}

#[test]
fn test_rules_surface_from_nested_collections() {
    let (params, rules) = canonicalize(json!([{
        "name": "headers",
        "type": "fixedCollection",
        "options": [{
            "name": "header",
            "values": [
                {"name": "headerName", "type": "string"},
                {"name": "headerValue", "type": "string",
                 "displayOptions": {"hide": {"operation": ["getAll"]}}}
            ]
        }]
    }]));

    let rendered: Vec<String> = dedupe_rules(rules).iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["IF operation == 'getAll' THEN HIDE parameter 'headerValue'"]);

    let spec = params.get("headers").unwrap();
    assert_eq!(spec.natural_language_hint, COLLECTION_HINT);
    let group = &spec.available_options.as_ref().unwrap()[0];
    assert_eq!(group.name, "header");
    assert_eq!(group.fields, vec!["headerName", "headerValue"]);
}

#[test]
fn test_collection_nesting_keys_are_searched() {
    let (_, rules) = canonicalize(json!([{
        "name": "extra",
        "type": "collection",
        "fields": {
            "timeout": {"type": "number", "displayOptions": {"show": {"advanced": [true]}}}
        }
    }]));

    let rendered: Vec<String> = rules.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["IF advanced == true THEN SHOW parameter 'timeout'"]);
}

#[test]
fn test_depth_guard_stops_runaway_nesting() {
    let mut nested = json!({"name": "leaf", "type": "string"});
    for level in (0..200).rev() {
        nested = json!({
            "name": format!("p{}", level),
            "type": "collection",
            "displayOptions": {"show": {"level": [level]}},
            "values": [nested]
        });
    }
    let source = json!([nested]);

    let mut rules = Vec::new();
    Canonicalizer::new()
        .with_max_depth(3)
        .canonicalize(&source, &mut rules);
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[3].to_string(), "IF level == 3 THEN SHOW parameter 'p3'");

    let mut rules = Vec::new();
    Canonicalizer::new().canonicalize(&source, &mut rules);
    assert_eq!(rules.len(), seiri::params::MAX_NESTING_DEPTH + 1);
}

/// A chain of collections, each nested inside the previous one's `options` list.
fn options_chain(levels: usize) -> Value {
    let mut nested = json!({"name": "leaf", "type": "string"});
    for level in (0..levels).rev() {
        nested = json!({
            "name": format!("p{}", level),
            "type": "collection",
            "displayOptions": {"show": {"level": [level]}},
            "options": [nested]
        });
    }
    json!([nested])
}

#[test]
fn test_options_chain_is_walked_once_per_level() {
    let (params, rules) = canonicalize(options_chain(20));

    // One rule per level before any de-duplication.
    assert_eq!(rules.len(), 20);
    assert_eq!(dedupe_rules(rules.clone()).len(), 20);
    assert_eq!(rules[19].to_string(), "IF level == 19 THEN SHOW parameter 'p19'");

    let option = &params.get("p0").unwrap().available_options.as_ref().unwrap()[0];
    assert_eq!(option.name, "p1");
    assert_eq!(option.fields, vec!["p2"]);
}

#[test]
fn test_deep_options_chain_is_bounded() {
    let (_, rules) = canonicalize(options_chain(40));
    assert_eq!(rules.len(), seiri::params::MAX_NESTING_DEPTH + 1);
}

#[test]
fn test_grouping_option_rules_are_collected_once() {
    let (params, rules) = canonicalize(json!([{
        "name": "outer",
        "type": "fixedCollection",
        "options": [{
            "name": "group",
            "type": "collection",
            "values": [
                {"name": "inner", "displayOptions": {"show": {"mode": ["advanced"]}}}
            ]
        }]
    }]));

    let rendered: Vec<String> = rules.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["IF mode == 'advanced' THEN SHOW parameter 'inner'"]);
    let group = &params.get("outer").unwrap().available_options.as_ref().unwrap()[0];
    assert_eq!(group.fields, vec!["inner"]);
}

#[test]
fn test_existing_hint_is_kept() {
    let (params, _) = canonicalize(json!([{"name": "token", "ai_hint": "Use the bot token."}]));
    assert_eq!(params.get("token").unwrap().natural_language_hint, "Use the bot token.");
}

#[test]
fn test_hint_heuristics() {
    assert_eq!(synthesize_hint("token", &fragment(json!({"type": "string"}))), SENSITIVE_HINT);
    assert_eq!(synthesize_hint("isActive", &fragment(json!({"type": "boolean"}))), BOOLEAN_HINT);
    assert_eq!(synthesize_hint("method", &fragment(json!({}))), METHOD_HINT);
    assert_eq!(
        synthesize_hint("authUrl", &fragment(json!({"type": "string"}))),
        format!("{} {}", URL_HINT, SENSITIVE_HINT)
    );
    assert_eq!(
        synthesize_hint("operation", &fragment(json!({"type": "options", "options": [{"name": "Get"}]}))),
        METHOD_HINT
    );
    // An options type with an empty list is not treated as a verb choice.
    assert_eq!(synthesize_hint("operation", &fragment(json!({"type": "options", "options": []}))), "");
}

#[test]
fn test_hint_fallbacks() {
    assert_eq!(
        synthesize_hint("limit", &fragment(json!({"note": "Up to 100"}))),
        "Up to 100"
    );
    assert_eq!(synthesize_hint("count", &fragment(json!({"type": "number"}))), "");
}

#[test]
fn test_hint_is_deterministic() {
    let raw = fragment(json!({"type": "fixedCollection", "options": [{"name": "x"}]}));
    assert_eq!(synthesize_hint("hasUrl", &raw), synthesize_hint("hasUrl", &raw));
}
