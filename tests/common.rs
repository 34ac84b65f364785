//! Common test utilities: raw node fixtures and stub classifiers.
use seiri::prelude::*;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

/// A trimmed-down Slack node in the "parameters" convention.
#[allow(dead_code)]
pub fn create_slack_node() -> Value {
    json!({
        "name": "Slack",
        "parameters": [
            { "name": "token", "type": "string" }
        ]
    })
}

/// An HTTP-style node in the "properties" convention with a resource/operation pair,
/// a fixedCollection and node-level visibility.
///
/// Rules, in discovery order:
/// `IF mode == 'test' THEN SHOW parameter 'HTTP Request'` (node level),
/// `IF resource == 'item' THEN SHOW parameter 'operation'`,
/// `IF resource == 'item' AND operation IN ["create", "update"] THEN SHOW parameter 'body'`,
/// `IF operation == 'getAll' THEN HIDE parameter 'headerValue'` (inside the collection).
#[allow(dead_code)]
pub fn create_http_node() -> Value {
    json!({
        "displayName": "HTTP Request",
        "name": "HTTP Request",
        "version": [1, 2, 3.1],
        "description": "Makes an <b>HTTP</b> request.<br>See <a href=\"https://docs.example.com\">docs</a>.",
        "displayOptions": { "show": { "mode": ["test"] } },
        "properties": [
            {
                "displayName": "Resource",
                "name": "resource",
                "type": "options",
                "default": "item",
                "options": [
                    { "name": "Item", "value": "item", "description": "An <code>item</code> record" },
                    { "name": "List", "value": "list" }
                ]
            },
            {
                "displayName": "Operation",
                "name": "operation",
                "type": "options",
                "displayOptions": { "show": { "resource": ["item"] } },
                "options": [
                    { "name": "Create", "value": "create" },
                    { "name": "Update", "value": "update" },
                    { "name": "Get All", "value": "getAll" }
                ],
                "default": "create"
            },
            {
                "displayName": "URL",
                "name": "url",
                "type": "string",
                "required": true,
                "default": "",
                "description": "The URL to call"
            },
            {
                "displayName": "Body",
                "name": "body",
                "type": "json",
                "displayOptions": {
                    "show": { "resource": ["item"], "operation": ["create", "update"] }
                }
            },
            {
                "displayName": "Headers",
                "name": "headers",
                "type": "fixedCollection",
                "default": {},
                "options": [
                    {
                        "displayName": "Header",
                        "name": "header",
                        "values": [
                            { "displayName": "Name", "name": "headerName", "type": "string" },
                            {
                                "displayName": "Value",
                                "name": "headerValue",
                                "type": "string",
                                "displayOptions": { "hide": { "operation": ["getAll"] } }
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

/// A manifest response the way models like to return it: inside a fenced block.
#[allow(dead_code)]
pub const FENCED_ACTION_RESPONSE: &str = "```json\n{\"ids_manifest\": {\"role\": \"action\"}}\n```";

/// Answers every request with the same raw response text.
#[allow(dead_code)]
pub struct CannedClassifier {
    pub response: String,
}

impl Classifier for CannedClassifier {
    fn classify(&self, _request: &ClassificationRequest) -> std::result::Result<IdsManifest, ClassifyError> {
        parse_manifest_response(&self.response)
    }
}

/// Always fails, as an unreachable service would.
#[allow(dead_code)]
pub struct UnreachableClassifier;

impl Classifier for UnreachableClassifier {
    fn classify(&self, _request: &ClassificationRequest) -> std::result::Result<IdsManifest, ClassifyError> {
        Err(ClassifyError::Http("connection refused".to_string()))
    }
}

/// Records every request and answers with a fixed role.
#[allow(dead_code)]
pub struct RecordingClassifier {
    pub requests: Rc<RefCell<Vec<ClassificationRequest>>>,
}

impl Classifier for RecordingClassifier {
    fn classify(&self, request: &ClassificationRequest) -> std::result::Result<IdsManifest, ClassifyError> {
        self.requests.borrow_mut().push(request.clone());
        parse_manifest_response(r#"{"ids_manifest": {"role": "processor", "input_contract": {"golden_path": "$json.data"}}}"#)
    }
}
