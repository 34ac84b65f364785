//! The optional classification boundary.
//!
//! A [`Classifier`] turns a compact description of a node into an IDS manifest: the
//! node's role in a data flow plus its input and output contracts. The pipeline treats
//! any failure here as "no manifest for this node" and carries on.

use crate::error::ClassifyError;
use crate::node::NormalizedNode;
use crate::params::ParameterSpec;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[cfg(feature = "gemini")]
pub mod gemini;

/// Where a node sits in a data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Trigger,
    Processor,
    Sink,
    Logic,
    Action,
    Source,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Trigger,
        Role::Processor,
        Role::Sink,
        Role::Logic,
        Role::Action,
        Role::Source,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Trigger => "trigger",
            Role::Processor => "processor",
            Role::Sink => "sink",
            Role::Logic => "logic",
            Role::Action => "action",
            Role::Source => "source",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| ClassifyError::UnknownRole(s.to_string()))
    }
}

/// A manifest as returned by the classifier. Its content is kept verbatim; only the
/// `role` field is checked against the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IdsManifest(Map<String, Value>);

impl IdsManifest {
    pub fn from_map(map: Map<String, Value>) -> Result<Self, ClassifyError> {
        let role = map
            .get("role")
            .and_then(Value::as_str)
            .ok_or(ClassifyError::MissingRole)?;
        role.parse::<Role>()?;
        Ok(Self(map))
    }

    pub fn role(&self) -> Option<Role> {
        self.0
            .get("role")
            .and_then(Value::as_str)
            .and_then(|role| role.parse().ok())
    }

    /// The preferred upstream data path, if the manifest names one.
    pub fn golden_path(&self) -> Option<&str> {
        self.0
            .get("input_contract")
            .and_then(|contract| contract.get("golden_path"))
            .and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// The payload sent to a classifier: a node's name, description and its first few
/// parameters.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRequest {
    pub node_name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ClassificationRequest {
    /// Builds a request from `node`, keeping at most `max_parameters` parameters.
    pub fn from_node(node: &NormalizedNode, max_parameters: usize) -> Self {
        Self {
            node_name: node.display_name().to_string(),
            description: node.semantic_context.clone(),
            parameters: node.parameters.iter().take(max_parameters).cloned().collect(),
        }
    }
}

/// A collaborator that can annotate a node with an IDS manifest.
pub trait Classifier {
    fn classify(&self, request: &ClassificationRequest) -> Result<IdsManifest, ClassifyError>;
}

fn fenced_re() -> &'static Regex {
    static FENCED_RE: OnceLock<Regex> = OnceLock::new();
    FENCED_RE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*(.*?)\s*```").expect("valid fenced block regex")
    })
}

/// Strips markdown fences or surrounding prose from a model response, leaving the JSON.
pub fn unwrap_markup(raw: &str) -> &str {
    let raw = raw.trim();
    if let Some(inner) = fenced_re().captures(raw).and_then(|c| c.get(1)) {
        return inner.as_str();
    }
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}

/// Parses a classifier response into a manifest.
///
/// The response must be a JSON object (optionally wrapped in a fenced code block) whose
/// `ids_manifest` field is an object with a known `role`.
pub fn parse_manifest_response(raw: &str) -> Result<IdsManifest, ClassifyError> {
    let body = unwrap_markup(raw);
    if body.is_empty() {
        return Err(ClassifyError::EmptyResponse);
    }
    let parsed: Value =
        serde_json::from_str(body).map_err(|e| ClassifyError::InvalidJson(e.to_string()))?;
    match parsed.get("ids_manifest") {
        Some(Value::Object(manifest)) => IdsManifest::from_map(manifest.clone()),
        _ => Err(ClassifyError::MissingManifest),
    }
}
