//! The normalized, per-node record written to disk.

use crate::manifest::IdsManifest;
use crate::params::ParameterMap;
use crate::rules::ConditionRule;
use serde::Serialize;
use serde_json::Value;

mod normalizer;

pub use normalizer::NodeNormalizer;

/// One node definition after normalization.
///
/// Built fresh from a raw record and never changed afterwards, apart from attaching
/// the optional manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNode {
    pub node_id: Option<String>,
    pub name: Option<String>,
    pub version: i64,
    pub semantic_context: String,
    pub parameters: ParameterMap,
    pub configuration_logic: ConfigurationLogic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_json_snippet: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids_manifest: Option<IdsManifest>,
}

/// Parameter ordering and visibility rules of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationLogic {
    pub required_sequence: Vec<String>,
    pub conditional_rules: Vec<ConditionRule>,
}

impl NormalizedNode {
    /// The name used for reporting and file naming: the node name, else its id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.node_id.as_deref())
            .unwrap_or_default()
    }

    pub fn with_manifest(mut self, manifest: IdsManifest) -> Self {
        self.ids_manifest = Some(manifest);
        self
    }
}
