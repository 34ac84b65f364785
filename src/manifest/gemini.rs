//! Google Gemini classifier.
//!
//! Sends one `generateContent` request per node and parses the returned text with
//! [`parse_manifest_response`]. Calls are blocking; pacing between calls is the
//! pipeline's job.

use super::{ClassificationRequest, Classifier, IdsManifest, parse_manifest_response};
use crate::error::ClassifyError;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Connection settings for [`GeminiClassifier`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub temperature: Option<f32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 60,
            temperature: Some(0.1),
        }
    }
}

impl GeminiConfig {
    /// Reads `GEMINI_API_KEY` and, optionally, `GEMINI_MODEL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.api_key = key;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        config
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

/// Classifies nodes by asking a Gemini model for an IDS manifest.
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClassifier {
    pub fn new(config: GeminiConfig) -> Result<Self, ClassifyError> {
        if config.api_key.trim().is_empty() {
            return Err(ClassifyError::AuthenticationError);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClassifyError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_prompt(&self, request: &ClassificationRequest) -> Result<String, ClassifyError> {
        let node_json = serde_json::to_string_pretty(request)
            .map_err(|e| ClassifyError::InvalidJson(e.to_string()))?;
        Ok(format!(
            r#"You annotate workflow-automation node definitions for an AI workflow builder.

Classify the node below and describe its data-flow contract inside the IDS envelope.

ROLE VOCABULARY (pick exactly one):
- trigger: starts a workflow (webhooks, schedules, polling)
- source: reads data from an external system
- processor: transforms items passing through
- logic: routes, merges or filters items
- action: performs a side effect in an external system
- sink: final destination that consumes items

RESPONSE FORMAT - respond ONLY with JSON of this shape:
{{
  "ids_manifest": {{
    "role": "<role>",
    "input_contract": {{
      "golden_path": "<preferred upstream data path, e.g. $json.data>",
      "accepts_binary": false
    }},
    "output_contract": {{
      "transformation_logic": "<what the node does to its input>"
    }}
  }}
}}

NODE:
{}"#,
            node_json
        ))
    }

    fn send(&self, prompt: String) -> Result<String, ClassifyError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json",
            }),
        };
        let url = format!("{}/{}:generateContent", self.config.base_url, self.config.model);
        debug!("Sending classification request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| ClassifyError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ClassifyError::Http(e.to_string()))?;
        debug!("Gemini responded with status {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClassifyError::RateLimited);
        }
        if !status.is_success() {
            return Err(ClassifyError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| ClassifyError::InvalidJson(e.to_string()))?;
        if let Some(usage) = &parsed.usage_metadata {
            info!(
                "Gemini usage - prompt: {:?} tokens, response: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        extract_text(parsed)
    }
}

fn extract_text(response: GeminiResponse) -> Result<String, ClassifyError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(ClassifyError::EmptyResponse)
    } else {
        Ok(text)
    }
}

impl Classifier for GeminiClassifier {
    fn classify(&self, request: &ClassificationRequest) -> Result<IdsManifest, ClassifyError> {
        let prompt = self.build_prompt(request)?;
        let raw = self.send(prompt)?;
        parse_manifest_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_classifier_creation() {
        assert!(GeminiClassifier::new(create_test_config()).is_ok());
    }

    #[test]
    fn test_classifier_rejects_empty_api_key() {
        let config = GeminiConfig {
            api_key: "  ".to_string(),
            ..GeminiConfig::default()
        };
        assert!(matches!(
            GeminiClassifier::new(config).err(),
            Some(ClassifyError::AuthenticationError)
        ));
    }

    #[test]
    fn test_prompt_carries_node_and_vocabulary() {
        let classifier = GeminiClassifier::new(create_test_config()).unwrap();
        let request = ClassificationRequest {
            node_name: "Slack".to_string(),
            description: "Consume the Slack API".to_string(),
            parameters: vec![],
        };
        let prompt = classifier.build_prompt(&request).unwrap();
        assert!(prompt.contains("\"node_name\": \"Slack\""));
        assert!(prompt.contains("ids_manifest"));
        for role in ["trigger", "processor", "sink", "logic", "action", "source"] {
            assert!(prompt.contains(role), "missing role {}", role);
        }
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(extract_text(response), Err(ClassifyError::EmptyResponse)));
    }
}
