use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::{AnnotationError, ArticleAnnotation};
use super::{Annotator, SYSTEM_PROMPT, build_article_prompt};

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 2048,
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

/// Anthropic API client performing structured extraction via forced tool use
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn send_with_tool(&self, system: &str, user: &str) -> Result<AnthropicResponse, AnnotationError> {
        let tool = Tool {
            name: "submit_analysis".to_string(),
            description: "Submit the structured extraction for one article".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "Core mechanism or finding of the study, 2-4 sentences"
                    },
                    "sequencing_methods": {
                        "type": "string",
                        "description": "All sequencing or assay technologies used"
                    },
                    "tools": {
                        "type": "string",
                        "description": "All bioinformatics tools, languages and packages named"
                    },
                    "innovation": {
                        "type": "string",
                        "description": "What is methodologically or mechanistically new"
                    }
                },
                "required": ["summary", "sequencing_methods", "tools", "innovation"]
            }),
        };

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            tools: vec![tool],
            tool_choice: Some(ToolChoice {
                choice_type: "tool".to_string(),
                name: "submit_analysis".to_string(),
            }),
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnnotationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnnotationError::Transport(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AnnotationError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Annotator for AnthropicClient {
    async fn annotate(
        &self,
        title: &str,
        abstract_text: &str,
    ) -> Result<ArticleAnnotation, AnnotationError> {
        let prompt = build_article_prompt(title, abstract_text);
        let response = self.send_with_tool(SYSTEM_PROMPT, &prompt).await?;
        parse_annotation(&response)
    }
}

/// Extract the annotation from the submit_analysis tool_use block.
///
/// Individual fields missing from the tool input fall back to their
/// per-field defaults; only a reply with no usable tool_use block at all
/// counts as malformed.
fn parse_annotation(response: &AnthropicResponse) -> Result<ArticleAnnotation, AnnotationError> {
    for content in &response.content {
        if content.content_type == "tool_use"
            && content.name.as_deref() == Some("submit_analysis")
        {
            if let Some(input) = &content.input {
                return serde_json::from_value(input.clone())
                    .map_err(|e| AnnotationError::MalformedResponse(e.to_string()));
            }
        }
    }

    Err(AnnotationError::MalformedResponse(
        "no tool_use block in reply".to_string(),
    ))
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_annotation_from_tool_use() {
        let json = r#"{
            "content": [{
                "type": "tool_use",
                "name": "submit_analysis",
                "input": {
                    "summary": "Dysbiosis drives vascular remodeling.",
                    "sequencing_methods": "16S rRNA",
                    "tools": "QIIME 2",
                    "innovation": "First longitudinal cohort."
                }
            }]
        }"#;

        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        let annotation = parse_annotation(&response).unwrap();

        assert_eq!(annotation.summary, "Dysbiosis drives vascular remodeling.");
        assert_eq!(annotation.sequencing_methods, "16S rRNA");
    }

    #[test]
    fn test_parse_annotation_partial_input_uses_field_defaults() {
        let json = r#"{
            "content": [{
                "type": "tool_use",
                "name": "submit_analysis",
                "input": {"summary": "Only a summary came back."}
            }]
        }"#;

        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        let annotation = parse_annotation(&response).unwrap();

        assert_eq!(annotation.summary, "Only a summary came back.");
        assert_eq!(annotation.tools, "not reported");
        assert_eq!(annotation.innovation, "not reported");
    }

    #[test]
    fn test_text_only_reply_is_malformed() {
        let json = r#"{"content": [{"type": "text", "text": "I cannot comply."}]}"#;

        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        let err = parse_annotation(&response).unwrap_err();

        assert!(matches!(err, AnnotationError::MalformedResponse(_)));
    }
}
