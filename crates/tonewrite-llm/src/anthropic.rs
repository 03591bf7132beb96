//! Anthropic Messages API backend

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tonewrite_core::GenerationConfig;

use crate::backend::{GenerationBackend, GenerationRequest};
use crate::error::{GenerationError, GenerationResult};

const API_VERSION: &str = "2023-06-01";

/// Backend calling `POST {api_base}/messages`.
pub struct AnthropicBackend {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    api_base: String,
}

// The API key stays out of Debug output.
impl Debug for AnthropicBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnthropicBackend")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .finish()
    }
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageParam<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Text { text: &'a str },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicBackend {
    pub fn new(config: &GenerationConfig) -> GenerationResult<Self> {
        let api_key = config
            .anthropic_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerationError::Config("ANTHROPIC_API_KEY is not set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            model: config.anthropic_model.clone(),
            max_tokens: config.anthropic_max_tokens,
            api_base: config.anthropic_api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, request: &GenerationRequest) -> GenerationResult<MessagesResponse> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![MessageParam {
                role: "user",
                content: vec![ContentBlock::Text {
                    text: &request.prompt,
                }],
            }],
        };

        let mut builder = self
            .http_client
            .post(format!("{}/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        if let Some(deadline) = request.deadline {
            builder = builder.timeout(deadline);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Backend("Anthropic API request timed out".to_string())
            } else {
                GenerationError::Backend(format!("Failed to send request to Anthropic API: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| GenerationError::Backend(format!("Failed to parse Anthropic API response: {}", e)))
    }
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        let start = Instant::now();
        tracing::debug!(
            model = %self.model,
            prompt_chars = request.prompt.chars().count(),
            deadline_secs = request.deadline.map(|d| d.as_secs()),
            "Sending prompt to Anthropic API"
        );

        let parsed = self.send(request).await?;

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        tracing::info!(
            model = %self.model,
            stop_reason = parsed.stop_reason.as_deref().unwrap_or("unknown"),
            input_tokens = parsed.usage.as_ref().map(|u| u.input_tokens),
            output_tokens = parsed.usage.as_ref().map(|u| u.output_tokens),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Anthropic API generation completed"
        );

        Ok(text)
    }
}
