//! LM Studio provider using the OpenAI-compatible `/chat/completions` endpoint.
//!
//! No auth for local LM Studio. Streaming is disabled; the reply is read
//! from `choices[0].message.content`.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError};

pub const DEFAULT_LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct CompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<InputMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct CompletionsResponse {
    choices: Vec<Choice>,
}

fn to_input(messages: &[Message]) -> Vec<InputMessage<'_>> {
    messages
        .iter()
        .map(|m| InputMessage {
            role: m.role.as_str(),
            content: &m.text,
        })
        .collect()
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// LM Studio (or any OpenAI-compatible local inference server)
pub struct LmStudioProvider {
    base_url: String,
    client: reqwest::Client,
}

impl LmStudioProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for LmStudioProvider {
    fn default() -> Self {
        Self::new(DEFAULT_LMSTUDIO_BASE_URL)
    }
}

#[async_trait]
impl CompletionProvider for LmStudioProvider {
    fn name(&self) -> &str {
        "lmstudio"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = CompletionsRequest {
            model: request.model,
            messages: to_input(request.messages),
            temperature: request.clamped_temperature(),
            stream: false,
        };

        info!(
            "LM Studio completions request: model={}, message_count={}, temperature={}",
            request.model,
            body.messages.len(),
            body.temperature
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("LM Studio response status: {}", response.status());

        if !response.status().is_success() {
            return Err(super::api_error("LM Studio", response).await);
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: CompletionsResponse = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Parse("response had no choices".into()))?
            .message
            .content
            .unwrap_or_default();

        info!("LM Studio reply received: {} bytes", content.len());
        Ok(content)
    }
}
