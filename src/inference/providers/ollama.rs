//! Ollama provider using the `/api/chat` endpoint.
//!
//! One non-streaming request per turn; the whole history is resent each time
//! and sampling options ride along in `options`.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

// ============================================================================
// Ollama Chat API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct Options {
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    message: ReplyMessage,
}

fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
    messages
        .iter()
        .map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.text,
        })
        .collect()
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Local Ollama server.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_BASE_URL)
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: request.model,
            messages: to_chat_messages(request.messages),
            stream: false,
            options: Options {
                temperature: request.clamped_temperature(),
            },
        };

        info!(
            "Ollama chat request: model={}, message_count={}, temperature={}",
            request.model,
            body.messages.len(),
            body.options.temperature
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Ollama response status: {}", response.status());

        if !response.status().is_success() {
            return Err(super::api_error("Ollama", response).await);
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        info!(
            "Ollama reply received: {} bytes",
            parsed.message.content.len()
        );
        Ok(parsed.message.content)
    }
}
