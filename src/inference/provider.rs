use std::fmt;

use async_trait::async_trait;

use super::types::Message;

/// Errors that can occur while asking a provider for a reply.
///
/// None of these are fatal: the controller turns them into an
/// `"Error: ..."` assistant message so the turn is never lost.
#[derive(Debug)]
pub enum ProviderError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Service answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body did not have the expected shape.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to produce one reply.
///
/// `messages` is the full ordered history, sentinel included; no
/// server-side session state is assumed.
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub model: &'a str,
    pub temperature: f32,
}

impl CompletionRequest<'_> {
    /// Temperature clamped to the range generation services accept here.
    pub fn clamped_temperature(&self) -> f32 {
        if self.temperature.is_nan() {
            return 0.0;
        }
        self.temperature.clamp(0.0, 1.0)
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one non-streaming request and returns the generated text.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}
