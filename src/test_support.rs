//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError};

/// Replies with a fixed text and records every history it was sent.
pub struct ScriptedProvider {
    reply: Result<String, String>,
    pub seen: Mutex<Vec<(Vec<Message>, f32)>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.messages.to_vec(), request.temperature));
        self.reply.clone().map_err(ProviderError::Network)
    }
}

/// Creates a test App with a provider that always answers "ok".
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(ScriptedProvider::replying("ok")),
        "test-model".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_provider_records_history() {
        let provider = ScriptedProvider::failing("boom");
        let history = vec![Message::system("sys"), Message::user("hi")];
        let result = tokio_test::block_on(provider.complete(CompletionRequest {
            messages: &history,
            model: "m",
            temperature: 0.3,
        }));

        assert_eq!(result.unwrap_err().to_string(), "network error: boom");
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, history);
    }
}
