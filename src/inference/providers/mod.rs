mod lmstudio;
mod ollama;

pub use lmstudio::{DEFAULT_LMSTUDIO_BASE_URL, LmStudioProvider};
pub use ollama::{DEFAULT_OLLAMA_BASE_URL, OllamaProvider};

use log::warn;

use crate::inference::ProviderError;

/// Reads the body of a non-success response and turns it into `ProviderError::Api`.
async fn api_error(service: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("{} API error: {} - {}", service, status, message);
    ProviderError::Api { status, message }
}
