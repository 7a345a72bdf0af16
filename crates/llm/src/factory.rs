//! LLM provider factory.
//!
//! Builds a shared client handle from a provider name plus the endpoint,
//! secret and timeout resolved from configuration.

use crate::client::LlmClient;
use crate::providers::{gemini::DEFAULT_GEMINI_URL, ollama::DEFAULT_OLLAMA_URL};
use crate::providers::{GeminiClient, MockClient, OllamaClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required by Gemini)
/// * `timeout` - Optional per-request transport timeout
///
/// # Errors
/// Returns error if the provider is unknown, a required secret is missing,
/// or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    tracing::debug!(provider = provider_type.as_str(), ?endpoint, ?timeout, "Creating LLM client");

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            match timeout {
                Some(timeout) => OllamaClient::with_timeout(base_url, timeout)
                    .map(|client| Arc::new(client) as Arc<dyn LlmClient>)
                    .map_err(|e| e.to_string()),
                None => Ok(Arc::new(OllamaClient::with_base_url(base_url))),
            }
        }
        ProviderType::Gemini => {
            let api_key = api_key.ok_or_else(|| "Gemini provider requires API key".to_string())?;
            let base_url = endpoint.unwrap_or(DEFAULT_GEMINI_URL);
            GeminiClient::with_base_url(base_url, api_key, timeout)
                .map(|client| Arc::new(client) as Arc<dyn LlmClient>)
                .map_err(|e| e.to_string())
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::new())),
    }
}
