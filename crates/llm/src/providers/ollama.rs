//! Ollama LLM provider implementation.
//!
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md
//! Structured output is requested by passing the JSON-Schema in `format`.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use pravah_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client against the default local endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose every request is bounded by `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn to_ollama_request(&self, request: &LlmRequest) -> OllamaRequest {
        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            format: request.response_schema.clone(),
            options,
            stream: false,
        }
    }

    fn convert_response(&self, response: OllamaResponse) -> LlmResponse {
        let usage = LlmUsage::new(
            response.prompt_eval_count.unwrap_or(0),
            response.eval_count.unwrap_or(0),
        );

        LlmResponse {
            content: response.response,
            model: response.model,
            usage,
            done: response.done,
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending completion request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::RemoteCall(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::RemoteCall(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::RemoteCall(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::info!("Received completion from Ollama");
        tracing::debug!("Response: {:?}", ollama_response);

        Ok(self.convert_response(ollama_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::serve_once;
    use serde_json::json;

    #[test]
    fn test_ollama_client_creation() {
        let client = OllamaClient::new();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = OllamaClient::with_base_url("http://ollama:11434/");
        assert_eq!(client.base_url, "http://ollama:11434");
    }

    #[test]
    fn test_ollama_request_conversion() {
        let client = OllamaClient::new();
        let schema = json!({"type": "object", "properties": {"summary": {"type": "string"}}});
        let request = LlmRequest::new("Hello", "llama3.2")
            .with_temperature(0.7)
            .with_max_tokens(100)
            .with_response_schema(schema.clone());

        let ollama_req = client.to_ollama_request(&request);
        assert_eq!(ollama_req.model, "llama3.2");
        assert_eq!(ollama_req.prompt, "Hello");
        assert_eq!(ollama_req.format, Some(schema));
        assert!(!ollama_req.stream);
        assert_eq!(
            ollama_req.options,
            Some(OllamaOptions {
                temperature: Some(0.7),
                num_predict: Some(100),
            })
        );
    }

    #[test]
    fn test_request_without_sampling_omits_options() {
        let client = OllamaClient::new();
        let body = serde_json::to_value(client.to_ollama_request(&LlmRequest::new("Hi", "m")))
            .unwrap();
        assert!(body.get("options").is_none());
        assert!(body.get("format").is_none());
        assert_eq!(body["stream"], json!(false));
    }

    #[test]
    fn test_convert_response_usage() {
        let client = OllamaClient::new();
        let raw: OllamaResponse = serde_json::from_value(json!({
            "model": "llama3.2",
            "response": "{\"category\":\"traffic\"}",
            "done": true,
            "prompt_eval_count": 20,
            "eval_count": 5
        }))
        .unwrap();

        let response = client.convert_response(raw);
        assert_eq!(response.content, "{\"category\":\"traffic\"}");
        assert_eq!(response.usage.total_tokens, 25);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_remote_call_error() {
        let client = OllamaClient::with_base_url("http://127.0.0.1:9");
        let result = client.complete(&LlmRequest::new("Hi", "llama3.2")).await;
        assert!(matches!(result, Err(AppError::RemoteCall(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_remote_call_error() {
        let url = serve_once("503 Service Unavailable", r#"{"error":"model is loading"}"#).await;
        let client = OllamaClient::with_base_url(url);

        match client.complete(&LlmRequest::new("Hi", "llama3.2")).await {
            Err(AppError::RemoteCall(msg)) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("model is loading"));
            }
            other => panic!("expected remote call error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_envelope_is_remote_call_error() {
        let url = serve_once("200 OK", "<html>proxy login</html>").await;
        let client = OllamaClient::with_base_url(url);

        let result = client.complete(&LlmRequest::new("Hi", "llama3.2")).await;
        assert!(matches!(result, Err(AppError::RemoteCall(_))));
    }

    #[tokio::test]
    async fn test_successful_round_trip() {
        let url = serve_once(
            "200 OK",
            r#"{"model":"llama3.2","response":"{\"category\":\"mood\"}","done":true}"#,
        )
        .await;
        let client = OllamaClient::with_base_url(url);

        let response = client.complete(&LlmRequest::new("Hi", "llama3.2")).await.unwrap();
        assert_eq!(response.content, r#"{"category":"mood"}"#);
        assert!(response.done);
    }
}
