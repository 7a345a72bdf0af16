//! Mock LLM provider for tests and offline runs.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use pravah_core::{AppError, AppResult};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// Scripted in-process client.
///
/// Replies queued with [`MockClient::with_response`] / [`MockClient::with_failure`]
/// are returned in order. Once the queue is empty the client synthesizes a
/// minimal object conforming to the request's response schema (first enum
/// value, placeholder strings, zero numbers), or fails when no schema was
/// given. Every request is recorded for inspection.
#[derive(Debug, Default)]
pub struct MockClient {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw model text.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queue a JSON value as model text.
    pub fn with_json(self, value: Value) -> Self {
        self.with_response(value.to_string())
    }

    /// Queue a transport-level failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Failure(message.into()));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn push(&self, reply: MockReply) {
        if let Ok(mut queue) = self.replies.lock() {
            queue.push_back(reply);
        }
    }

    fn next_reply(&self) -> Option<MockReply> {
        self.replies.lock().ok().and_then(|mut q| q.pop_front())
    }
}

/// Build the smallest value that satisfies a JSON-Schema fragment.
fn synthesize(schema: &Value) -> Value {
    if let Some(first) = schema
        .get("enum")
        .and_then(Value::as_array)
        .and_then(|values| values.first())
    {
        return first.clone();
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("object") => {
            let mut out = Map::new();
            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                for (name, prop) in props {
                    out.insert(name.clone(), synthesize(prop));
                }
            }
            Value::Object(out)
        }
        Some("array") => Value::Array(Vec::new()),
        Some("number") | Some("integer") => {
            let min = schema.get("minimum").and_then(Value::as_f64).unwrap_or(0.0);
            serde_json::json!(min.max(0.0) as i64)
        }
        Some("boolean") => Value::Bool(false),
        _ => Value::String("mock response".to_string()),
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!("Mock completion for model {}", request.model);

        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        let content = match self.next_reply() {
            Some(MockReply::Text(text)) => text,
            Some(MockReply::Failure(message)) => return Err(AppError::RemoteCall(message)),
            None => match request.response_schema {
                Some(ref schema) => synthesize(schema).to_string(),
                None => {
                    return Err(AppError::RemoteCall(
                        "Mock client has no scripted response".to_string(),
                    ))
                }
            },
        };

        let completion_tokens = content.split_whitespace().count() as u32;
        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(request.prompt.split_whitespace().count() as u32, completion_tokens),
            done: true,
        })
    }
}
