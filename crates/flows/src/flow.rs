//! Generic prompt flow: validate, render, call once, validate, decode.

use crate::extract::extract_json;
use pravah_core::{AppError, AppResult};
use pravah_llm::{LlmClient, LlmRequest};
use pravah_prompt::{
    build_prompt, describe_violations, find_override, BuiltPrompt, ObjectSchema, PromptDefinition,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use tracing::Instrument;

/// Explicit handle to the remote prompt-execution service.
///
/// Cheap to clone; shared by concurrent flow invocations.
#[derive(Clone)]
pub struct FlowContext {
    pub client: Arc<dyn LlmClient>,
    pub model: String,
}

impl FlowContext {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl std::fmt::Debug for FlowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowContext")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .finish()
    }
}

/// A named flow typed by its request and result values.
#[derive(Debug, Clone)]
pub struct Flow<I, O> {
    definition: PromptDefinition,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> Flow<I, O>
where
    I: Serialize,
    O: DeserializeOwned,
{
    pub fn new(definition: PromptDefinition) -> Self {
        Self {
            definition,
            _types: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &PromptDefinition {
        &self.definition
    }

    /// Swap in `.pravah/prompts/<name>.yml` if the workspace has one.
    ///
    /// The override may change wording, system text and sampling config.
    /// Its contracts must match this flow's field for field; the built-in
    /// contracts (with their bounds) stay in force either way.
    pub fn with_workspace_override(self, workspace: &Path) -> AppResult<Self> {
        let Some(candidate) = find_override(workspace, &self.definition.name)? else {
            return Ok(self);
        };

        if !candidate.input.is_compatible_with(&self.definition.input)
            || !candidate.output.is_compatible_with(&self.definition.output)
        {
            return Err(AppError::Prompt(format!(
                "Override for '{}' changes its input or output contract",
                self.definition.name
            )));
        }

        tracing::info!(flow = %self.definition.name, "Using workspace prompt override");
        Ok(Self::new(PromptDefinition {
            input: self.definition.input,
            output: self.definition.output,
            ..candidate
        }))
    }

    /// Check the request against the input contract.
    pub fn validate_input(&self, input: &I) -> AppResult<Value> {
        let value = serde_json::to_value(input)?;
        self.definition.input.validate(&value).map_err(|violations| {
            AppError::InvalidInput(format!(
                "{}: {}",
                self.definition.name,
                describe_violations(&violations)
            ))
        })?;
        Ok(value)
    }

    /// Validate and render the request into prompt text.
    pub fn render(&self, input: &I) -> AppResult<BuiltPrompt> {
        let bindings = self.validate_input(input)?;
        build_prompt(&self.definition, &bindings)
    }

    /// Decode raw model text into the typed result.
    pub fn parse_output(&self, raw: &str) -> AppResult<O> {
        let name = &self.definition.name;
        let value = extract_json(raw)
            .map_err(|e| AppError::UnparsableOutput(format!("{}: {}", name, e)))?;

        self.definition.output.validate(&value).map_err(|violations| {
            AppError::UnparsableOutput(format!("{}: {}", name, describe_violations(&violations)))
        })?;

        serde_json::from_value(value)
            .map_err(|e| AppError::UnparsableOutput(format!("{}: {}", name, e)))
    }

    /// Run the flow once against the remote service.
    ///
    /// Invalid input fails before any network traffic. There is no retry.
    pub async fn run(&self, ctx: &FlowContext, input: &I) -> AppResult<O> {
        let span = tracing::info_span!(
            "flow",
            name = %self.definition.name,
            provider = ctx.client.provider_name()
        );

        async {
            let built = self.render(input)?;
            let request = self.to_request(built, &ctx.model);

            tracing::debug!(prompt_len = request.prompt.len(), "Invoking model");
            let response = ctx.client.complete(&request).await.map_err(|e| {
                tracing::warn!("Remote call failed: {}", e);
                e
            })?;

            let output = self.parse_output(&response.content).map_err(|e| {
                tracing::warn!("{}", e);
                e
            })?;

            tracing::info!(
                total_tokens = response.usage.total_tokens,
                "Flow completed"
            );
            Ok(output)
        }
        .instrument(span)
        .await
    }

    fn to_request(&self, built: BuiltPrompt, model: &str) -> LlmRequest {
        let schema = self.definition.output.to_json_schema();
        let prompt = format!(
            "{}\n\n{}",
            built.user.trim_end(),
            output_instructions(&self.definition.output)
        );

        let mut request = LlmRequest::new(prompt, model).with_response_schema(schema);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(temperature) = self.definition.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.definition.config.max_output_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }
}

/// Format instructions appended to every rendered prompt.
pub fn output_instructions(output: &ObjectSchema) -> String {
    let schema = serde_json::to_string_pretty(&output.to_json_schema())
        .unwrap_or_else(|_| "{}".to_string());
    format!(
        "Output should be a single JSON object that conforms to the following schema. \
         Do not add any text outside the JSON.\n```json\n{}\n```",
        schema
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pravah_llm::MockClient;
    use pravah_prompt::{FieldSpec, ModelConfig};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct EchoIn {
        text: String,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct EchoOut {
        echo: String,
    }

    fn echo_flow() -> Flow<EchoIn, EchoOut> {
        Flow::new(PromptDefinition {
            name: "echo".to_string(),
            description: String::new(),
            input: ObjectSchema::new(vec![FieldSpec::string("text").non_empty()]),
            output: ObjectSchema::new(vec![FieldSpec::string("echo")]),
            system: Some("Repeat the user".to_string()),
            template: "Say: {{{text}}}".to_string(),
            config: ModelConfig {
                temperature: Some(0.1),
                max_output_tokens: None,
            },
        })
    }

    #[tokio::test]
    async fn test_run_round_trip() {
        let mock = Arc::new(MockClient::new().with_json(json!({"echo": "hi"})));
        let ctx = FlowContext::new(mock.clone(), "test-model");

        let out = echo_flow()
            .run(&ctx, &EchoIn { text: "hi".into() })
            .await
            .unwrap();
        assert_eq!(out, EchoOut { echo: "hi".into() });

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.starts_with("Say: hi"));
        assert!(requests[0].prompt.contains("conforms to the following schema"));
        assert_eq!(requests[0].system.as_deref(), Some("Repeat the user"));
        assert_eq!(requests[0].temperature, Some(0.1));
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].response_schema.as_ref().unwrap()["required"], json!(["echo"]));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_client() {
        let mock = Arc::new(MockClient::new().with_json(json!({"echo": "x"})));
        let ctx = FlowContext::new(mock.clone(), "m");

        let result = echo_flow().run(&ctx, &EchoIn { text: "".into() }).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let ctx = FlowContext::new(Arc::new(MockClient::new().with_failure("connection refused")), "m");
        let result = echo_flow().run(&ctx, &EchoIn { text: "x".into() }).await;
        assert!(matches!(result, Err(AppError::RemoteCall(msg)) if msg == "connection refused"));
    }

    /// Answer the next HTTP request on a loopback port with a 503.
    async fn unavailable_endpoint() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let body = "service unavailable";
            let response = format!(
                "HTTP/1.1 503 Service Unavailable\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_error_status_surfaces_as_remote_call() {
        let client = pravah_llm::OllamaClient::with_base_url(unavailable_endpoint().await);
        let ctx = FlowContext::new(Arc::new(client), "llama3.2");

        let result = echo_flow().run(&ctx, &EchoIn { text: "x".into() }).await;
        match result {
            Err(AppError::RemoteCall(msg)) => assert!(msg.contains("503")),
            Err(AppError::UnparsableOutput(msg)) => panic!("status error misreported as output: {}", msg),
            other => panic!("expected remote call error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_output_rejects_wrong_type() {
        let err = echo_flow().parse_output(r#"{"echo": 5}"#).unwrap_err();
        assert!(matches!(err, AppError::UnparsableOutput(msg) if msg.contains("echo")));
    }

    #[test]
    fn test_override_with_changed_contract_is_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path().join(".pravah/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("echo.yml"),
            r#"
name: echo
input:
  - name: text
    type: string
output:
  - name: reply
    type: string
template: "Repeat: {{{text}}}"
"#,
        )
        .unwrap();

        let result = echo_flow().with_workspace_override(temp_dir.path());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_override_with_matching_contract_replaces_template() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path().join(".pravah/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("echo.yml"),
            r#"
name: echo
input:
  - name: text
    type: string
    description: Text to repeat
output:
  - name: echo
    type: string
template: "Repeat exactly: {{{text}}}"
"#,
        )
        .unwrap();

        let flow = echo_flow().with_workspace_override(temp_dir.path()).unwrap();
        let built = flow.render(&EchoIn { text: "ok".into() }).unwrap();
        assert_eq!(built.user, "Repeat exactly: ok");
        assert!(flow.render(&EchoIn { text: " ".into() }).is_err());
    }

    #[test]
    fn test_no_override_keeps_builtin() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let flow = echo_flow().with_workspace_override(temp_dir.path()).unwrap();
        assert_eq!(flow.definition().template, "Say: {{{text}}}");
    }
}
