//! Command handlers for the Pravah CLI.
//!
//! One submodule per flow, plus prompt inspection.

pub mod categorize;
pub mod insights;
pub mod prompts;
pub mod summarize;

pub use categorize::CategorizeCommand;
pub use insights::InsightsCommand;
pub use prompts::PromptsCommand;
pub use summarize::SummarizeCommand;

use pravah_core::{config::AppConfig, AppError, AppResult};
use pravah_flows::FlowContext;
use pravah_llm::create_client;
use std::path::Path;
use std::time::Duration;

/// Build the client handle every flow command runs against.
pub fn flow_context(config: &AppConfig) -> AppResult<FlowContext> {
    config.validate()?;

    let endpoint = config.endpoint();
    let api_key = config.resolve_api_key(&config.provider);
    let timeout = config.timeout_secs().map(Duration::from_secs);

    let client = create_client(
        &config.provider,
        endpoint.as_deref(),
        api_key.as_deref(),
        timeout,
    )
    .map_err(AppError::Config)?;

    tracing::debug!(provider = %config.provider, model = %config.model, "Flow context ready");
    Ok(FlowContext::new(client, config.model.clone()))
}

/// Read free text from a positional argument or a file.
pub fn read_text(inline: Option<&str>, file: Option<&Path>, what: &str) -> AppResult<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            AppError::InvalidInput(format!("Failed to read {} from {:?}: {}", what, path, e))
        }),
        (None, None) => Err(AppError::InvalidInput(format!("No {} provided", what))),
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
