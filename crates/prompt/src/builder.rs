//! Prompt builder: renders Handlebars templates against flow inputs.
//!
//! Placeholders use triple-stash (`{{{field}}}`) and sequences expand with
//! `{{#each field}}...{{/each}}`, one repetition per element in order.
//! HTML escaping is off; missing placeholders render as empty strings.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use pravah_core::{AppError, AppResult};
use serde_json::Value;

/// Render a Handlebars template with JSON bindings.
///
/// # Example
/// ```
/// use pravah_prompt::render;
/// use serde_json::json;
///
/// let text = render(
///     "{{#each reports}}- {{{this}}}\n{{/each}}",
///     &json!({"reports": ["A", "B"]}),
/// ).unwrap();
/// assert_eq!(text, "- A\n- B\n");
/// ```
pub fn render(template: &str, bindings: &Value) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", bindings)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Check that a template parses without rendering it.
pub fn check_template(template: &str) -> AppResult<()> {
    handlebars::Template::compile(template)
        .map(|_| ())
        .map_err(|e| AppError::Prompt(format!("Invalid template: {}", e)))
}

/// Build a prompt from a definition and input bindings.
///
/// Renders the user template and, when present, the system template.
pub fn build_prompt(definition: &PromptDefinition, bindings: &Value) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.name);

    let user = render(&definition.template, bindings)?;
    let system = definition
        .system
        .as_deref()
        .map(|template| render(template, bindings))
        .transpose()?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.name.clone(),
        bindings.clone(),
    ))
}
