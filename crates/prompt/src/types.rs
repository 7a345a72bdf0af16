//! Prompt types for Pravah.
//!
//! This module defines the domain entities for the prompt system.

use crate::schema::ObjectSchema;
use serde::{Deserialize, Serialize};

/// A named prompt: input contract, output contract and template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    /// Unique prompt name (e.g., "categorizeEvent")
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Input contract
    pub input: ObjectSchema,

    /// Output contract
    pub output: ObjectSchema,

    /// Optional system instruction (Handlebars syntax)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Sampling settings
    #[serde(default)]
    pub config: ModelConfig,
}

/// Sampling settings forwarded to the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// A fully rendered prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltPromptMetadata {
    /// Source prompt name
    pub source_prompt: String,

    /// Bindings the template was rendered with
    pub resolved_variables: serde_json::Value,
}

impl BuiltPrompt {
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt: String,
        resolved_variables: serde_json::Value,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt,
                resolved_variables,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
name: summarizeCityReports
description: Summarizes reports for a location
input:
  - name: location
    type: string
  - name: reports
    type: array
output:
  - name: summary
    type: string
    description: A summary of the user reports for the location.
template: "Summarize {{{location}}}"
config:
  temperature: 0.3
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.name, "summarizeCityReports");
        assert_eq!(def.input.fields[1].field_type, FieldType::Array);
        assert_eq!(def.output.fields[0].name, "summary");
        assert_eq!(def.config.temperature, Some(0.3));
        assert_eq!(def.config.max_output_tokens, None);
        assert!(def.system.is_none());
    }

    #[test]
    fn test_built_prompt_creation() {
        let built = BuiltPrompt::new(
            None,
            "User message".to_string(),
            "categorizeEvent".to_string(),
            serde_json::json!({"description": "x"}),
        );

        assert_eq!(built.user, "User message");
        assert_eq!(built.metadata.source_prompt, "categorizeEvent");
        assert_eq!(built.metadata.resolved_variables["description"], "x");
    }
}
