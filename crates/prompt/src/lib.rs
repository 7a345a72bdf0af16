//! Prompt system for Pravah.
//!
//! This crate provides the declarative half of a prompt flow:
//! - Schema contracts for inputs and outputs
//! - Prompt definitions binding contracts to a template
//! - Handlebars template rendering
//! - YAML prompt overrides loaded from the workspace

pub mod builder;
pub mod loader;
pub mod schema;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, check_template, render};
pub use loader::{find_override, list_prompts, load_prompt, validate_prompt};
pub use schema::{describe_violations, FieldSpec, FieldType, ObjectSchema, Violation};
pub use types::{BuiltPrompt, BuiltPromptMetadata, ModelConfig, PromptDefinition};
