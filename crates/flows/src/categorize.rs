//! Smart event categorization.
//!
//! Maps a free-text report to exactly one of four event categories.

use crate::flow::{Flow, FlowContext};
use pravah_core::{AppError, AppResult};
use pravah_prompt::{FieldSpec, ModelConfig, ObjectSchema, PromptDefinition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FLOW_NAME: &str = "categorizeEvent";

const TEMPLATE: &str = "You are an AI assistant specializing in categorizing user-submitted city events.

Given the following event description, determine the most appropriate category.

Event Description: {{{description}}}

The category must be exactly one of: traffic, safety, mood, other.";

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Traffic,
    Safety,
    Mood,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Traffic,
        EventCategory::Safety,
        EventCategory::Mood,
        EventCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Traffic => "traffic",
            EventCategory::Safety => "safety",
            EventCategory::Mood => "mood",
            EventCategory::Other => "other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown event category: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizeEventInput {
    pub description: String,
}

impl CategorizeEventInput {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizeEventOutput {
    pub category: EventCategory,
}

pub fn definition() -> PromptDefinition {
    let categories: Vec<&str> = EventCategory::ALL.iter().map(|c| c.as_str()).collect();

    PromptDefinition {
        name: FLOW_NAME.to_string(),
        description: "Categorizes an event based on its description".to_string(),
        input: ObjectSchema::new(vec![FieldSpec::string("description")
            .describe("The description of the event to categorize.")
            .non_empty()]),
        output: ObjectSchema::new(vec![FieldSpec::string("category")
            .describe("The category of the event.")
            .one_of(&categories)]),
        system: None,
        template: TEMPLATE.to_string(),
        config: ModelConfig {
            temperature: Some(0.0),
            max_output_tokens: None,
        },
    }
}

pub fn flow() -> Flow<CategorizeEventInput, CategorizeEventOutput> {
    Flow::new(definition())
}

/// Categorize an event description with the built-in prompt.
pub async fn categorize_event(
    ctx: &FlowContext,
    input: &CategorizeEventInput,
) -> AppResult<CategorizeEventOutput> {
    flow().run(ctx, input).await
}
