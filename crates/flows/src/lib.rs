//! AI prompt flows for Pravah.
//!
//! Each flow pairs an input contract, an output contract and a prompt
//! template, and runs as a single request/response round trip against an
//! explicitly supplied [`FlowContext`].
//!
//! | Flow | Request | Result |
//! |---|---|---|
//! | `categorizeEvent` | `description` | `category` |
//! | `summarizeCityReports` | `location`, `reports[]` | `summary` |
//! | `generateCityInsights` | `cityData` | `narrative`, `priorityScore`, `mentionCount` |
//!
//! # Example
//! ```no_run
//! use pravah_flows::{categorize_event, CategorizeEventInput, FlowContext};
//! use pravah_llm::OllamaClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = FlowContext::new(Arc::new(OllamaClient::new()), "llama3.2");
//! let input = CategorizeEventInput::new("Pothole on Main St causing traffic backup");
//! let output = categorize_event(&ctx, &input).await?;
//! println!("{}", output.category);
//! # Ok(())
//! # }
//! ```

pub mod categorize;
pub mod extract;
pub mod flow;
pub mod insights;
pub mod summarize;

pub use categorize::{categorize_event, CategorizeEventInput, CategorizeEventOutput, EventCategory};
pub use flow::{Flow, FlowContext};
pub use insights::{generate_city_insights, GenerateCityInsightsInput, GenerateCityInsightsOutput};
pub use summarize::{summarize_city_reports, SummarizeCityReportsInput, SummarizeCityReportsOutput};

use pravah_prompt::PromptDefinition;

/// Built-in definitions of every flow, in a stable order.
pub fn builtin_definitions() -> Vec<PromptDefinition> {
    vec![
        categorize::definition(),
        summarize::definition(),
        insights::definition(),
    ]
}
