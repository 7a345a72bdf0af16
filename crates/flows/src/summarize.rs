//! Summarize user reports for a location.

use crate::flow::{Flow, FlowContext};
use pravah_core::AppResult;
use pravah_prompt::{FieldSpec, ModelConfig, ObjectSchema, PromptDefinition};
use serde::{Deserialize, Serialize};

pub const FLOW_NAME: &str = "summarizeCityReports";

// One bullet per report, in input order. An empty list renders no bullets.
const TEMPLATE: &str = "Summarize the following user reports for the location {{{location}}}.

Reports:
{{#each reports}}- {{{this}}}
{{else}}(No reports have been submitted for this location yet.)
{{/each}}

Summary:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeCityReportsInput {
    pub location: String,
    #[serde(default, serialize_with = "serialize_one_line")]
    pub reports: Vec<String>,
}

// Each report is one bullet; a line break inside it would start a fake one.
fn serialize_one_line<S>(reports: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(
        reports
            .iter()
            .map(|report| report.split_whitespace().collect::<Vec<_>>().join(" ")),
    )
}

impl SummarizeCityReportsInput {
    pub fn new<S: Into<String>>(location: impl Into<String>, reports: impl IntoIterator<Item = S>) -> Self {
        Self {
            location: location.into(),
            reports: reports.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeCityReportsOutput {
    pub summary: String,
}

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: FLOW_NAME.to_string(),
        description: "Summarizes city reports for a given location".to_string(),
        input: ObjectSchema::new(vec![
            FieldSpec::string("location").describe("The location to summarize reports for."),
            FieldSpec::array("reports")
                .describe("Array of user reports related to the location."),
        ]),
        output: ObjectSchema::new(vec![FieldSpec::string("summary")
            .describe("A summary of the user reports for the location.")]),
        system: None,
        template: TEMPLATE.to_string(),
        config: ModelConfig::default(),
    }
}

pub fn flow() -> Flow<SummarizeCityReportsInput, SummarizeCityReportsOutput> {
    Flow::new(definition())
}

/// Summarize reports for a location with the built-in prompt.
pub async fn summarize_city_reports(
    ctx: &FlowContext,
    input: &SummarizeCityReportsInput,
) -> AppResult<SummarizeCityReportsOutput> {
    flow().run(ctx, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pravah_core::AppError;
    use pravah_llm::MockClient;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_reports_render_as_ordered_bullets() {
        let built = flow()
            .render(&SummarizeCityReportsInput::new("Downtown", ["A", "B"]))
            .unwrap();

        let bullets: Vec<&str> = built
            .user
            .lines()
            .filter(|line| line.starts_with("- "))
            .collect();
        assert_eq!(bullets, vec!["- A", "- B"]);
        assert!(built.user.contains("for the location Downtown."));
    }

    #[test]
    fn test_multiline_report_stays_on_one_bullet() {
        let built = flow()
            .render(&SummarizeCityReportsInput::new(
                "Downtown",
                ["Road closed\nTree down", "Detour\r\n- fake bullet"],
            ))
            .unwrap();

        let bullets: Vec<&str> = built
            .user
            .lines()
            .filter(|line| line.starts_with("- "))
            .collect();
        assert_eq!(
            bullets,
            vec!["- Road closed Tree down", "- Detour - fake bullet"]
        );
        assert!(!built.user.lines().any(|line| line == "Tree down"));
    }

    #[test]
    fn test_empty_reports_render_without_bullets() {
        let built = flow()
            .render(&SummarizeCityReportsInput::new("Downtown", Vec::<String>::new()))
            .unwrap();

        assert!(!built.user.lines().any(|line| line.starts_with("- ")));
        assert!(built.user.contains("No reports have been submitted"));
        assert!(built.user.trim_end().ends_with("Summary:"));
    }

    #[tokio::test]
    async fn test_downtown_closure_summary() {
        let mock = Arc::new(MockClient::new().with_json(json!({
            "summary": "Downtown: a road is closed and a detour is in effect."
        })));
        let ctx = FlowContext::new(mock.clone(), "test-model");
        let input = SummarizeCityReportsInput::new("Downtown", ["Road closed", "Detour in effect"]);

        let output = summarize_city_reports(&ctx, &input).await.unwrap();
        assert!(!output.summary.is_empty());
        assert!(output.summary.to_lowercase().contains("closed"));

        let prompt = &mock.requests()[0].prompt;
        let road = prompt.find("- Road closed").unwrap();
        let detour = prompt.find("- Detour in effect").unwrap();
        assert!(road < detour);
    }

    #[tokio::test]
    async fn test_empty_reports_still_complete() {
        let ctx = FlowContext::new(
            Arc::new(MockClient::new().with_json(json!({"summary": "No activity reported."}))),
            "test-model",
        );

        let output = summarize_city_reports(
            &ctx,
            &SummarizeCityReportsInput::new("Suburbs", Vec::<String>::new()),
        )
        .await
        .unwrap();
        assert_eq!(output.summary, "No activity reported.");
    }

    #[tokio::test]
    async fn test_empty_summary_passes_through() {
        let ctx = FlowContext::new(
            Arc::new(MockClient::new().with_json(json!({"summary": ""}))),
            "test-model",
        );
        let output = summarize_city_reports(&ctx, &SummarizeCityReportsInput::new("X", ["y"]))
            .await
            .unwrap();
        assert_eq!(output.summary, "");
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_masked() {
        let ctx = FlowContext::new(
            Arc::new(MockClient::new().with_failure("503 Service Unavailable")),
            "test-model",
        );
        let result =
            summarize_city_reports(&ctx, &SummarizeCityReportsInput::new("X", ["y"])).await;
        assert!(matches!(result, Err(AppError::RemoteCall(_))));
    }
}
