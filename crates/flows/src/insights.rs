//! City insight generation from serialized city data.

use crate::flow::{Flow, FlowContext};
use pravah_core::AppResult;
use pravah_prompt::{FieldSpec, ModelConfig, ObjectSchema, PromptDefinition};
use serde::{Deserialize, Serialize};

pub const FLOW_NAME: &str = "generateCityInsights";

const TEMPLATE: &str = "You are an AI agent specializing in generating insights and narratives from city data.

Given the following real-time city data, synthesize a meaningful narrative that helps users understand what is happening in the city.
Also generate a priority score for the most important event and the number of times that event is mentioned.

City Data: {{{cityData}}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCityInsightsInput {
    /// Serialized city data, passed to the model verbatim
    pub city_data: String,
}

impl GenerateCityInsightsInput {
    pub fn new(city_data: impl Into<String>) -> Self {
        Self {
            city_data: city_data.into(),
        }
    }

    /// Serialize structured data (stories, map points, ...) as the payload.
    pub fn from_data<T: Serialize + ?Sized>(data: &T) -> AppResult<Self> {
        Ok(Self::new(serde_json::to_string(data)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCityInsightsOutput {
    pub narrative: String,
    pub priority_score: f64,
    pub mention_count: f64,
}

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: FLOW_NAME.to_string(),
        description: "Generates a narrative and priority signals from city data".to_string(),
        input: ObjectSchema::new(vec![FieldSpec::string("cityData")
            .describe("Real-time city data as a JSON string.")
            .non_empty()]),
        output: ObjectSchema::new(vec![
            FieldSpec::string("narrative").describe("A narrative summary of the city data."),
            FieldSpec::number("priorityScore")
                .describe("A score indicating the priority or importance of the event")
                .at_least(0.0),
            FieldSpec::number("mentionCount")
                .describe("The number of times the event is mentioned")
                .at_least(0.0),
        ]),
        system: None,
        template: TEMPLATE.to_string(),
        config: ModelConfig::default(),
    }
}

pub fn flow() -> Flow<GenerateCityInsightsInput, GenerateCityInsightsOutput> {
    Flow::new(definition())
}

/// Generate insights for serialized city data with the built-in prompt.
pub async fn generate_city_insights(
    ctx: &FlowContext,
    input: &GenerateCityInsightsInput,
) -> AppResult<GenerateCityInsightsOutput> {
    flow().run(ctx, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pravah_core::AppError;
    use pravah_llm::MockClient;
    use serde_json::json;
    use std::sync::Arc;

    fn ctx(reply: serde_json::Value) -> FlowContext {
        FlowContext::new(Arc::new(MockClient::new().with_json(reply)), "test-model")
    }

    fn sample_input() -> GenerateCityInsightsInput {
        GenerateCityInsightsInput::from_data(&json!([
            {"title": "Heavy Congestion on Inner Ring Road", "category": "Traffic"},
            {"title": "Potholes Reported in BTM Layout", "category": "CivicIssue"}
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_insights() {
        let ctx = ctx(json!({
            "narrative": "Traffic is the dominant concern this morning.",
            "priorityScore": 95,
            "mentionCount": 150
        }));

        let output = generate_city_insights(&ctx, &sample_input()).await.unwrap();
        assert_eq!(output.priority_score, 95.0);
        assert_eq!(output.mention_count, 150.0);
        assert!(output.priority_score >= 0.0 && output.mention_count >= 0.0);
    }

    #[tokio::test]
    async fn test_missing_narrative_is_unparsable() {
        let ctx = ctx(json!({"priorityScore": 10, "mentionCount": 2}));
        let result = generate_city_insights(&ctx, &sample_input()).await;
        match result {
            Err(AppError::UnparsableOutput(msg)) => assert!(msg.contains("narrative")),
            other => panic!("expected unparsable output, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_negative_scores_are_unparsable() {
        let ctx = ctx(json!({"narrative": "x", "priorityScore": -1, "mentionCount": 2}));
        let result = generate_city_insights(&ctx, &sample_input()).await;
        assert!(matches!(result, Err(AppError::UnparsableOutput(_))));
    }

    #[tokio::test]
    async fn test_string_score_is_unparsable() {
        let ctx = ctx(json!({"narrative": "x", "priorityScore": "high", "mentionCount": 2}));
        let result = generate_city_insights(&ctx, &sample_input()).await;
        assert!(matches!(result, Err(AppError::UnparsableOutput(_))));
    }

    #[tokio::test]
    async fn test_empty_narrative_passes_through() {
        let ctx = ctx(json!({"narrative": "", "priorityScore": 0, "mentionCount": 0}));
        let output = generate_city_insights(&ctx, &sample_input()).await.unwrap();
        assert_eq!(output.narrative, "");
    }

    #[tokio::test]
    async fn test_empty_city_data_is_invalid_input() {
        let ctx = ctx(json!({}));
        let result = generate_city_insights(&ctx, &GenerateCityInsightsInput::new("")).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_city_data_embedded_verbatim() {
        let input = GenerateCityInsightsInput::new(r#"{"alerts":["<flood>"]}"#);
        let built = flow().render(&input).unwrap();
        assert!(built.user.contains(r#"City Data: {"alerts":["<flood>"]}"#));
    }
}
