//! Insights command handler.

use super::{flow_context, print_json, read_text};
use clap::Args;
use pravah_core::{config::AppConfig, AppError, AppResult};
use pravah_flows::{insights, GenerateCityInsightsInput};
use std::path::PathBuf;

/// Generate a narrative and priority signals from city data
#[derive(Args, Debug)]
pub struct InsightsCommand {
    /// City data as a JSON string
    pub city_data: Option<String>,

    /// Read city data from a JSON file
    #[arg(short, long, conflicts_with = "city_data")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InsightsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing insights command");

        let city_data = read_text(self.city_data.as_deref(), self.file.as_deref(), "city data")?;

        // Files are expected to hold JSON; inline text is forwarded as-is.
        if self.file.is_some() {
            serde_json::from_str::<serde_json::Value>(&city_data).map_err(|e| {
                AppError::InvalidInput(format!("City data file is not valid JSON: {}", e))
            })?;
        }

        let input = GenerateCityInsightsInput::new(city_data);
        let flow = insights::flow().with_workspace_override(&config.workspace)?;
        let ctx = flow_context(config)?;
        let output = flow.run(&ctx, &input).await?;

        if self.json {
            print_json(&output)?;
        } else {
            println!("{}", output.narrative);
            println!();
            println!("Priority score: {}", output.priority_score);
            println!("Mentions:       {}", output.mention_count);
        }

        Ok(())
    }
}
