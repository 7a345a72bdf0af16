//! Summarize command handler.

use super::{flow_context, print_json};
use clap::Args;
use pravah_core::{config::AppConfig, AppError, AppResult};
use pravah_flows::{summarize, SummarizeCityReportsInput};
use std::path::PathBuf;

/// Summarize user reports for a location
#[derive(Args, Debug)]
pub struct SummarizeCommand {
    /// Location the reports refer to
    #[arg(short, long)]
    pub location: String,

    /// A single report (repeat for several, order is kept)
    #[arg(short, long = "report")]
    pub reports: Vec<String>,

    /// Read additional reports from a file, one per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SummarizeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing summarize command for '{}'", self.location);

        let reports = self.collect_reports()?;
        tracing::debug!("Summarizing {} reports", reports.len());

        let input = SummarizeCityReportsInput::new(self.location.clone(), reports);
        let flow = summarize::flow().with_workspace_override(&config.workspace)?;
        let ctx = flow_context(config)?;
        let output = flow.run(&ctx, &input).await?;

        if self.json {
            print_json(&output)?;
        } else {
            println!("{}", output.summary);
        }

        Ok(())
    }

    fn collect_reports(&self) -> AppResult<Vec<String>> {
        let mut reports = self.reports.clone();

        if let Some(ref path) = self.file {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AppError::InvalidInput(format!("Failed to read reports from {:?}: {}", path, e))
            })?;
            reports.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }

        Ok(reports)
    }
}
