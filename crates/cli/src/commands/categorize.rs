//! Categorize command handler.

use super::{flow_context, print_json, read_text};
use clap::Args;
use pravah_core::{config::AppConfig, AppResult};
use pravah_flows::{categorize, CategorizeEventInput};
use std::path::PathBuf;

/// Categorize an event description (traffic, safety, mood, other)
#[derive(Args, Debug)]
pub struct CategorizeCommand {
    /// Event description
    pub description: Option<String>,

    /// Read the description from a file
    #[arg(short, long, conflicts_with = "description")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CategorizeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing categorize command");

        let description = read_text(self.description.as_deref(), self.file.as_deref(), "description")?;
        let input = CategorizeEventInput::new(description.trim());

        let flow = categorize::flow().with_workspace_override(&config.workspace)?;
        let ctx = flow_context(config)?;
        let output = flow.run(&ctx, &input).await?;

        if self.json {
            print_json(&output)?;
        } else {
            println!("{}", output.category);
        }

        Ok(())
    }
}
