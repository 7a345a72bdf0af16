//! Pravah CLI
//!
//! Main entry point for the `pravah` command-line tool.
//! Runs the city-insight prompt flows against a configured LLM provider.

mod commands;

use clap::{Parser, Subcommand};
use commands::{CategorizeCommand, InsightsCommand, PromptsCommand, SummarizeCommand};
use pravah_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Pravah - AI flows for city event reports
#[derive(Parser, Debug)]
#[command(name = "pravah")]
#[command(about = "AI flows for city event reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PRAVAH_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PRAVAH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (gemini, ollama, mock)
    #[arg(short, long, global = true, env = "PRAVAH_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "PRAVAH_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Categorize an event description
    Categorize(CategorizeCommand),

    /// Summarize reports for a location
    Summarize(SummarizeCommand),

    /// Generate insights from city data
    Insights(InsightsCommand),

    /// Inspect flow prompts
    Prompts(PromptsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Workspace and config file decide which config.yaml is read
    let config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(
        None,
        None,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Pravah CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Categorize(_) => "categorize",
        Commands::Summarize(_) => "summarize",
        Commands::Insights(_) => "insights",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Categorize(cmd) => cmd.execute(&config).await,
        Commands::Summarize(cmd) => cmd.execute(&config).await,
        Commands::Insights(cmd) => cmd.execute(&config).await,
        Commands::Prompts(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!(kind = e.kind(), "Command failed: {}", e),
    }

    result
}
