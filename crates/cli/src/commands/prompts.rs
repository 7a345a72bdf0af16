//! Prompts command handler.
//!
//! Inspects built-in flow prompts and workspace overrides.

use super::print_json;
use clap::{Args, Subcommand};
use pravah_core::{config::AppConfig, AppError, AppResult};
use pravah_prompt::{build_prompt, describe_violations, find_override, list_prompts, PromptDefinition};

/// Inspect flow prompts and workspace overrides
#[derive(Args, Debug)]
pub struct PromptsCommand {
    #[command(subcommand)]
    pub action: PromptsAction,
}

#[derive(Subcommand, Debug)]
pub enum PromptsAction {
    /// List flows and whether the workspace overrides them
    List(PromptsListCommand),
    /// Show the effective definition of a flow prompt
    Show(PromptsShowCommand),
}

/// List flow prompts
#[derive(Args, Debug)]
pub struct PromptsListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsListCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let overrides = list_prompts(&config.workspace)?;
        let builtin = pravah_flows::builtin_definitions();

        let unknown: Vec<&String> = overrides
            .iter()
            .filter(|name| !builtin.iter().any(|d| &d.name == *name))
            .collect();
        for name in &unknown {
            tracing::warn!("Override '{}' does not match any flow and is ignored", name);
        }

        if self.json {
            let entries: Vec<_> = builtin
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "name": d.name,
                        "description": d.description,
                        "overridden": overrides.contains(&d.name),
                    })
                })
                .collect();
            print_json(&entries)?;
        } else {
            for def in &builtin {
                let marker = if overrides.contains(&def.name) {
                    " (workspace override)"
                } else {
                    ""
                };
                println!("{:<22} {}{}", def.name, def.description, marker);
            }
        }

        Ok(())
    }
}

/// Show a flow prompt
#[derive(Args, Debug)]
pub struct PromptsShowCommand {
    /// Flow name (e.g., categorizeEvent)
    pub name: String,

    /// Render the template with this JSON input instead of printing it
    #[arg(long)]
    pub input: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsShowCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let definition = self.effective_definition(config)?;

        if let Some(ref raw) = self.input {
            let bindings: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| AppError::InvalidInput(format!("--input is not valid JSON: {}", e)))?;
            definition.input.validate(&bindings).map_err(|violations| {
                AppError::InvalidInput(describe_violations(&violations))
            })?;

            let built = build_prompt(&definition, &bindings)?;
            if self.json {
                print_json(&built)?;
            } else {
                if let Some(system) = built.system {
                    println!("[system]\n{}\n", system);
                }
                println!("{}", built.user);
            }
            return Ok(());
        }

        if self.json {
            print_json(&definition)?;
        } else {
            let yaml = serde_yaml::to_string(&definition)?;
            print!("{}", yaml);
        }

        Ok(())
    }

    fn effective_definition(&self, config: &AppConfig) -> AppResult<PromptDefinition> {
        let builtin = pravah_flows::builtin_definitions()
            .into_iter()
            .find(|d| d.name == self.name)
            .ok_or_else(|| AppError::Prompt(format!("Unknown flow: {}", self.name)))?;

        Ok(match find_override(&config.workspace, &self.name)? {
            Some(custom) => PromptDefinition {
                input: builtin.input,
                output: builtin.output,
                ..custom
            },
            None => builtin,
        })
    }
}

impl PromptsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            PromptsAction::List(cmd) => cmd.execute(config).await,
            PromptsAction::Show(cmd) => cmd.execute(config).await,
        }
    }
}
