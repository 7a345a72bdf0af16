//! Loader for workspace prompt overrides.
//!
//! Overrides live in `.pravah/prompts/<name>.yml` and share the
//! `PromptDefinition` shape.

use crate::builder::check_template;
use crate::types::PromptDefinition;
use pravah_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".pravah/prompts")
}

/// Load a prompt definition by name from the workspace.
///
/// # Example
/// ```no_run
/// use pravah_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "categorizeEvent")?;
/// println!("Loaded prompt: {}", prompt.name);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_name: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_name));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    if definition.name != prompt_name {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares name '{}'",
            prompt_file, definition.name
        )));
    }

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt override: {}", definition.name);

    Ok(definition)
}

/// Load an override if one exists for `prompt_name`.
pub fn find_override(
    workspace_path: &Path,
    prompt_name: &str,
) -> AppResult<Option<PromptDefinition>> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_name));
    if prompt_file.exists() {
        load_prompt(workspace_path, prompt_name).map(Some)
    } else {
        Ok(None)
    }
}

/// List the names of all prompt overrides in the workspace, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let dir = prompts_dir(workspace_path);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().and_then(|s| s.to_str()) == Some("yml")
        })
        .filter_map(|e| {
            e.path()
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .collect();

    names.sort();
    Ok(names)
}

/// Validate a prompt definition.
pub fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.name.trim().is_empty() {
        return Err(AppError::Prompt("Prompt name cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' has an empty template",
            def.name
        )));
    }

    if def.output.fields.is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' declares no output fields",
            def.name
        )));
    }

    check_template(&def.template)?;
    if let Some(ref system) = def.system {
        check_template(system)?;
    }

    Ok(())
}
