//! Configuration management for Pravah.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (.pravah/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the flow layer can talk to.
pub const KNOWN_PROVIDERS: [&str; 3] = ["gemini", "ollama", "mock"];

/// Environment variables consulted for a Gemini key when none is configured.
const GEMINI_KEY_FALLBACK_ENVS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Canonical name for a provider, accepting the `googleai` / `google` aliases.
pub fn canonical_provider(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "gemini" | "googleai" | "google" => Some("gemini"),
        "ollama" => Some("ollama"),
        "mock" => Some("mock"),
        _ => None,
    }
}

/// Model used for a provider when config.yaml does not name one.
fn default_model(provider: &str) -> Option<&'static str> {
    match provider {
        "gemini" => Some("gemini-2.0-flash"),
        "ollama" => Some("llama3.2"),
        "mock" => Some("mock"),
        _ => None,
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .pravah/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("gemini", "ollama", "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Explicit API key (PRAVAH_API_KEY)
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations from config.yaml
    pub llm: Option<LlmConfig>,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProviderConfig {
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        timeout: Option<u64>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::Gemini { model, .. } | ProviderConfig::Ollama { model, .. } => model,
        }
    }

    /// Endpoint override, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ProviderConfig::Gemini { endpoint, .. } => endpoint.as_deref(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        }
    }

    /// Per-request transport timeout in seconds.
    pub fn timeout(&self) -> Option<u64> {
        match self {
            ProviderConfig::Gemini { timeout, .. } | ProviderConfig::Ollama { timeout, .. } => {
                *timeout
            }
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and the environment.
    ///
    /// Environment variables:
    /// - `PRAVAH_WORKSPACE`: Override workspace path
    /// - `PRAVAH_CONFIG`: Path to config file
    /// - `PRAVAH_PROVIDER`: LLM provider
    /// - `PRAVAH_MODEL`: Model identifier
    /// - `PRAVAH_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use pravah_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Provider: {}", config.provider);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit workspace and config file
    /// taking precedence over `PRAVAH_WORKSPACE` / `PRAVAH_CONFIG`.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("PRAVAH_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("PRAVAH_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.pravah_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply `PRAVAH_*`, `RUST_LOG` and `NO_COLOR` on top of the YAML config.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = var("PRAVAH_PROVIDER") {
            self.select_provider(&provider);
        }

        if let Some(model) = var("PRAVAH_MODEL") {
            self.model = model;
        }

        self.api_key = var("PRAVAH_API_KEY");
        if let Some(level) = var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if var("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Switch the active provider, keeping the model in step with it.
    ///
    /// Switching picks the provider's configured model, or its default.
    /// Unknown names are kept verbatim so `validate` can report them.
    fn select_provider(&mut self, provider: &str) {
        let provider = canonical_provider(provider)
            .map(str::to_string)
            .unwrap_or_else(|| provider.to_string());

        if provider != self.provider {
            let model = self
                .get_provider_config(&provider)
                .map(|pc| pc.model().to_string())
                .or_else(|| default_model(&provider).map(str::to_string));
            if let Some(model) = model {
                self.model = model;
            }
        }

        self.provider = provider;
    }

    /// Merge a YAML configuration file into a copy of this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = canonical_provider(&llm.active_provider)
                .map(str::to_string)
                .unwrap_or_else(|| llm.active_provider.clone());

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.select_provider(&provider);
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .pravah directory.
    pub fn pravah_dir(&self) -> PathBuf {
        self.workspace.join(".pravah")
    }

    /// Get the configuration for a provider, if the config file declares one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Endpoint override for the active provider.
    pub fn endpoint(&self) -> Option<String> {
        self.get_provider_config(&self.provider)
            .and_then(|pc| pc.endpoint())
            .map(str::to_string)
    }

    /// Transport timeout for the active provider.
    pub fn timeout_secs(&self) -> Option<u64> {
        self.get_provider_config(&self.provider)
            .and_then(ProviderConfig::timeout)
    }

    /// Resolve the API key for a provider.
    ///
    /// Order: `PRAVAH_API_KEY`, then the provider's `apiKeyEnv`, then for
    /// Gemini the conventional `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        let provider = canonical_provider(provider).unwrap_or(provider);

        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ProviderConfig::Gemini { api_key_env, .. }) = self.get_provider_config(provider)
        {
            if let Ok(key) = std::env::var(api_key_env) {
                return Some(key);
            }
        }

        if provider == "gemini" {
            return GEMINI_KEY_FALLBACK_ENVS
                .iter()
                .find_map(|var| std::env::var(var).ok());
        }

        None
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let Some(provider) = canonical_provider(&self.provider) else {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        };

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier cannot be empty".to_string()));
        }

        if provider == "gemini" && self.resolve_api_key(provider).is_none() {
            let env_hint = match self.get_provider_config(provider) {
                Some(ProviderConfig::Gemini { api_key_env, .. }) => api_key_env.clone(),
                _ => GEMINI_KEY_FALLBACK_ENVS.join(" or "),
            };
            return Err(AppError::Config(format!(
                "API key not found; set PRAVAH_API_KEY or {}",
                env_hint
            )));
        }

        Ok(())
    }
}
