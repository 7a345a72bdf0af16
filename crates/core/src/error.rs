//! Error types for Pravah.
//!
//! This module defines a unified error enum that covers every error category
//! in the workspace. The three flow-facing kinds (`InvalidInput`,
//! `RemoteCall`, `UnparsableOutput`) are kept distinct so callers can tell
//! "bad request" from "service down" from "service answered badly".

use thiserror::Error;

/// Unified error type for Pravah.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-supplied flow input failed local contract validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote prompt-execution service unreachable or failed at transport level
    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    /// Remote service answered but the payload breaks the output contract
    #[error("Unparsable model output: {0}")]
    UnparsableOutput(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prompt definition and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::RemoteCall(_) => "remote_call_failure",
            AppError::UnparsableOutput(_) => "unparsable_model_output",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Prompt(_) => "prompt",
            AppError::Serialization(_) => "serialization",
            AppError::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
