//! CLI error types

use crate::DeployError;
use std::path::PathBuf;

/// Errors reported by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation failed:\n{0}")]
    ValidationError(String),
    #[error(transparent)]
    Deploy(#[from] DeployError),
}

impl CliError {
    /// Message for terminal output, with hints where available
    pub fn user_message(&self) -> String {
        match self {
            CliError::Deploy(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
