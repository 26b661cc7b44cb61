//! Error types for deployment runs
//!
//! Every fatal condition of a run surfaces as a [`DeployError`]. Warnings
//! (unsupported OData versions, resources without a service label) are only
//! logged.

use crate::services::{CatalogError, ProvisionError};
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that abort a deployment run
#[derive(Error, Debug)]
pub enum DeployError {
    /// The descriptor or a referenced YAML file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// The file content is not a valid descriptor
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// Reading from storage failed
    #[error("Storage error with {path}")]
    Storage {
        path: String,
        #[source]
        source: StorageError,
    },

    /// Business service validation failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A service instance could not be created
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// Persisting the final descriptor failed
    #[error("Failed to write descriptor {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: StorageError,
    },
}

/// Result type for deployment runs
pub type DeployResult<T> = Result<T, DeployError>;

impl DeployError {
    /// Classify a storage error raised while reading `path`
    pub fn from_read(path: impl Into<String>, err: StorageError) -> Self {
        let path = path.into();
        match err {
            StorageError::FileNotFound(_) => DeployError::NotFound(path),
            StorageError::SerializationError(message) => DeployError::Parse { path, message },
            other => DeployError::Storage {
                path,
                source: other,
            },
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            DeployError::NotFound(path) => format!(
                "File not found: {path}\n\nHint: Run inside the project folder or pass --descriptor."
            ),
            DeployError::Provision(ProvisionError::ServiceCreation { .. }) => format!(
                "{self}\n\nHint: Instances created before this failure were kept. Check `cf services` before re-running."
            ),
            _ => self.to_string(),
        }
    }
}
