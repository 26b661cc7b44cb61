//! Storage backend abstraction
//!
//! Defines the StorageBackend trait the descriptor loader and saver run on:
//! - FileSystemStorageBackend: Native file system (for the CLI and native tools)
//! - MemoryStorageBackend: In-process map (for dry runs and tests)

use async_trait::async_trait;

pub mod memory;

#[cfg(feature = "native-fs")]
pub mod filesystem;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Trait for storage backends
///
/// Paths are backend-relative, `/`-separated strings.
#[async_trait(?Send)]
pub trait StorageBackend: Send + Sync {
    /// Read a file from storage
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a file to storage, replacing any previous content
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Check if a file exists
    async fn file_exists(&self, path: &str) -> Result<bool, StorageError>;
}
