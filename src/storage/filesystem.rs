//! File system storage backend
//!
//! Implements StorageBackend over a project directory.
//!
//! ## Security
//!
//! Paths containing ".." are rejected and resolved paths must stay inside the
//! project directory.
//!
//! Writes go to a sibling temporary file that is renamed over the target, so a
//! failed write leaves the previous descriptor in place.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File system storage backend rooted at a project directory
pub struct FileSystemStorageBackend {
    root: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a backend for the given project directory
    ///
    /// ```rust
    /// use cf_mta_sdk::storage::filesystem::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/work/my-adp-project");
    /// ```
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Map a backend path into the project directory, refusing escapes
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_start_matches('/'));

        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(StorageError::PermissionDenied(format!(
                "Path traversal not allowed: {}",
                path
            )));
        }

        let full = self.root.join(relative);

        let existing = if full.exists() {
            Some(full.as_path())
        } else {
            full.parent().filter(|parent| parent.exists())
        };

        if let Some(existing) = existing {
            let canonical = existing
                .canonicalize()
                .map_err(|e| StorageError::IoError(format!("Failed to resolve {}: {}", path, e)))?;
            let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());

            if !canonical.starts_with(&root) {
                return Err(StorageError::PermissionDenied(format!(
                    "Path escapes project directory: {}",
                    path
                )));
            }
        }

        Ok(full)
    }
}

#[async_trait(?Send)]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to read file {}: {}", path, e))
            }
        })
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::IoError(format!("Failed to create directory for {}: {}", path, e))
            })?;
        }

        let mut staged = full_path.clone().into_os_string();
        staged.push(".tmp");
        let staged = PathBuf::from(staged);

        debug!(path = %full_path.display(), bytes = content.len(), "writing file");

        fs::write(&staged, content)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write file {}: {}", path, e)))?;

        if let Err(e) = fs::rename(&staged, &full_path).await {
            let _ = fs::remove_file(&staged).await;
            return Err(StorageError::IoError(format!(
                "Failed to replace file {}: {}",
                path, e
            )));
        }

        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;

        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to check file existence {}: {}",
                path, e
            ))),
        }
    }
}
