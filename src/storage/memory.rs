//! In-memory storage backend

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Storage backend that keeps files in a map
#[derive(Debug, Default)]
pub struct MemoryStorageBackend {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with one file
    pub fn with_file(path: &str, content: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        if let Ok(mut files) = backend.files.lock() {
            files.insert(normalize(path), content.into());
        }
        backend
    }

    /// Current content of `path` as UTF-8, if present
    pub fn contents(&self, path: &str) -> Option<String> {
        let files = self.files.lock().ok()?;
        files
            .get(&normalize(path))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>, StorageError> {
        self.files
            .lock()
            .map_err(|_| StorageError::IoError("Memory storage lock poisoned".to_string()))
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").trim_start_matches('/').to_string()
}

#[async_trait(?Send)]
impl StorageBackend for MemoryStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.lock()?
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        self.lock()?.insert(normalize(path), content.to_vec());
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.lock()?.contains_key(&normalize(path)))
    }
}
