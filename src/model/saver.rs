//! Descriptor saving functionality
//!
//! Saves descriptors to storage backends, handling YAML serialization.

use crate::models::Descriptor;
use crate::storage::{StorageBackend, StorageError};
use tracing::info;

/// Descriptor saver that uses a storage backend
pub struct DescriptorSaver<'a, B: StorageBackend> {
    storage: &'a B,
}

impl<'a, B: StorageBackend> DescriptorSaver<'a, B> {
    /// Create a new descriptor saver with the given storage backend
    pub fn new(storage: &'a B) -> Self {
        Self { storage }
    }

    /// Serialize the descriptor and write it to `path` in a single write
    pub async fn save(&self, path: &str, descriptor: &Descriptor) -> Result<(), StorageError> {
        let yaml_content = serialize(descriptor)?;

        self.storage
            .write_file(path, yaml_content.as_bytes())
            .await?;

        info!(
            "Saved descriptor '{}' to {} ({} modules, {} resources)",
            descriptor.id,
            path,
            descriptor.modules.len(),
            descriptor.resources.len()
        );
        Ok(())
    }
}

/// Serialize a descriptor to YAML
pub fn serialize(descriptor: &Descriptor) -> Result<String, StorageError> {
    serde_yaml::to_string(descriptor).map_err(|e| {
        StorageError::SerializationError(format!("Failed to serialize descriptor: {}", e))
    })
}
