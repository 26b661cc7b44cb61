//! Descriptor loading functionality
//!
//! Loads deployment descriptors and declared-resource files from storage
//! backends, handling YAML parsing.

use crate::models::{Descriptor, Resource};
use crate::storage::{StorageBackend, StorageError};
use tracing::{info, warn};

/// Descriptor loader that uses a storage backend
pub struct DescriptorLoader<'a, B: StorageBackend> {
    storage: &'a B,
}

impl<'a, B: StorageBackend> DescriptorLoader<'a, B> {
    /// Create a new descriptor loader with the given storage backend
    pub fn new(storage: &'a B) -> Self {
        Self { storage }
    }

    /// Load a descriptor from storage
    ///
    /// Fails with `FileNotFound` when the file is absent and with
    /// `SerializationError` when it is not a valid descriptor.
    pub async fn load(&self, path: &str) -> Result<Descriptor, StorageError> {
        let yaml_content = self.read_string(path).await?;

        let descriptor: Descriptor = serde_yaml::from_str(&yaml_content).map_err(|e| {
            StorageError::SerializationError(format!("Failed to parse descriptor {}: {}", path, e))
        })?;

        if descriptor.id.trim().is_empty() {
            return Err(StorageError::SerializationError(format!(
                "Descriptor {} has an empty ID",
                path
            )));
        }

        info!(
            "Loaded descriptor '{}' from {} ({} modules, {} resources)",
            descriptor.id,
            path,
            descriptor.modules.len(),
            descriptor.resources.len()
        );

        Ok(descriptor)
    }

    /// Load a descriptor, or start an empty one with `default_id` when the file does not exist
    pub async fn load_or_default(
        &self,
        path: &str,
        default_id: &str,
    ) -> Result<Descriptor, StorageError> {
        if !self.storage.file_exists(path).await? {
            info!("No descriptor at {}, starting from an empty one", path);
            return Ok(Descriptor::new(default_id));
        }
        self.load(path).await
    }

    /// Read the business service resources declared in a YAML file
    ///
    /// Accepts either a document with a `resources` list or a bare list.
    /// Entries that are not valid resources are logged and skipped.
    pub async fn read_business_services(&self, path: &str) -> Result<Vec<Resource>, StorageError> {
        let yaml_content = self.read_string(path).await?;

        let data: serde_yaml::Value = serde_yaml::from_str(&yaml_content).map_err(|e| {
            StorageError::SerializationError(format!("Failed to parse YAML {}: {}", path, e))
        })?;

        let entries = data
            .get("resources")
            .and_then(|v| v.as_sequence())
            .or_else(|| data.as_sequence());

        let mut resources = Vec::new();
        for entry in entries.into_iter().flatten() {
            match serde_yaml::from_value::<Resource>(entry.clone()) {
                Ok(resource) => resources.push(resource),
                Err(e) => warn!("Skipping invalid resource entry in {}: {}", path, e),
            }
        }

        info!("Loaded {} declared resources from {}", resources.len(), path);
        Ok(resources)
    }

    async fn read_string(&self, path: &str) -> Result<String, StorageError> {
        let content = self.storage.read_file(path).await?;
        String::from_utf8(content)
            .map_err(|e| StorageError::SerializationError(format!("Invalid UTF-8 in {}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorageBackend;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_load_or_default_when_missing() {
        runtime().block_on(async {
            let storage = MemoryStorageBackend::new();
            let loader = DescriptorLoader::new(&storage);
            let descriptor = loader.load_or_default("mta.yaml", "test-project").await.unwrap();
            assert_eq!(descriptor.id, "test-project");
            assert!(descriptor.modules.is_empty());
        });
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        runtime().block_on(async {
            let storage = MemoryStorageBackend::with_file("mta.yaml", "modules: [unclosed");
            let loader = DescriptorLoader::new(&storage);
            let result = loader.load_or_default("mta.yaml", "p").await;
            assert!(matches!(result, Err(StorageError::SerializationError(_))));
        });
    }

    #[test]
    fn test_load_rejects_empty_id() {
        runtime().block_on(async {
            let storage = MemoryStorageBackend::with_file("mta.yaml", "ID: ''\n");
            let loader = DescriptorLoader::new(&storage);
            let result = loader.load("mta.yaml").await;
            assert!(matches!(result, Err(StorageError::SerializationError(_))));
        });
    }

    #[test]
    fn test_declared_resources_skip_invalid_entries() {
        let yaml = r#"
resources:
  - name: orders
    type: org.cloudfoundry.existing-service
    parameters:
      service: orders-api
  - parameters:
      service: no-name
  - name: bare-list-style
    type: org.cloudfoundry.managed-service
"#;
        runtime().block_on(async {
            let storage = MemoryStorageBackend::with_file("resources.yaml", yaml);
            let loader = DescriptorLoader::new(&storage);
            let resources = loader.read_business_services("resources.yaml").await.unwrap();
            let names: Vec<_> = resources.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["orders", "bare-list-style"]);
        });
    }

    #[test]
    fn test_declared_resources_accept_bare_list() {
        let yaml = "- name: orders\n  type: org.cloudfoundry.managed-service\n";
        runtime().block_on(async {
            let storage = MemoryStorageBackend::with_file("resources.yaml", yaml);
            let loader = DescriptorLoader::new(&storage);
            let resources = loader.read_business_services("resources.yaml").await.unwrap();
            assert_eq!(resources.len(), 1);
        });
    }
}
