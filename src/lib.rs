//! CF MTA SDK - Deployment descriptor synthesis for UI5 adaptation projects
//!
//! Provides unified interfaces for:
//! - Descriptor loading and saving (via storage backends)
//! - Approuter topology detection and idempotent descriptor synthesis
//! - Business service validation against the Cloud Foundry catalog
//! - Provisioning of missing service instances
//! - Descriptor validation

pub mod assembler;
pub mod cf;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use storage::memory::MemoryStorageBackend;
pub use storage::{StorageBackend, StorageError};
#[cfg(feature = "native-fs")]
pub use storage::filesystem::FileSystemStorageBackend;

pub use cf::{CfClient, CfError, CreateServiceRequest, DryRunCfClient};
#[cfg(feature = "api-backend")]
pub use cf::api::CfApiClient;
#[cfg(feature = "cf-cli")]
pub use cf::cli::CfCliClient;

pub use assembler::{DeployOutcome, DeployRequest, DescriptorAssembler};
pub use descriptor::{SynthesisContext, resolve_topology, synthesize};
pub use error::{DeployError, DeployResult};
pub use model::{DescriptorLoader, DescriptorSaver};
pub use services::{CatalogError, ProvisionError, ProvisionReport, ServiceProvisioner, XsSecurityTemplate};
pub use validation::{DescriptorIssue, DescriptorValidationResult, validate_descriptor};

// Re-export models
pub use models::{
    BusinessServiceResource, Descriptor, Destination, Module, ModuleType, Requirement, Resource,
    ServiceInstance, ServiceOffering, Topology,
};
