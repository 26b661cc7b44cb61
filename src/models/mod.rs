//! Models module for the SDK
//!
//! Defines the deployment descriptor document and the Cloud Foundry records
//! the provisioning engine reads.

pub mod descriptor;
pub mod enums;
pub mod service;

pub use descriptor::{
    BuildParameters, Content, ContentInstance, Descriptor, Destination, Module, ModuleParameters,
    Requirement, RequirementParameters, Resource, ResourceParameters, ServiceKey,
};
pub use enums::*;
pub use service::{
    BrokerCatalog, BusinessServiceResource, CfListResponse, ServiceInstance, ServiceOffering,
    ServicePlan,
};
