//! Cloud Foundry client abstraction
//!
//! Defines the CfClient trait used for catalog lookups and service instance
//! creation, with implementations:
//! - CfApiClient: CF v3 REST API (default)
//! - CfCliClient: the `cf` command line
//! - DryRunCfClient: forwards queries, records creations without running them

use crate::models::{CfListResponse, ServiceInstance, ServiceOffering};
use async_trait::async_trait;
use serde::Serialize;

pub mod dry_run;

#[cfg(feature = "api-backend")]
pub mod api;

#[cfg(feature = "cf-cli")]
pub mod cli;

pub use dry_run::DryRunCfClient;

/// Error type for Cloud Foundry operations
#[derive(Debug, thiserror::Error)]
pub enum CfError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("CF API request {path} failed with status {status}: {message}")]
    ApiError {
        path: String,
        status: u16,
        message: String,
    },
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Command `{command}` failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Plan '{plan}' not found for service offering '{offering}'")]
    PlanNotFound { offering: String, plan: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Parameters of a `create-service` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateServiceRequest {
    /// Catalog offering label, e.g. `xsuaa`
    pub offering: String,
    pub plan: String,
    pub instance_name: String,
    /// Inline configuration passed with `-c`
    pub parameters: Option<serde_json::Value>,
}

impl CreateServiceRequest {
    pub fn new(
        offering: impl Into<String>,
        plan: impl Into<String>,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            offering: offering.into(),
            plan: plan.into(),
            instance_name: instance_name.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Trait for Cloud Foundry backends
///
/// Calls are issued one at a time by the engine; implementations need not
/// guard against concurrent use of the same space.
#[async_trait(?Send)]
pub trait CfClient: Send + Sync {
    /// List marketplace offerings with one of the given names
    async fn query_service_offerings(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceOffering>, CfError>;

    /// List service instances with one of the given names in the target space
    async fn query_service_instances(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceInstance>, CfError>;

    /// Create a managed service instance
    async fn create_service_instance(&self, request: &CreateServiceRequest) -> Result<(), CfError>;
}

/// Check a value used inside a comma-separated CF list filter
pub(crate) fn validate_filter_value(value: &str) -> Result<(), CfError> {
    if value.trim().is_empty() {
        return Err(CfError::InvalidRequest(
            "Filter value cannot be empty".to_string(),
        ));
    }
    if value.contains(',') {
        return Err(CfError::InvalidRequest(format!(
            "Filter value '{}' cannot contain a comma",
            value
        )));
    }
    Ok(())
}
