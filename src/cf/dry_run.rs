//! Dry-run Cloud Foundry client

use super::{CfClient, CfError, CreateServiceRequest};
use crate::models::{CfListResponse, ServiceInstance, ServiceOffering};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// Forwards catalog and instance queries to `inner`, records creations instead of running them
pub struct DryRunCfClient<C: CfClient> {
    inner: C,
    planned: Mutex<Vec<CreateServiceRequest>>,
}

impl<C: CfClient> DryRunCfClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            planned: Mutex::new(Vec::new()),
        }
    }

    /// Creations that would have been issued, in call order
    pub fn planned(&self) -> Vec<CreateServiceRequest> {
        self.planned
            .lock()
            .map(|planned| planned.clone())
            .unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl<C: CfClient> CfClient for DryRunCfClient<C> {
    async fn query_service_offerings(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceOffering>, CfError> {
        self.inner.query_service_offerings(names).await
    }

    async fn query_service_instances(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceInstance>, CfError> {
        self.inner.query_service_instances(names).await
    }

    async fn create_service_instance(&self, request: &CreateServiceRequest) -> Result<(), CfError> {
        info!(
            "[dry-run] would create service instance '{}' ({} / {})",
            request.instance_name, request.offering, request.plan
        );
        self.planned
            .lock()
            .map_err(|_| CfError::ConfigError("Dry-run recorder lock poisoned".to_string()))?
            .push(request.clone());
        Ok(())
    }
}
