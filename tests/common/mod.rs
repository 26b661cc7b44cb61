//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cf_mta_sdk::models::CfListResponse;
use cf_mta_sdk::{CfClient, CfError, CreateServiceRequest, ServiceInstance, ServiceOffering};
use std::sync::Mutex;

/// In-process CF client with a fixed catalog and space
#[derive(Default)]
pub struct StubCfClient {
    pub offerings: Vec<ServiceOffering>,
    pub instances: Vec<String>,
    /// Instance name whose creation fails
    pub fail_on: Option<String>,
    created: Mutex<Vec<CreateServiceRequest>>,
}

impl StubCfClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offering(mut self, offering: ServiceOffering) -> Self {
        self.offerings.push(offering);
        self
    }

    pub fn with_instance(mut self, name: &str) -> Self {
        self.instances.push(name.to_string());
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    pub fn created(&self) -> Vec<CreateServiceRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn created_names(&self) -> Vec<String> {
        self.created().into_iter().map(|r| r.instance_name).collect()
    }
}

#[async_trait(?Send)]
impl CfClient for StubCfClient {
    async fn query_service_offerings(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceOffering>, CfError> {
        Ok(CfListResponse {
            resources: self
                .offerings
                .iter()
                .filter(|o| names.contains(&o.name))
                .cloned()
                .collect(),
            pagination: None,
        })
    }

    async fn query_service_instances(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceInstance>, CfError> {
        Ok(CfListResponse {
            resources: self
                .instances
                .iter()
                .filter(|name| names.contains(name))
                .map(|name| ServiceInstance {
                    name: name.clone(),
                    guid: format!("guid-{}", name),
                })
                .collect(),
            pagination: None,
        })
    }

    async fn create_service_instance(&self, request: &CreateServiceRequest) -> Result<(), CfError> {
        if self.fail_on.as_deref() == Some(request.instance_name.as_str()) {
            return Err(CfError::CommandFailed {
                command: format!("cf create-service {}", request.offering),
                code: Some(1),
                stderr: "quota exceeded".to_string(),
            });
        }
        self.created.lock().unwrap().push(request.clone());
        Ok(())
    }
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Descriptor with a managed router already present and xsuaa declared
pub const MANAGED_DESCRIPTOR: &str = r#"_schema-version: "3.2"
ID: My.App
version: 0.0.1
modules:
  - name: my.app-destination-content
    type: com.sap.application.content
    parameters:
      content:
        instance:
          destinations: []
resources:
  - name: existing-uaa
    type: org.cloudfoundry.managed-service
    parameters:
      service: xsuaa
      service-plan: application
"#;

pub const DECLARED_RESOURCES: &str = r#"resources:
  - name: svcA-res
    type: org.cloudfoundry.existing-service
    parameters:
      service: svcA
      service-name: svcA-instance
  - name: svcB
    type: org.cloudfoundry.existing-service
    parameters:
      service: svcB
  - name: svcC
    type: org.cloudfoundry.existing-service
    parameters:
      service: svcC
  - name: no-label
    type: org.cloudfoundry.existing-service
"#;
