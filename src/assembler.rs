//! Deployment run orchestration
//!
//! Loads the descriptor once, synthesizes it in memory, provisions missing
//! service instances and writes the descriptor once at the end. Any failure
//! before the write leaves the file on disk unchanged.

use crate::cf::CfClient;
use crate::descriptor::{SynthesisContext, resolve_or_detect, synthesize};
use crate::error::{DeployError, DeployResult};
use crate::model::{DescriptorLoader, DescriptorSaver};
use crate::models::{Descriptor, Topology};
use crate::services::{
    ProvisionReport, ServiceProvisioner, XsSecurityTemplate, business_services_from_resources,
    resolve_business_services,
};
use crate::storage::StorageBackend;
use crate::validation::validate_descriptor;
use tracing::{info, warn};

/// Inputs of one deployment run
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// Descriptor path within the storage backend
    pub descriptor_path: String,
    /// `ID` of the descriptor to start from when the file does not exist;
    /// a missing file is an error when unset
    pub default_id: Option<String>,
    pub adp_project_name: String,
    pub business_service: String,
    pub business_solution: String,
    /// Explicit topology; detected from the descriptor when unset
    pub topology: Option<Topology>,
    pub timestamp: String,
    pub xs_security_template: XsSecurityTemplate,
}

impl DeployRequest {
    /// Request stamped with the current time in milliseconds
    pub fn new(
        descriptor_path: impl Into<String>,
        adp_project_name: impl Into<String>,
        business_service: impl Into<String>,
    ) -> Self {
        Self {
            descriptor_path: descriptor_path.into(),
            default_id: None,
            adp_project_name: adp_project_name.into(),
            business_service: business_service.into(),
            business_solution: String::new(),
            topology: None,
            timestamp: chrono::Utc::now().timestamp_millis().to_string(),
            xs_security_template: XsSecurityTemplate::default(),
        }
    }

    pub fn with_default_id(mut self, id: impl Into<String>) -> Self {
        self.default_id = Some(id.into());
        self
    }

    pub fn with_business_solution(mut self, business_solution: impl Into<String>) -> Self {
        self.business_solution = business_solution.into();
        self
    }

    pub fn with_topology(mut self, topology: Option<Topology>) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_xs_security_template(mut self, template: XsSecurityTemplate) -> Self {
        self.xs_security_template = template;
        self
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub descriptor: Descriptor,
    pub topology: Topology,
    pub provisioning: ProvisionReport,
}

/// Runs the synthesis pipeline against a storage backend and a CF client
pub struct DescriptorAssembler<'a, B: StorageBackend, C: CfClient> {
    storage: &'a B,
    client: &'a C,
}

impl<'a, B: StorageBackend, C: CfClient> DescriptorAssembler<'a, B, C> {
    pub fn new(storage: &'a B, client: &'a C) -> Self {
        Self { storage, client }
    }

    /// Validate the business services declared in `resources_path` against the catalog
    ///
    /// Returns the instance names of services with OData v2/v4 support.
    pub async fn resolve_business_services(&self, resources_path: &str) -> DeployResult<Vec<String>> {
        let resources = DescriptorLoader::new(self.storage)
            .read_business_services(resources_path)
            .await
            .map_err(|e| DeployError::from_read(resources_path, e))?;

        let candidates = business_services_from_resources(&resources);
        Ok(resolve_business_services(self.client, &candidates).await?)
    }

    /// Synthesize without provisioning or writing
    pub async fn plan(&self, request: &DeployRequest) -> DeployResult<(Descriptor, Topology, Vec<String>)> {
        let descriptor = self.load(request).await?;
        let initial_services = descriptor.service_labels();
        let topology = resolve_or_detect(&descriptor, request.topology);

        let ctx = SynthesisContext::new(
            request.adp_project_name.as_str(),
            request.business_service.as_str(),
            topology,
            request.timestamp.as_str(),
        )
        .with_business_solution(request.business_solution.as_str());

        let descriptor = synthesize(descriptor, &ctx);

        for issue in validate_descriptor(&descriptor).issues {
            warn!("Descriptor {}: {}", request.descriptor_path, issue);
        }

        Ok((descriptor, topology, initial_services))
    }

    /// Full run: synthesize, provision, then write the descriptor once
    pub async fn run(&self, request: &DeployRequest) -> DeployResult<DeployOutcome> {
        let (descriptor, topology, initial_services) = self.plan(request).await?;

        let provisioning = ServiceProvisioner::new(self.client)
            .with_template(request.xs_security_template.clone())
            .provision(&descriptor, &initial_services, &request.timestamp)
            .await?;

        DescriptorSaver::new(self.storage)
            .save(&request.descriptor_path, &descriptor)
            .await
            .map_err(|source| DeployError::Write {
                path: request.descriptor_path.clone(),
                source,
            })?;

        info!(
            "Deployment descriptor {} ready ({} topology, {} instance(s) created)",
            request.descriptor_path,
            topology,
            provisioning.created.len()
        );

        Ok(DeployOutcome {
            descriptor,
            topology,
            provisioning,
        })
    }

    async fn load(&self, request: &DeployRequest) -> DeployResult<Descriptor> {
        let loader = DescriptorLoader::new(self.storage);
        let path = request.descriptor_path.as_str();
        let loaded = match &request.default_id {
            Some(default_id) => loader.load_or_default(path, default_id).await,
            None => loader.load(path).await,
        };
        loaded.map_err(|e| DeployError::from_read(path, e))
    }
}
