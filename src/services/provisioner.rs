//! Service instance provisioning
//!
//! Creates the instances backing the descriptor's resources, skipping services
//! that were declared before synthesis, the always-exempt labels, and
//! instances that already exist in the space. Creations run one after another
//! in resource order and the first failure stops the run. Instances created
//! before a failure are not removed.

use super::security::XsSecurityTemplate;
use crate::cf::{CfClient, CfError, CreateServiceRequest};
use crate::descriptor::resources::{HTML5_APPS_REPO, PORTAL, XSUAA};
use crate::models::{Descriptor, Resource};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Service labels never provisioned by this engine
pub const ALWAYS_EXEMPT_SERVICES: [&str; 2] = [PORTAL, HTML5_APPS_REPO];

/// Error during provisioning
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Failed to create service instance '{instance}' of '{offering}': {source}")]
    ServiceCreation {
        instance: String,
        offering: String,
        #[source]
        source: CfError,
    },
    #[error("Security descriptor for service instance '{instance}' could not be parsed: {message}")]
    SecurityDescriptor { instance: String, message: String },
    #[error("Resource '{resource}' has no service plan")]
    MissingPlan { resource: String },
    #[error("Failed to query existing service instances: {0}")]
    InstanceQuery(#[source] CfError),
}

/// Outcome of a provisioning run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Instance names created, in creation order
    pub created: Vec<String>,
    /// Instance names skipped because they already exist in the space
    pub already_present: Vec<String>,
}

/// Labels excluded from provisioning: the initial services plus [`ALWAYS_EXEMPT_SERVICES`]
pub fn exclusion_set<S: AsRef<str>>(initial_services: &[S]) -> BTreeSet<String> {
    initial_services
        .iter()
        .map(|s| s.as_ref().to_string())
        .chain(ALWAYS_EXEMPT_SERVICES.iter().map(|s| s.to_string()))
        .collect()
}

/// Resources whose service label is not excluded, in descriptor order
pub fn pending_resources<'r>(resources: &'r [Resource], excluded: &BTreeSet<String>) -> Vec<&'r Resource> {
    resources
        .iter()
        .filter(|resource| match resource.parameters.service.as_deref() {
            Some(label) => !excluded.contains(label),
            None => {
                warn!("Resource '{}' has no service label, not provisioning it", resource.name);
                false
            }
        })
        .collect()
}

/// Creates missing service instances through a [`CfClient`]
pub struct ServiceProvisioner<'a, C: CfClient> {
    client: &'a C,
    template: XsSecurityTemplate,
}

impl<'a, C: CfClient> ServiceProvisioner<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            template: XsSecurityTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: XsSecurityTemplate) -> Self {
        self.template = template;
        self
    }

    /// Build the creation call for one resource
    ///
    /// XSUAA resources carry the rendered security descriptor with `xsappname`
    /// set to the descriptor's XS security name for `timestamp`.
    pub fn creation_request(
        &self,
        descriptor: &Descriptor,
        resource: &Resource,
        timestamp: &str,
    ) -> Result<CreateServiceRequest, ProvisionError> {
        let offering = resource.parameters.service.clone().unwrap_or_default();
        let plan = resource
            .parameters
            .service_plan
            .clone()
            .ok_or_else(|| ProvisionError::MissingPlan {
                resource: resource.name.clone(),
            })?;
        let instance = resource.instance_name().to_string();

        let mut request = CreateServiceRequest::new(offering, plan, instance);

        if request.offering == XSUAA {
            let xsappname = descriptor.xs_security_name(timestamp);
            let config = self.template.render(&xsappname).map_err(|message| {
                ProvisionError::SecurityDescriptor {
                    instance: request.instance_name.clone(),
                    message,
                }
            })?;
            request = request.with_parameters(config);
        }

        Ok(request)
    }

    /// Provision every pending resource of `descriptor`
    pub async fn provision(
        &self,
        descriptor: &Descriptor,
        initial_services: &[String],
        timestamp: &str,
    ) -> Result<ProvisionReport, ProvisionError> {
        let excluded = exclusion_set(initial_services);
        let pending = pending_resources(&descriptor.resources, &excluded);
        let mut report = ProvisionReport::default();

        if pending.is_empty() {
            info!("All service instances are already declared, nothing to provision");
            return Ok(report);
        }

        let names: Vec<String> = pending.iter().map(|r| r.instance_name().to_string()).collect();
        let live: BTreeSet<String> = self
            .client
            .query_service_instances(&names)
            .await
            .map_err(ProvisionError::InstanceQuery)?
            .resources
            .into_iter()
            .map(|instance| instance.name)
            .collect();

        for resource in pending {
            let instance = resource.instance_name();
            if live.contains(instance) {
                info!("Service instance '{}' already exists, skipping", instance);
                report.already_present.push(instance.to_string());
                continue;
            }

            let request = self.creation_request(descriptor, resource, timestamp)?;
            info!(
                "Creating service instance '{}' ({} / {})",
                request.instance_name, request.offering, request.plan
            );
            self.client
                .create_service_instance(&request)
                .await
                .map_err(|source| ProvisionError::ServiceCreation {
                    instance: request.instance_name.clone(),
                    offering: request.offering.clone(),
                    source,
                })?;
            report.created.push(request.instance_name);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_set_includes_exempt_labels() {
        let excluded = exclusion_set(&["xsuaa"]);
        assert!(excluded.contains("xsuaa"));
        assert!(excluded.contains("portal"));
        assert!(excluded.contains("html5-apps-repo"));
        assert_eq!(excluded.len(), 3);
    }

    #[test]
    fn test_pending_resources() {
        let resources = vec![
            Resource::managed("p_uaa", "xsuaa", "application"),
            Resource::managed("p-destination", "destination", "lite"),
            Resource::managed("p_html_repo_host", "html5-apps-repo", "app-host"),
            Resource::managed("portal_resources_p", "portal", "standard"),
        ];
        let excluded = exclusion_set(&["xsuaa"]);

        let pending: Vec<_> = pending_resources(&resources, &excluded)
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(pending, vec!["p-destination"]);
    }
}
