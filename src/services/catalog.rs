//! Business service catalog resolution
//!
//! Business service candidates come from declared resources. Each candidate
//! label is looked up in the CF marketplace, and only offerings whose broker
//! catalog declares `sapservice.odataversion` as `v2` or `v4` are kept.

use crate::cf::{CfClient, CfError};
use crate::models::{BusinessServiceResource, Resource, ServiceOffering};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// OData versions a generated application can consume
pub const SUPPORTED_ODATA_VERSIONS: [&str; 2] = ["v2", "v4"];

/// Shape of a resource block that declares a business service
pub const EXPECTED_RESOURCE_SYNTAX: &str = "\
resources:
  - name: <resource-name>
    type: org.cloudfoundry.<managed|existing>-service
    parameters:
      service: <service-offering-label>
      service-name: <service-instance-name>
      service-plan: <service-plan>";

/// Error during business service resolution
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(
        "No business service with OData v2 or v4 support was found. \
         Declare the service in a resource block like:\n{}",
        EXPECTED_RESOURCE_SYNTAX
    )]
    NoBusinessServicesFound,
    #[error("Service catalog query failed: {0}")]
    QueryFailed(#[from] CfError),
}

/// Extract business service candidates from declared resources
///
/// Resources without a `service` label are logged and skipped. The instance
/// name is `service-name`, falling back to the resource name.
pub fn business_services_from_resources(resources: &[Resource]) -> Vec<BusinessServiceResource> {
    resources
        .iter()
        .filter_map(|resource| match resource.parameters.service.as_deref() {
            Some(label) if !label.trim().is_empty() => Some(BusinessServiceResource {
                name: resource.instance_name().to_string(),
                label: label.to_string(),
            }),
            _ => {
                warn!(
                    "Resource '{}' has no 'service' parameter and is not considered a business service",
                    resource.name
                );
                None
            }
        })
        .collect()
}

/// Distinct candidate labels, in first-seen order
pub fn candidate_labels(candidates: &[BusinessServiceResource]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert(c.label.as_str()))
        .map(|c| c.label.clone())
        .collect()
}

/// Keep the instance names of candidates whose offering supports OData v2 or v4
///
/// Results follow the order of `offerings`. A label requested by several
/// candidates maps to the first of them.
pub fn filter_odata_services(
    candidates: &[BusinessServiceResource],
    offerings: &[ServiceOffering],
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();

    for offering in offerings {
        let Some(candidate) = candidates.iter().find(|c| c.label == offering.name) else {
            continue;
        };

        match offering.odata_version() {
            Some(version) if SUPPORTED_ODATA_VERSIONS.contains(&version) => {
                if !kept.contains(&candidate.name) {
                    kept.push(candidate.name.clone());
                }
            }
            version => warn!(
                "Service '{}' does not support OData v2/v4 (odataversion: {}) and will be ignored",
                offering.name,
                version.unwrap_or("<none>")
            ),
        }
    }

    kept
}

/// Validate candidates against the live catalog with a single offering query
pub async fn resolve_business_services<C: CfClient>(
    client: &C,
    candidates: &[BusinessServiceResource],
) -> Result<Vec<String>, CatalogError> {
    let labels = candidate_labels(candidates);
    if labels.is_empty() {
        return Err(CatalogError::NoBusinessServicesFound);
    }

    let offerings = client.query_service_offerings(&labels).await?;
    let kept = filter_odata_services(candidates, &offerings.resources);

    if kept.is_empty() {
        return Err(CatalogError::NoBusinessServicesFound);
    }

    info!("Resolved {} business service(s): {}", kept.len(), kept.join(", "));
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, label: &str) -> BusinessServiceResource {
        BusinessServiceResource {
            name: name.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_filter_keeps_only_v2_v4() {
        let candidates = vec![
            candidate("svcA", "svcA"),
            candidate("svcB", "svcB"),
            candidate("svcC", "svcC"),
        ];
        let offerings = vec![
            ServiceOffering::new("svcA").with_odata_version("v2"),
            ServiceOffering::new("svcB").with_odata_version("v1"),
            ServiceOffering::new("svcC"),
        ];

        assert_eq!(filter_odata_services(&candidates, &offerings), vec!["svcA"]);
    }

    #[test]
    fn test_filter_maps_label_to_instance_name() {
        let candidates = vec![candidate("orders-instance", "orders-label")];
        let offerings = vec![
            ServiceOffering::new("orders-label").with_odata_version("v4"),
            ServiceOffering::new("not-requested").with_odata_version("v4"),
        ];

        assert_eq!(
            filter_odata_services(&candidates, &offerings),
            vec!["orders-instance"]
        );
    }

    #[test]
    fn test_filter_version_is_case_sensitive() {
        let candidates = vec![candidate("svc", "svc")];
        let offerings = vec![ServiceOffering::new("svc").with_odata_version("V2")];
        assert!(filter_odata_services(&candidates, &offerings).is_empty());
    }

    #[test]
    fn test_extraction_skips_unlabelled_resources() {
        let labelled = Resource::managed("orders", "orders-api", "standard").with_service_name("orders-inst");
        let mut unlabelled = Resource::managed("bare", "x", "y");
        unlabelled.parameters.service = None;
        let named_by_resource = Resource::managed("billing", "billing-api", "standard");

        let candidates =
            business_services_from_resources(&[labelled, unlabelled, named_by_resource]);

        assert_eq!(
            candidates,
            vec![
                candidate("orders-inst", "orders-api"),
                candidate("billing", "billing-api")
            ]
        );
    }

    #[test]
    fn test_candidate_labels_are_distinct() {
        let candidates = vec![candidate("a", "x"), candidate("b", "y"), candidate("c", "x")];
        assert_eq!(candidate_labels(&candidates), vec!["x", "y"]);
    }

    #[test]
    fn test_error_message_documents_resource_block() {
        let message = CatalogError::NoBusinessServicesFound.to_string();
        assert!(message.contains("org.cloudfoundry.<managed|existing>-service"));
        assert!(message.contains("service-name:"));
        assert!(message.contains("service-plan:"));
        assert!(message.contains("service:"));
    }
}
