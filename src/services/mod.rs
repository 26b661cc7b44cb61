//! Service catalog resolution and instance provisioning

pub mod catalog;
pub mod provisioner;
pub mod security;

pub use catalog::{
    CatalogError, EXPECTED_RESOURCE_SYNTAX, business_services_from_resources,
    filter_odata_services, resolve_business_services,
};
pub use provisioner::{ALWAYS_EXEMPT_SERVICES, ProvisionError, ProvisionReport, ServiceProvisioner};
pub use security::XsSecurityTemplate;
