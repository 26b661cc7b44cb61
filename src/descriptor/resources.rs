//! Resource synthesis

use super::naming::Names;
use crate::models::{Descriptor, Resource, Topology};
use serde_yaml::{Mapping, Value};
use tracing::debug;

pub const HTML5_APPS_REPO: &str = "html5-apps-repo";
pub const XSUAA: &str = "xsuaa";
pub const DESTINATION: &str = "destination";
pub const PORTAL: &str = "portal";

const XS_SECURITY_PATH: &str = "./xs-security.json";
const DESTINATION_CONFIG_VERSION: &str = "1.0.0";

/// Add the resources the topology needs; present names are left untouched
pub fn ensure_resources(
    descriptor: &mut Descriptor,
    names: &Names,
    topology: Topology,
    timestamp: &str,
) {
    let xs_security_name = descriptor.xs_security_name(timestamp);

    let mut wanted = vec![
        Resource::managed(names.html_repo_host(), HTML5_APPS_REPO, "app-host")
            .with_service_name(names.html_repo_host_instance()),
        Resource::managed(names.uaa(), XSUAA, "application")
            .with_path(XS_SECURITY_PATH)
            .with_service_name(format!("{}-xsuaa-service", xs_security_name)),
    ];

    match topology {
        Topology::Managed => {
            wanted.push(
                Resource::managed(names.destination(), DESTINATION, "lite")
                    .with_service_name(names.destination_instance())
                    .with_config(destination_config()),
            );
        }
        Topology::Standalone => {
            wanted.push(Resource::managed(names.portal_resources(), PORTAL, "standard"));
            wanted.push(Resource::managed(names.html_repo_runtime(), HTML5_APPS_REPO, "app-runtime"));
        }
    }

    for resource in wanted {
        let name = resource.name.clone();
        if descriptor.add_resource_if_absent(resource) {
            debug!(resource = %name, "added resource");
        }
    }
}

fn destination_config() -> Mapping {
    let mut config = Mapping::new();
    config.insert(Value::from("HTML5Runtime_enabled"), Value::from(true));
    config.insert(Value::from("version"), Value::from(DESTINATION_CONFIG_VERSION));
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_resources() {
        let mut descriptor = Descriptor::new("My.App");
        ensure_resources(&mut descriptor, &Names::new("my.app"), Topology::Managed, "42");

        assert_eq!(
            descriptor.resource_names(),
            vec!["my.app_html_repo_host", "my.app_uaa", "my.app-destination"]
        );

        let uaa = descriptor.find_resource("my.app_uaa").unwrap();
        assert_eq!(uaa.parameters.service.as_deref(), Some("xsuaa"));
        assert_eq!(uaa.parameters.service_plan.as_deref(), Some("application"));
        assert_eq!(uaa.parameters.path.as_deref(), Some("./xs-security.json"));
        assert_eq!(uaa.instance_name(), "my_app_42-xsuaa-service");

        let destination = descriptor.find_resource("my.app-destination").unwrap();
        let config = destination.parameters.config.as_ref().unwrap();
        assert_eq!(config.get("HTML5Runtime_enabled"), Some(&Value::from(true)));
    }

    #[test]
    fn test_existing_resource_parameters_untouched() {
        let mut descriptor = Descriptor::new("p");
        descriptor
            .resources
            .push(Resource::managed("p_uaa", "xsuaa", "broker").with_service_name("my-uaa"));

        ensure_resources(&mut descriptor, &Names::new("p"), Topology::Standalone, "1");

        assert_eq!(descriptor.resources.len(), 4);
        let uaa = &descriptor.resources[0];
        assert_eq!(uaa.parameters.service_plan.as_deref(), Some("broker"));
        assert_eq!(uaa.instance_name(), "my-uaa");
        assert!(uaa.parameters.path.is_none());
    }
}
