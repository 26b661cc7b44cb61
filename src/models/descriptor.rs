//! Multi-target application descriptor model
//!
//! Mirrors the `mta.yaml` document layout. Keys this crate does not interpret
//! are captured in the `extra` mapping of the nearest struct so a hand-edited
//! descriptor survives a load/save cycle.

use super::enums::{MANAGED_SERVICE, ModuleType};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// Root deployment descriptor document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Descriptor {
    #[serde(rename = "_schema-version", skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Descriptor {
    /// Create an empty descriptor for the given project identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            schema_version: Some("3.2.0".to_string()),
            id: id.into(),
            version: Some("0.0.1".to_string()),
            modules: Vec::new(),
            resources: Vec::new(),
            extra: Mapping::new(),
        }
    }

    /// Lower-cased `ID`, the prefix of every generated module and resource name
    pub fn project_name(&self) -> String {
        self.id.to_lowercase()
    }

    /// `xsappname` for a run: lower-cased `ID` with dots as underscores, suffixed with the timestamp
    pub fn xs_security_name(&self, timestamp: &str) -> String {
        format!("{}_{}", self.project_name().replace('.', "_"), timestamp)
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn find_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Return the module with `name`, appending the one built by `create` if absent.
    pub fn module_or_insert_with(
        &mut self,
        name: &str,
        create: impl FnOnce() -> Module,
    ) -> &mut Module {
        let index = match self.modules.iter().position(|m| m.name == name) {
            Some(index) => index,
            None => {
                self.modules.push(create());
                self.modules.len() - 1
            }
        };
        &mut self.modules[index]
    }

    /// Append a resource unless one with the same name exists. Returns true if appended.
    pub fn add_resource_if_absent(&mut self, resource: Resource) -> bool {
        if self.find_resource(&resource.name).is_some() {
            return false;
        }
        self.resources.push(resource);
        true
    }

    /// Service labels declared by the resources, in document order
    pub fn service_labels(&self) -> Vec<String> {
        self.resources
            .iter()
            .filter_map(|r| r.parameters.service.clone())
            .collect()
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn resource_names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Deployable unit of the descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ModuleParameters>,
    #[serde(rename = "build-parameters", skip_serializing_if = "Option::is_none")]
    pub build_parameters: Option<BuildParameters>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Module {
    pub fn new(name: impl Into<String>, module_type: ModuleType) -> Self {
        Self {
            name: name.into(),
            module_type,
            path: None,
            requires: Vec::new(),
            parameters: None,
            build_parameters: None,
            extra: Mapping::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_parameters(mut self, parameters: ModuleParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_build_parameters(mut self, build_parameters: BuildParameters) -> Self {
        self.build_parameters = Some(build_parameters);
        self
    }

    pub fn find_requirement(&self, name: &str) -> Option<&Requirement> {
        self.requires.iter().find(|r| r.name == name)
    }

    /// Append `requirement` unless one with the same name exists. Returns true if appended.
    pub fn add_requirement_if_absent(&mut self, requirement: Requirement) -> bool {
        add_if_absent(&mut self.requires, requirement)
    }

    pub fn requirement_names(&self) -> Vec<&str> {
        self.requires.iter().map(|r| r.name.as_str()).collect()
    }
}

pub(crate) fn add_if_absent(requires: &mut Vec<Requirement>, requirement: Requirement) -> bool {
    if requires.iter().any(|r| r.name == requirement.name) {
        return false;
    }
    requires.push(requirement);
    true
}

/// Dependency of a module on a resource or another module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<RequirementParameters>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
    #[serde(rename = "target-path", skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Requirement {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: None,
            artifacts: Vec::new(),
            target_path: None,
            extra: Mapping::new(),
        }
    }

    pub fn with_service_key(mut self, key_name: impl Into<String>) -> Self {
        self.parameters_mut().service_key = Some(ServiceKey {
            name: key_name.into(),
            extra: Mapping::new(),
        });
        self
    }

    pub fn with_content_target(mut self) -> Self {
        self.parameters_mut().content_target = Some(true);
        self
    }

    pub fn with_artifact(mut self, artifact: impl Into<String>, target_path: impl Into<String>) -> Self {
        self.artifacts.push(artifact.into());
        self.target_path = Some(target_path.into());
        self
    }

    /// Name of the service key this requirement binds, if any
    pub fn service_key_name(&self) -> Option<&str> {
        self.parameters
            .as_ref()
            .and_then(|p| p.service_key.as_ref())
            .map(|k| k.name.as_str())
    }

    fn parameters_mut(&mut self) -> &mut RequirementParameters {
        self.parameters.get_or_insert_with(RequirementParameters::default)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequirementParameters {
    #[serde(rename = "service-key", skip_serializing_if = "Option::is_none")]
    pub service_key: Option<ServiceKey>,
    #[serde(rename = "content-target", skip_serializing_if = "Option::is_none")]
    pub content_target: Option<bool>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceKey {
    pub name: String,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModuleParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(rename = "disk-quota", skip_serializing_if = "Option::is_none")]
    pub disk_quota: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Router content carried by a destination-content module
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<ContentInstance>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentInstance {
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_destinations_policy: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Router destination pointing at a service instance through one of its keys
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ServiceInstanceName")]
    pub service_instance_name: String,
    #[serde(rename = "ServiceKeyName")]
    pub service_key_name: String,
    #[serde(rename = "Authentication", skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(rename = "sap.cloud.service", skip_serializing_if = "Option::is_none")]
    pub cloud_service: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(rename = "supported-platforms", skip_serializing_if = "Option::is_none")]
    pub supported_platforms: Option<Vec<String>>,
    #[serde(rename = "build-result", skip_serializing_if = "Option::is_none")]
    pub build_result: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,
    #[serde(rename = "no-source", skip_serializing_if = "Option::is_none")]
    pub no_source: Option<bool>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl BuildParameters {
    /// Append a build-time requirement unless one with the same name exists
    pub fn add_requirement_if_absent(&mut self, requirement: Requirement) -> bool {
        add_if_absent(&mut self.requires, requirement)
    }
}

/// Backing service declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub parameters: ResourceParameters,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Resource {
    /// Managed service resource for `service` on `plan`
    pub fn managed(name: impl Into<String>, service: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: MANAGED_SERVICE.to_string(),
            parameters: ResourceParameters {
                service: Some(service.into()),
                service_plan: Some(plan.into()),
                ..ResourceParameters::default()
            },
            extra: Mapping::new(),
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.parameters.service_name = Some(service_name.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.parameters.path = Some(path.into());
        self
    }

    pub fn with_config(mut self, config: Mapping) -> Self {
        self.parameters.config = Some(config);
        self
    }

    /// Instance name to provision: `service-name`, falling back to the resource name
    pub fn instance_name(&self) -> &str {
        self.parameters.service_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(rename = "service-plan", skip_serializing_if = "Option::is_none")]
    pub service_plan: Option<String>,
    #[serde(rename = "service-name", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Mapping>,
    #[serde(flatten)]
    pub extra: Mapping,
}
