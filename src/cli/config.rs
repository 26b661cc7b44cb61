//! CLI configuration types
//!
//! Loaded from a TOML file; command line flags override file values.

use crate::cli::error::CliError;
use crate::models::Topology;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cloud Foundry backend used for catalog queries and instance creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CfBackend {
    /// CF v3 REST API
    #[default]
    Api,
    /// The `cf` command line
    Cli,
}

/// Cloud Foundry connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CfConfig {
    pub backend: CfBackend,
    /// Cloud Controller URL, required by the API backend
    pub api_url: Option<String>,
    /// Target space, required by the API backend to create instances
    pub space_guid: Option<String>,
    /// Environment variable holding the OAuth bearer token
    pub token_env: String,
    /// `cf` executable for the CLI backend
    pub cf_binary: String,
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            backend: CfBackend::Api,
            api_url: None,
            space_guid: None,
            token_env: "CF_OAUTH_TOKEN".to_string(),
            cf_binary: "cf".to_string(),
        }
    }
}

/// Main deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Project directory all relative paths resolve against
    pub project_dir: PathBuf,
    /// Descriptor file inside the project directory
    pub descriptor_path: String,
    /// `ID` used when the descriptor does not exist yet
    pub default_id: Option<String>,
    pub adp_project_name: Option<String>,
    /// Business service instance; resolved from `declared_resources` when unset
    pub business_service: Option<String>,
    pub business_solution: String,
    /// Approuter topology; detected from the descriptor when unset
    pub approuter: Option<Topology>,
    /// YAML file declaring business service resources
    pub declared_resources: Option<String>,
    /// Override for the xs-security.json template
    pub xs_security_template: Option<PathBuf>,
    pub cf: CfConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            descriptor_path: "mta.yaml".to_string(),
            default_id: None,
            adp_project_name: None,
            business_service: None,
            business_solution: String::new(),
            approuter: None,
            declared_resources: None,
            xs_security_template: None,
            cf: CfConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()))
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_dir = path.into();
        self
    }

    /// Set the descriptor path
    pub fn with_descriptor_path(mut self, path: impl Into<String>) -> Self {
        self.descriptor_path = path.into();
        self
    }

    /// Set the adaptation project name
    pub fn with_adp_project_name(mut self, name: impl Into<String>) -> Self {
        self.adp_project_name = Some(name.into());
        self
    }

    /// Set the business service instance name
    pub fn with_business_service(mut self, name: impl Into<String>) -> Self {
        self.business_service = Some(name.into());
        self
    }

    /// Set the business solution name
    pub fn with_business_solution(mut self, name: impl Into<String>) -> Self {
        self.business_solution = name.into();
        self
    }

    /// Set the approuter topology
    pub fn with_approuter(mut self, topology: Topology) -> Self {
        self.approuter = Some(topology);
        self
    }

    /// Set the CF backend
    pub fn with_backend(mut self, backend: CfBackend) -> Self {
        self.cf.backend = backend;
        self
    }

    /// Adaptation project name, required for provisioning
    pub fn require_adp_project_name(&self) -> Result<&str, CliError> {
        self.adp_project_name.as_deref().ok_or_else(|| {
            CliError::InvalidArgument("--adp-project-name (or adp_project_name) is required".to_string())
        })
    }
}
