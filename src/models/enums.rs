//! Enums shared by the descriptor models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource type for service instances created and owned by the deployment
pub const MANAGED_SERVICE: &str = "org.cloudfoundry.managed-service";

/// Application router topology of a deployment descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// A Node.js approuter module deployed with the application
    Standalone,
    /// The platform-provided router, reached through destinations
    Managed,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Standalone => write!(f, "standalone"),
            Topology::Managed => write!(f, "managed"),
        }
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standalone" => Ok(Topology::Standalone),
            "managed" => Ok(Topology::Managed),
            other => Err(format!("Unknown approuter topology: {}", other)),
        }
    }
}

/// Platform type of a module
///
/// Types this crate does not generate are kept as [`ModuleType::Other`] and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModuleType {
    ApprouterNodejs,
    ApplicationContent,
    Html5,
    Other(String),
}

impl ModuleType {
    pub fn as_str(&self) -> &str {
        match self {
            ModuleType::ApprouterNodejs => "approuter.nodejs",
            ModuleType::ApplicationContent => "com.sap.application.content",
            ModuleType::Html5 => "html5",
            ModuleType::Other(value) => value,
        }
    }
}

impl From<String> for ModuleType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "approuter.nodejs" => ModuleType::ApprouterNodejs,
            "com.sap.application.content" => ModuleType::ApplicationContent,
            "html5" => ModuleType::Html5,
            _ => ModuleType::Other(value),
        }
    }
}

impl From<ModuleType> for String {
    fn from(value: ModuleType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_type_keeps_unknown_strings() {
        let parsed: ModuleType = serde_yaml::from_str("nodejs").unwrap();
        assert_eq!(parsed, ModuleType::Other("nodejs".to_string()));
        assert_eq!(serde_yaml::to_string(&parsed).unwrap().trim(), "nodejs");
    }

    #[test]
    fn test_module_type_known_values() {
        let parsed: ModuleType = serde_yaml::from_str("com.sap.application.content").unwrap();
        assert_eq!(parsed, ModuleType::ApplicationContent);
    }

    #[test]
    fn test_topology_from_str() {
        assert_eq!("Standalone".parse::<Topology>(), Ok(Topology::Standalone));
        assert_eq!("managed".parse::<Topology>(), Ok(Topology::Managed));
        assert!("hybrid".parse::<Topology>().is_err());
    }
}
