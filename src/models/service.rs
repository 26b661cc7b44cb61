//! Cloud Foundry catalog and instance records

use serde::{Deserialize, Serialize};

/// Catalog metadata key holding the OData protocol version of an offering
const SAP_SERVICE_KEY: &str = "sapservice";
const ODATA_VERSION_KEY: &str = "odataversion";

/// Paged list envelope returned by the CF v3 API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CfListResponse<T> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Default for CfListResponse<T> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            pagination: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

/// Service offering as listed in the marketplace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_catalog: Option<BrokerCatalog>,
}

impl ServiceOffering {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: None,
            tags: Vec::new(),
            broker_catalog: None,
        }
    }

    /// Offering whose catalog metadata declares `sapservice.odataversion`
    pub fn with_odata_version(mut self, version: impl Into<String>) -> Self {
        self.broker_catalog = Some(BrokerCatalog {
            metadata: Some(serde_json::json!({
                SAP_SERVICE_KEY: { ODATA_VERSION_KEY: version.into() }
            })),
        });
        self
    }

    /// `sapservice.odataversion` from the broker catalog metadata, if declared as a string
    pub fn odata_version(&self) -> Option<&str> {
        self.broker_catalog
            .as_ref()?
            .metadata
            .as_ref()?
            .get(SAP_SERVICE_KEY)?
            .get(ODATA_VERSION_KEY)?
            .as_str()
    }
}

/// Free-form catalog data published by the service broker
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BrokerCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Existing service instance in the target space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInstance {
    pub name: String,
    pub guid: String,
}

/// Service plan of an offering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServicePlan {
    pub name: String,
    pub guid: String,
}

/// Business service candidate taken from a declared resource
///
/// `name` is the instance to provision, `label` the catalog offering it must resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessServiceResource {
    pub name: String,
    pub label: String,
}
