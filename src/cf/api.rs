//! CF v3 API client
//!
//! Implements CfClient over the Cloud Controller REST API.
//!
//! ## Security
//!
//! Filter values are validated and URL-encoded before they are placed in a
//! query string.

use super::{CfClient, CfError, CreateServiceRequest, validate_filter_value};
use crate::models::{CfListResponse, ServiceInstance, ServiceOffering, ServicePlan};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Upper bound on pages followed for one list query
const MAX_PAGES: usize = 50;

/// Cloud Controller v3 client
pub struct CfApiClient {
    base_url: String,
    auth_token: Option<String>,
    space_guid: Option<String>,
    client: reqwest::Client,
}

impl CfApiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Cloud Controller URL (e.g., "https://api.cf.eu10.hana.ondemand.com")
    /// * `auth_token` - Optional bearer token, without the `bearer ` prefix
    ///
    /// # Example
    ///
    /// ```rust
    /// use cf_mta_sdk::cf::api::CfApiClient;
    ///
    /// let client = CfApiClient::new(
    ///     "https://api.cf.example.com",
    ///     Some("token".to_string()),
    /// )
    /// .with_space("2f35e4b8-5c7a-4bb5-9a43-6f1b8f5d1c11");
    /// ```
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
            space_guid: None,
            client: reqwest::Client::new(),
        }
    }

    /// Scope instance queries and creations to a space
    pub fn with_space(mut self, space_guid: impl Into<String>) -> Self {
        self.space_guid = Some(space_guid.into());
        self
    }

    /// Build a request with authentication headers
    fn build_request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, url);

        if let Some(ref token) = self.auth_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a list endpoint and follow `pagination.next` links
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<CfListResponse<T>, CfError> {
        let mut collected = CfListResponse::default();
        let mut next = Some(self.url(path));
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(CfError::ApiError {
                    path: path.to_string(),
                    status: 0,
                    message: format!("more than {} result pages", MAX_PAGES),
                });
            }

            debug!(url = %url, "CF API GET");
            let response = self
                .build_request(reqwest::Method::GET, &url)
                .send()
                .await
                .map_err(|e| CfError::NetworkError(format!("GET {} failed: {}", path, e)))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(CfError::ApiError {
                    path: path.to_string(),
                    status: status.as_u16(),
                    message,
                });
            }

            let page: CfListResponse<T> = response.json().await.map_err(|e| {
                CfError::SerializationError(format!("Failed to parse response of {}: {}", path, e))
            })?;

            next = page
                .pagination
                .as_ref()
                .and_then(|p| p.next.as_ref())
                .map(|link| link.href.clone());
            collected.pagination = page.pagination;
            collected.resources.extend(page.resources);
        }

        Ok(collected)
    }

    fn name_filter(names: &[String]) -> Result<String, CfError> {
        for name in names {
            validate_filter_value(name)?;
        }
        Ok(names
            .iter()
            .map(|n| urlencoding::encode(n).into_owned())
            .collect::<Vec<_>>()
            .join(","))
    }

    fn space_filter(&self) -> String {
        self.space_guid
            .as_ref()
            .map(|guid| format!("&space_guids={}", urlencoding::encode(guid)))
            .unwrap_or_default()
    }

    async fn find_plan(&self, offering: &str, plan: &str) -> Result<ServicePlan, CfError> {
        validate_filter_value(offering)?;
        validate_filter_value(plan)?;

        let path = format!(
            "/v3/service_plans?names={}&service_offering_names={}{}",
            urlencoding::encode(plan),
            urlencoding::encode(offering),
            self.space_filter()
        );
        let plans: CfListResponse<ServicePlan> = self.get_all(&path).await?;

        plans
            .resources
            .into_iter()
            .find(|p| p.name == plan)
            .ok_or_else(|| CfError::PlanNotFound {
                offering: offering.to_string(),
                plan: plan.to_string(),
            })
    }
}

#[async_trait(?Send)]
impl CfClient for CfApiClient {
    async fn query_service_offerings(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceOffering>, CfError> {
        if names.is_empty() {
            return Ok(CfListResponse::default());
        }
        let path = format!("/v3/service_offerings?names={}", Self::name_filter(names)?);
        self.get_all(&path).await
    }

    async fn query_service_instances(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceInstance>, CfError> {
        if names.is_empty() {
            return Ok(CfListResponse::default());
        }
        let path = format!(
            "/v3/service_instances?names={}{}",
            Self::name_filter(names)?,
            self.space_filter()
        );
        self.get_all(&path).await
    }

    async fn create_service_instance(&self, request: &CreateServiceRequest) -> Result<(), CfError> {
        let space_guid = self.space_guid.as_ref().ok_or_else(|| {
            CfError::ConfigError("A space GUID is required to create service instances".to_string())
        })?;

        let plan = self.find_plan(&request.offering, &request.plan).await?;

        let mut body = serde_json::json!({
            "type": "managed",
            "name": request.instance_name,
            "relationships": {
                "space": { "data": { "guid": space_guid } },
                "service_plan": { "data": { "guid": plan.guid } }
            }
        });
        if let Some(parameters) = &request.parameters {
            body["parameters"] = parameters.clone();
        }

        debug!(instance = %request.instance_name, plan = %plan.guid, "CF API POST /v3/service_instances");
        let response = self
            .build_request(reqwest::Method::POST, &self.url("/v3/service_instances"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                CfError::NetworkError(format!(
                    "Failed to create service instance {}: {}",
                    request.instance_name, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CfError::ApiError {
                path: "/v3/service_instances".to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_filter_encodes_and_joins() {
        let filter =
            CfApiClient::name_filter(&["svc a".to_string(), "svcB".to_string()]).unwrap();
        assert_eq!(filter, "svc%20a,svcB");
    }

    #[test]
    fn test_name_filter_rejects_commas() {
        let result = CfApiClient::name_filter(&["a,b".to_string()]);
        assert!(matches!(result, Err(CfError::InvalidRequest(_))));
    }

    #[test]
    fn test_space_filter() {
        let client = CfApiClient::new("https://api.example.com/", None);
        assert_eq!(client.space_filter(), "");
        assert_eq!(client.url("/v3/info"), "https://api.example.com/v3/info");

        let client = client.with_space("guid-1");
        assert_eq!(client.space_filter(), "&space_guids=guid-1");
    }

    #[tokio::test]
    async fn test_create_requires_space() {
        let client = CfApiClient::new("http://127.0.0.1:9", None);
        let request = CreateServiceRequest::new("destination", "lite", "dest");
        let result = client.create_service_instance(&request).await;
        assert!(matches!(result, Err(CfError::ConfigError(_))));
    }
}
