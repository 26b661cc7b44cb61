//! `cf` command line client
//!
//! Implements CfClient by running the Cloud Foundry CLI: `cf curl` for v3
//! queries and `cf create-service` for instance creation. The CLI must be
//! logged in and targeted at the space.
//!
//! `cf curl` exits with status 0 when the Cloud Controller answers with an
//! error, so every response body is checked for an `errors` array before it
//! is read as a list.

use super::{CfClient, CfError, CreateServiceRequest, validate_filter_value};
use crate::models::{CfListResponse, ServiceInstance, ServiceOffering};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info};

/// Client driving the `cf` executable
pub struct CfCliClient {
    program: String,
    /// Space instance queries are scoped to; resolved from `cf target` when unset
    space_guid: OnceLock<String>,
}

impl Default for CfCliClient {
    fn default() -> Self {
        Self::new("cf")
    }
}

impl CfCliClient {
    /// Create a client for the given executable name or path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            space_guid: OnceLock::new(),
        }
    }

    /// Scope instance queries to a space instead of the targeted one
    pub fn with_space(self, space_guid: impl Into<String>) -> Self {
        let _ = self.space_guid.set(space_guid.into());
        self
    }

    /// Run the CLI and return trimmed stdout; a non-zero exit is an error carrying stderr
    async fn execute(&self, args: &[String]) -> Result<String, CfError> {
        let command_line = display_command(&self.program, args);
        debug!(cmd = %command_line, "executing cf command");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| CfError::CommandFailed {
                command: command_line.clone(),
                code: None,
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(CfError::CommandFailed {
                command: command_line,
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn curl<T: DeserializeOwned>(&self, path: &str) -> Result<CfListResponse<T>, CfError> {
        let stdout = self.execute(&["curl".to_string(), path.to_string()]).await?;
        parse_curl_output(path, &stdout)
    }

    /// GUID of the space instance queries run against
    async fn space_guid(&self) -> Result<String, CfError> {
        if let Some(guid) = self.space_guid.get() {
            return Ok(guid.clone());
        }

        let target = self.execute(&["target".to_string()]).await?;
        let space = targeted_space(&target).ok_or_else(|| {
            CfError::ConfigError("No space targeted, run `cf target -s <space>` first".to_string())
        })?;
        let guid = self
            .execute(&["space".to_string(), space.clone(), "--guid".to_string()])
            .await?;
        if guid.is_empty() {
            return Err(CfError::ConfigError(format!(
                "Could not resolve the GUID of space '{}'",
                space
            )));
        }

        debug!(space = %space, guid = %guid, "resolved targeted space");
        Ok(self.space_guid.get_or_init(|| guid).clone())
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
}

/// Read a `cf curl` response body, turning a Cloud Controller error document into an error
fn parse_curl_output<T: DeserializeOwned>(path: &str, stdout: &str) -> Result<CfListResponse<T>, CfError> {
    let body: serde_json::Value = serde_json::from_str(stdout).map_err(|e| {
        CfError::SerializationError(format!("Failed to parse `cf curl {}` output: {}", path, e))
    })?;

    if let Some(errors) = body
        .get("errors")
        .and_then(|e| e.as_array())
        .filter(|errors| !errors.is_empty())
    {
        let message = errors
            .iter()
            .map(|error| {
                let title = error.get("title").and_then(|t| t.as_str()).unwrap_or("CF-Error");
                match error.get("detail").and_then(|d| d.as_str()) {
                    Some(detail) => format!("{}: {}", title, detail),
                    None => title.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CfError::ApiError {
            path: path.to_string(),
            status: 0,
            message,
        });
    }

    serde_json::from_value(body).map_err(|e| {
        CfError::SerializationError(format!("Failed to parse `cf curl {}` output: {}", path, e))
    })
}

/// Space name from `cf target` output
fn targeted_space(target: &str) -> Option<String> {
    target
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("space"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|space| !space.is_empty())
}

/// Command line for logs and errors, with inline configuration elided
fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            parts.push("<config>".to_string());
            hide_next = false;
        } else {
            hide_next = arg == "-c";
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}

/// Arguments of `cf create-service <offering> <plan> <instance> [-c <json>]`
fn create_service_args(request: &CreateServiceRequest) -> Vec<String> {
    let mut args = vec![
        "create-service".to_string(),
        request.offering.clone(),
        request.plan.clone(),
        request.instance_name.clone(),
    ];
    if let Some(parameters) = &request.parameters {
        args.push("-c".to_string());
        args.push(parameters.to_string());
    }
    args
}

#[async_trait(?Send)]
impl CfClient for CfCliClient {
    async fn query_service_offerings(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceOffering>, CfError> {
        if names.is_empty() {
            return Ok(CfListResponse::default());
        }
        let path = format!("/v3/service_offerings?names={}", Self::name_filter(names)?);
        self.curl(&path).await
    }

    async fn query_service_instances(
        &self,
        names: &[String],
    ) -> Result<CfListResponse<ServiceInstance>, CfError> {
        if names.is_empty() {
            return Ok(CfListResponse::default());
        }
        let path = format!(
            "/v3/service_instances?names={}&space_guids={}",
            Self::name_filter(names)?,
            urlencoding::encode(&self.space_guid().await?)
        );
        self.curl(&path).await
    }

    async fn create_service_instance(&self, request: &CreateServiceRequest) -> Result<(), CfError> {
        let stdout = self.execute(&create_service_args(request)).await?;
        info!("Created service instance '{}'", request.instance_name);
        if !stdout.is_empty() {
            debug!(stdout = %stdout, "cf create-service output");
        }
        Ok(())
    }
}
