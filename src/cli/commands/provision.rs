//! Provision command implementation

use super::{api_client, cli_client};
use crate::cf::{CfClient, DryRunCfClient};
use crate::cli::config::{CfBackend, DeployConfig};
use crate::cli::error::CliError;
use crate::cli::output::{format_dry_run, format_outcome};
use crate::model::serialize;
use crate::services::{ServiceProvisioner, XsSecurityTemplate};
use crate::storage::StorageBackend;
use crate::storage::filesystem::FileSystemStorageBackend;
use crate::{DeployError, DeployRequest, DescriptorAssembler};
use tracing::info;

/// Handle the provision command
///
/// With `dry_run`, catalog and instance queries still reach Cloud Foundry but
/// no instance is created and the descriptor is printed instead of written.
pub async fn handle_provision(config: &DeployConfig, dry_run: bool) -> Result<String, CliError> {
    let storage = FileSystemStorageBackend::new(&config.project_dir);

    match config.cf.backend {
        CfBackend::Api => provision_with(config, &storage, api_client(&config.cf)?, dry_run).await,
        CfBackend::Cli => provision_with(config, &storage, cli_client(&config.cf), dry_run).await,
    }
}

async fn provision_with<B: StorageBackend, C: CfClient>(
    config: &DeployConfig,
    storage: &B,
    client: C,
    dry_run: bool,
) -> Result<String, CliError> {
    let business_service = select_business_service(config, storage, &client).await?;
    let request = build_request(config, business_service)?;

    if !dry_run {
        let outcome = DescriptorAssembler::new(storage, &client).run(&request).await?;
        return Ok(format_outcome(&outcome));
    }

    let dry = DryRunCfClient::new(client);
    let (descriptor, topology, initial_services) =
        DescriptorAssembler::new(storage, &dry).plan(&request).await?;

    ServiceProvisioner::new(&dry)
        .with_template(request.xs_security_template.clone())
        .provision(&descriptor, &initial_services, &request.timestamp)
        .await
        .map_err(DeployError::from)?;

    let yaml = serialize(&descriptor).map_err(|source| DeployError::Write {
        path: request.descriptor_path.clone(),
        source,
    })?;

    Ok(format_dry_run(&descriptor, topology, &dry.planned(), &yaml))
}

/// Business service from configuration, or the first OData v2/v4 service declared in `declared_resources`
async fn select_business_service<B: StorageBackend, C: CfClient>(
    config: &DeployConfig,
    storage: &B,
    client: &C,
) -> Result<String, CliError> {
    if let Some(business_service) = &config.business_service {
        return Ok(business_service.clone());
    }

    let declared = config.declared_resources.as_deref().ok_or_else(|| {
        CliError::InvalidArgument(
            "either --business-service or --declared-resources is required".to_string(),
        )
    })?;

    let services = DescriptorAssembler::new(storage, client)
        .resolve_business_services(declared)
        .await?;

    // resolve_business_services never returns an empty list
    let selected = services.first().cloned().unwrap_or_default();
    if services.len() > 1 {
        info!(
            "Using business service '{}' out of {} candidates",
            selected,
            services.len()
        );
    }
    Ok(selected)
}

fn build_request(config: &DeployConfig, business_service: String) -> Result<DeployRequest, CliError> {
    let mut request = DeployRequest::new(
        config.descriptor_path.as_str(),
        config.require_adp_project_name()?,
        business_service,
    )
    .with_business_solution(config.business_solution.as_str())
    .with_topology(config.approuter)
    .with_xs_security_template(XsSecurityTemplate::from_override(
        config.xs_security_template.clone(),
    ));

    if let Some(default_id) = &config.default_id {
        request = request.with_default_id(default_id.as_str());
    }

    Ok(request)
}
