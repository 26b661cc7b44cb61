//! Services command implementation

use super::{api_client, cli_client};
use crate::DescriptorAssembler;
use crate::cf::CfClient;
use crate::cli::config::{CfBackend, DeployConfig};
use crate::cli::error::CliError;
use crate::storage::StorageBackend;
use crate::storage::filesystem::FileSystemStorageBackend;

/// List business services from a declared resources file that expose OData v2 or v4
pub async fn handle_services(config: &DeployConfig, path: &str) -> Result<String, CliError> {
    let storage = FileSystemStorageBackend::new(&config.project_dir);

    match config.cf.backend {
        CfBackend::Api => list_with(&storage, &api_client(&config.cf)?, path).await,
        CfBackend::Cli => list_with(&storage, &cli_client(&config.cf), path).await,
    }
}

async fn list_with<B: StorageBackend, C: CfClient>(
    storage: &B,
    client: &C,
    path: &str,
) -> Result<String, CliError> {
    let services = DescriptorAssembler::new(storage, client)
        .resolve_business_services(path)
        .await?;

    let mut output = format!("Business services in {}:\n", path);
    for service in services {
        output.push_str(&format!("  - {}\n", service));
    }
    Ok(output)
}
