//! CLI command implementations

pub mod provision;
pub mod services;
pub mod validate;

use crate::cf::api::CfApiClient;
use crate::cf::cli::CfCliClient;
use crate::cli::config::CfConfig;
use crate::cli::error::CliError;

/// Build the API client from configuration, reading the token from the environment
pub(crate) fn api_client(config: &CfConfig) -> Result<CfApiClient, CliError> {
    let api_url = config.api_url.as_deref().ok_or_else(|| {
        CliError::ConfigError("cf.api_url is required for the api backend".to_string())
    })?;
    let token = std::env::var(&config.token_env).ok();
    if token.is_none() {
        tracing::warn!("{} is not set, calling the CF API without a token", config.token_env);
    }

    let client = CfApiClient::new(api_url, token);
    Ok(match &config.space_guid {
        Some(space_guid) => client.with_space(space_guid.as_str()),
        None => client,
    })
}

/// Build the `cf` CLI client; without `space_guid` the targeted space is used
pub(crate) fn cli_client(config: &CfConfig) -> CfCliClient {
    let client = CfCliClient::new(config.cf_binary.as_str());
    match &config.space_guid {
        Some(space_guid) => client.with_space(space_guid.as_str()),
        None => client,
    }
}
