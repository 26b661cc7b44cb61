//! CLI module for the cf-mta binary

#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod error;
#[cfg(feature = "cli")]
pub mod output;

#[cfg(feature = "cli")]
pub use config::{CfBackend, CfConfig, DeployConfig};
#[cfg(feature = "cli")]
pub use error::CliError;
