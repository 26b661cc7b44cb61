use anyhow::Result;
use cf_mta_sdk::cli::commands::{provision, services, validate};
use cf_mta_sdk::cli::{CfBackend, CliError, DeployConfig};
use cf_mta_sdk::models::Topology;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// cf-mta - Extend MTA deployment descriptors for adaptation projects and provision their services
#[derive(Parser)]
#[command(name = "cf-mta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extend the descriptor and create the service instances it needs
    Provision {
        /// Project directory containing the descriptor
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Descriptor path relative to the project directory
        #[arg(long)]
        descriptor: Option<String>,

        /// Adaptation project name
        #[arg(long)]
        adp_project_name: Option<String>,

        /// Business service instance name
        #[arg(long)]
        business_service: Option<String>,

        /// Business solution name
        #[arg(long)]
        business_solution: Option<String>,

        /// Approuter topology (standalone or managed)
        #[arg(long)]
        approuter: Option<Topology>,

        /// Declared resources file used to pick the business service
        #[arg(long)]
        declared_resources: Option<String>,

        /// Cloud Foundry backend
        #[arg(long, value_enum)]
        backend: Option<CfBackend>,

        /// Print the descriptor and planned instances without writing or creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Check a descriptor for duplicate names and a missing ID
    Validate {
        /// Descriptor file, or - for stdin
        #[arg(default_value = "mta.yaml")]
        input: String,
    },

    /// List OData business services from a declared resources file
    Services {
        /// Declared resources file relative to the project directory
        path: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_err) => eprintln!("error: {}", cli_err.user_message()),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DeployConfig::from_file(path)?,
        None => DeployConfig::new(),
    };

    match cli.command {
        Commands::Provision {
            project_dir,
            descriptor,
            adp_project_name,
            business_service,
            business_solution,
            approuter,
            declared_resources,
            backend,
            dry_run,
        } => {
            let mut config = config;
            if let Some(dir) = project_dir {
                config = config.with_project_dir(dir);
            }
            if let Some(path) = descriptor {
                config = config.with_descriptor_path(path);
            }
            if let Some(name) = adp_project_name {
                config = config.with_adp_project_name(name);
            }
            if let Some(name) = business_service {
                config = config.with_business_service(name);
            }
            if let Some(name) = business_solution {
                config = config.with_business_solution(name);
            }
            if let Some(topology) = approuter {
                config = config.with_approuter(topology);
            }
            if let Some(path) = declared_resources {
                config.declared_resources = Some(path);
            }
            if let Some(backend) = backend {
                config = config.with_backend(backend);
            }

            let output = provision::handle_provision(&config, dry_run).await?;
            print!("{}", output);
        }
        Commands::Validate { input } => validate::handle_validate(&input)?,
        Commands::Services { path } => {
            let output = services::handle_services(&config, &path).await?;
            print!("{}", output);
        }
    }

    Ok(())
}
