use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use docdesk::cli::{self, Cli, DEFAULT_CONFIG_PATH};
use docdesk::{Config, DocdeskError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(DEFAULT_CONFIG_PATH),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
        if let Err(e) = config.validate() {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    // Initialize logging
    if let Err(e) = docdesk::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        docdesk::logging::init_console_only(&config.logging.level);
    }
    info!(base_url = %config.api.base_url, "docdesk starting");

    match cli::run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(DocdeskError::Unauthorized) => {
            eprintln!("Session expired. Please log in again.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
