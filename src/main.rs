//! Curator CLI entrypoint for catalogue administration.

use std::io::{self, Write};
use std::process::ExitCode;

use curator::{ApiError, CuratorConfig, OperationMode};
use ortho_config::OrthoConfig;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ApiError> {
    let config = load_config()?;

    match config.operation_mode() {
        OperationMode::Login => cli::auth::run_login(&config).await,
        OperationMode::Logout => cli::auth::run_logout(),
        OperationMode::WhoAmI => cli::auth::run_whoami(&config).await,
        OperationMode::List => cli::listing::run_list(&config).await,
        OperationMode::Show => cli::listing::run_show(&config).await,
        OperationMode::Create => cli::mutation::run_create(&config).await,
        OperationMode::Update => cli::mutation::run_update(&config).await,
        OperationMode::Delete => cli::mutation::run_delete(&config).await,
        OperationMode::Stats => cli::stats::run_stats(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<CuratorConfig, ApiError> {
    CuratorConfig::load().map_err(|error| ApiError::Configuration {
        message: error.to_string(),
    })
}
