//! Connect once using a JSON driver configuration and report the result.
//!
//! Usage: `dbdriver-probe <config.json>`

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use dbdriver_loader::{ConnectionEstablisher, DriverCatalog, DriverConfig, DriverRegistry};
use tracing_subscriber::EnvFilter;

fn run(config_path: &str) -> Result<()> {
    let config = DriverConfig::load(config_path)?;
    let registry = Arc::new(DriverRegistry::new(DriverCatalog::builtin()));

    let connection = ConnectionEstablisher::new(Arc::new(config), registry)
        .connect()
        .context("Connection failed")?;

    match connection.server_version() {
        Some(version) => tracing::info!("Connected to {} ({})", connection.url(), version),
        None => tracing::info!("Connected to {}", connection.url()),
    }

    connection.close()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(config_path) = std::env::args().nth(1) else {
        eprintln!("usage: dbdriver-probe <config.json>");
        return ExitCode::from(2);
    };

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
