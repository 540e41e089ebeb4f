//! Fleet ledger HTTP server.
//!
//! Reads the configuration directory from `FLEET_CONFIG_DIR` (default
//! `./config/fleet`) and listens on `FLEET_BIND_ADDR` (default
//! `0.0.0.0:3000`). Log output is controlled with `RUST_LOG`.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_ledger::api::{AppState, create_router};
use fleet_ledger::config::ConfigLoader;
use fleet_ledger::engine::FleetEngine;
use fleet_ledger::store::JsonFileStore;

const DEFAULT_CONFIG_DIR: &str = "./config/fleet";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("FLEET_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr = env::var("FLEET_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = match ConfigLoader::load(&config_dir) {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            error!(config_dir = %config_dir, error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = JsonFileStore::new(&config.store().data_dir);
    info!(
        data_dir = %config.store().data_dir,
        drivers = config.drivers().len(),
        vehicles = config.vehicles().len(),
        "Configuration loaded"
    );

    let engine = FleetEngine::new(config, Box::new(store));
    let router = create_router(AppState::with_user_directory(engine));

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind_addr = %bind_addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(bind_addr = %bind_addr, "Fleet ledger listening");

    if let Err(e) = axum::serve(listener, router).await {
        error!(error = %e, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
