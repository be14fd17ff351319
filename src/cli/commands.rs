//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::auth::hash_api_key;
use crate::config::GatewayConfig;
use crate::http_server::HttpServer;
use crate::observability::Logger;
use crate::store::ModelStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Check { config } => check(&config),
        Command::HashKey { key } => hash_key(&key),
    }
}

/// Load the config, build the store and serve until the listener fails
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = GatewayConfig::load(config_path)?;

    let store = Arc::new(config.build_store()?);
    let permissions = Arc::new(config.build_registry());
    let api_keys = Arc::new(config.build_api_keys());

    if api_keys.is_empty() {
        Logger::warn(
            "no_api_keys",
            &[("config", &config_path.display().to_string())],
        );
    }

    let server = HttpServer::new(config.server.clone(), store, permissions, api_keys);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Boot(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::Boot(format!("HTTP server failed: {}", e)))
    })
}

/// Validate a config file, including its seed records, and print a summary
pub fn check(config_path: &Path) -> CliResult<()> {
    match summarize(config_path) {
        Ok(summary) => write_response(summary),
        Err(e) => {
            write_error(e.code(), &e.to_string())?;
            Err(e)
        }
    }
}

fn summarize(config_path: &Path) -> CliResult<Value> {
    let config = GatewayConfig::load(config_path)?;
    let store = config.build_store()?;

    let models = store.models();
    let exposed: Vec<&str> = config
        .permissions
        .iter()
        .map(|p| p.model.as_str())
        .collect();

    Ok(json!({
        "listen": config.server.socket_addr(),
        "models": models,
        "permission_records": exposed,
        "api_keys": config.api_keys.len(),
        "admin_keys": config.api_keys.iter().filter(|k| k.admin).count(),
        "seed_records": config.seed_count(),
    }))
}

/// Print the digest to store as `key_hash`
pub fn hash_key(raw_key: &str) -> CliResult<()> {
    if raw_key.is_empty() {
        return Err(CliError::InvalidArgument(
            "API key cannot be empty".to_string(),
        ));
    }
    write_response(json!({ "key_hash": hash_api_key(raw_key) }))
}
