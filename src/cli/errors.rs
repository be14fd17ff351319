//! CLI errors
//!
//! Every CLI error ends the process. `check` also reports it on stdout
//! with a stable code.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Boot(String),
}

impl CliError {
    /// Stable code printed alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "RESTGATE_CLI_CONFIG_ERROR",
            CliError::InvalidArgument(_) => "RESTGATE_CLI_INVALID_ARGUMENT",
            CliError::Output(_) | CliError::Encode(_) => "RESTGATE_CLI_IO_ERROR",
            CliError::Boot(_) => "RESTGATE_CLI_BOOT_FAILED",
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_keeps_message() {
        let err = CliError::from(ConfigError::Read("No such file".to_string()));
        assert_eq!(err.code(), "RESTGATE_CLI_CONFIG_ERROR");
        assert_eq!(err.to_string(), "Failed to read config: No such file");
    }

    #[test]
    fn test_boot_code() {
        let err = CliError::Boot("HTTP server failed: address in use".to_string());
        assert_eq!(err.code(), "RESTGATE_CLI_BOOT_FAILED");
    }
}
