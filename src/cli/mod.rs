//! CLI module for restgate
//!
//! Provides command-line interface for:
//! - serve: Load the config and run the gateway
//! - check: Validate a config file
//! - hash-key: Digest a raw API key for the config file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, hash_key, run, run_command, serve};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_response};
