//! CLI argument definitions using clap
//!
//! Commands:
//! - restgate serve --config <path>
//! - restgate check --config <path>
//! - restgate hash-key <key>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// restgate - API-key gated REST gateway over a model store
#[derive(Parser, Debug)]
#[command(name = "restgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./restgate.json")]
        config: PathBuf,
    },

    /// Validate a configuration file and print a summary
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./restgate.json")]
        config: PathBuf,
    },

    /// Print the digest of a raw API key for the config file
    HashKey {
        /// Raw API key
        key: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
