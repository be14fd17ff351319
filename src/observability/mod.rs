//! Observability
//!
//! Structured JSON logging shared by the server and the CLI.

pub mod logger;

pub use logger::{Logger, Severity};
