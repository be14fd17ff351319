//! # Permission Errors

use thiserror::Error;

use super::record::HttpVerb;

/// Result type for permission checks
pub type PermissionResult<T> = Result<T, PermissionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// No permission record registered for the model
    #[error("No Record Created for the model")]
    NoRecord(String),

    /// The record exists but the verb is disabled
    #[error("Method Not Allowed")]
    MethodNotAllowed { model: String, verb: HttpVerb },

    #[error("Internal error: {0}")]
    Internal(String),
}
