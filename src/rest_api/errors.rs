//! # Gateway Errors
//!
//! Every dispatcher failure is answered with HTTP 500 and
//! `{"success": false, "error": "<message>"}`. Only the auth layer, which
//! runs before dispatch, uses its own status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::permission::PermissionError;

use super::response::ErrorEnvelope;

/// Result type for gateway operations
pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestError {
    /// `model` missing or not known to the store
    #[error("Invalid model, check spelling or maybe the related module is not installed")]
    UnknownModel(String),

    /// Model has no permission record
    #[error("No Record Created for the model")]
    NoPermissionRecord(String),

    /// Verb disabled for the model
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// PUT/DELETE without a record id
    #[error("No ID Provided")]
    MissingIdentifier,

    /// `Id` query parameter is not an integer
    #[error("Invalid record id: {0}")]
    InvalidIdentifier(String),

    #[error("Resource not found")]
    NotFound,

    /// A body condition does not hold on the target record
    #[error("Condition not met: {field} must be {expected}, found {found}")]
    ConditionMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Unusable body, or the store refused the operation
    #[error("Invalid JSON Data: {0}")]
    InvalidJson(String),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Auth(auth_err) => StatusCode::from_u16(auth_err.status_code())
                .unwrap_or(StatusCode::UNAUTHORIZED),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PermissionError> for RestError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::NoRecord(model) => RestError::NoPermissionRecord(model),
            PermissionError::MethodNotAllowed { .. } => RestError::MethodNotAllowed,
            PermissionError::Internal(msg) => RestError::Internal(msg),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorEnvelope::new(self.to_string()));
        (status, body).into_response()
    }
}
