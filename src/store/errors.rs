//! # Store Errors
//!
//! Error types for the backend model store.

use serde_json::Value;
use thiserror::Error;

use super::value::FieldValue;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend store errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Model is not registered in the store
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Model registered twice
    #[error("Model already registered: {0}")]
    DuplicateModel(String),

    /// Field is not declared on the model
    #[error("Invalid field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    /// Value cannot be stored in the field
    #[error("Wrong value for {model}.{field}: {reason}")]
    InvalidValue {
        model: String,
        field: String,
        reason: String,
    },

    /// Required field missing or cleared
    #[error("Missing required value for field '{field}' on model '{model}'")]
    MissingRequired { model: String, field: String },

    /// Relational value points at a record that does not exist
    #[error("Record {id} does not exist on model '{model}'")]
    MissingReference { model: String, id: i64 },

    /// Record with the given id does not exist
    #[error("Record {id} not found on model '{model}'")]
    RecordNotFound { model: String, id: i64 },

    /// A guarded write or unlink found the record in a different state
    #[error("Guard failed on {model}.{field}")]
    GuardFailed {
        model: String,
        field: String,
        expected: Value,
        found: FieldValue,
    },

    /// Schema definition is inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub(crate) fn invalid_value(model: &str, field: &str, reason: impl Into<String>) -> Self {
        StoreError::InvalidValue {
            model: model.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
