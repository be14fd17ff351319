//! # Permission Records
//!
//! One record per exposed model, listing which HTTP verbs it accepts.

use std::fmt;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use super::errors::{PermissionError, PermissionResult};

/// HTTP verbs the gateway dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Map an HTTP method, `None` for verbs the gateway does not serve
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(HttpVerb::Get),
            Method::POST => Some(HttpVerb::Post),
            Method::PUT => Some(HttpVerb::Put),
            Method::DELETE => Some(HttpVerb::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verb flags for a single model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub model: String,

    #[serde(default, alias = "is_get")]
    pub allow_get: bool,

    #[serde(default, alias = "is_post")]
    pub allow_post: bool,

    #[serde(default, alias = "is_put")]
    pub allow_put: bool,

    #[serde(default, alias = "is_delete")]
    pub allow_delete: bool,
}

impl PermissionRecord {
    /// Record with every verb disabled
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Record with every verb enabled
    pub fn full_access(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            allow_get: true,
            allow_post: true,
            allow_put: true,
            allow_delete: true,
        }
    }

    pub fn with_verb(mut self, verb: HttpVerb, allowed: bool) -> Self {
        match verb {
            HttpVerb::Get => self.allow_get = allowed,
            HttpVerb::Post => self.allow_post = allowed,
            HttpVerb::Put => self.allow_put = allowed,
            HttpVerb::Delete => self.allow_delete = allowed,
        }
        self
    }

    pub fn allows(&self, verb: HttpVerb) -> bool {
        match verb {
            HttpVerb::Get => self.allow_get,
            HttpVerb::Post => self.allow_post,
            HttpVerb::Put => self.allow_put,
            HttpVerb::Delete => self.allow_delete,
        }
    }
}

/// Decide whether `verb` may run against the model of `record`.
///
/// A missing record denies everything.
pub fn authorize(
    model: &str,
    record: Option<&PermissionRecord>,
    verb: HttpVerb,
) -> PermissionResult<()> {
    let record = record.ok_or_else(|| PermissionError::NoRecord(model.to_string()))?;
    if record.allows(verb) {
        Ok(())
    } else {
        Err(PermissionError::MethodNotAllowed {
            model: model.to_string(),
            verb,
        })
    }
}
