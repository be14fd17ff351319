//! Permission Admin Routes
//!
//! Endpoints for reading and editing permission records at runtime.
//! Every route requires an administrator API key.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{ApiKeyStore, ApiPrincipal};
use crate::observability::Logger;
use crate::permission::{PermissionRecord, PermissionRegistry};
use crate::rest_api::{RestError, RestResult, SuccessEnvelope};
use crate::store::ModelStore;

// ==================
// Shared State
// ==================

pub struct PermissionAdminState<S: ModelStore> {
    pub store: Arc<S>,
    pub registry: Arc<PermissionRegistry>,
    pub api_keys: Arc<ApiKeyStore>,
}

impl<S: ModelStore> PermissionAdminState<S> {
    pub fn new(
        store: Arc<S>,
        registry: Arc<PermissionRegistry>,
        api_keys: Arc<ApiKeyStore>,
    ) -> Self {
        Self {
            store,
            registry,
            api_keys,
        }
    }

    fn require_admin(&self, headers: &HeaderMap) -> RestResult<ApiPrincipal> {
        let principal = self.api_keys.authenticate_headers(headers).map_err(|e| {
            Logger::warn("auth_rejected", &[("scope", "admin"), ("reason", &e.to_string())]);
            e
        })?;
        principal.require_admin().map_err(|e| {
            Logger::warn(
                "auth_rejected",
                &[("scope", "admin"), ("key", &principal.name), ("reason", &e.to_string())],
            );
            e
        })?;
        Ok(principal)
    }
}

// ==================
// Request Types
// ==================

/// Body of `PUT /permissions/:model`; missing flags are false
#[derive(Debug, Default, Deserialize)]
pub struct PermissionFlags {
    #[serde(default, alias = "is_get")]
    pub allow_get: bool,
    #[serde(default, alias = "is_post")]
    pub allow_post: bool,
    #[serde(default, alias = "is_put")]
    pub allow_put: bool,
    #[serde(default, alias = "is_delete")]
    pub allow_delete: bool,
}

impl PermissionFlags {
    fn parse(raw: &[u8]) -> RestResult<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(raw).map_err(|e| RestError::InvalidJson(e.to_string()))
    }

    fn into_record(self, model: String) -> PermissionRecord {
        PermissionRecord {
            model,
            allow_get: self.allow_get,
            allow_post: self.allow_post,
            allow_put: self.allow_put,
            allow_delete: self.allow_delete,
        }
    }
}

// ==================
// Permission Routes
// ==================

pub fn permission_routes<S: ModelStore + 'static>(state: Arc<PermissionAdminState<S>>) -> Router {
    Router::new()
        .route("/permissions", get(list_permissions_handler::<S>))
        .route(
            "/permissions/:model",
            get(get_permission_handler::<S>)
                .put(put_permission_handler::<S>)
                .delete(delete_permission_handler::<S>),
        )
        .with_state(state)
}

fn to_value(record: &PermissionRecord) -> RestResult<Value> {
    serde_json::to_value(record).map_err(|e| RestError::Internal(e.to_string()))
}

async fn list_permissions_handler<S: ModelStore + 'static>(
    State(state): State<Arc<PermissionAdminState<S>>>,
    headers: HeaderMap,
) -> RestResult<SuccessEnvelope<Vec<Value>>> {
    state.require_admin(&headers)?;

    let records = state.registry.list()?;
    let data = records.iter().map(to_value).collect::<RestResult<Vec<_>>>()?;
    Ok(SuccessEnvelope::new(data))
}

async fn get_permission_handler<S: ModelStore + 'static>(
    State(state): State<Arc<PermissionAdminState<S>>>,
    Path(model): Path<String>,
    headers: HeaderMap,
) -> RestResult<SuccessEnvelope<Value>> {
    state.require_admin(&headers)?;

    let record = state.registry.get(&model)?.ok_or(RestError::NotFound)?;
    Ok(SuccessEnvelope::new(to_value(&record)?))
}

async fn put_permission_handler<S: ModelStore + 'static>(
    State(state): State<Arc<PermissionAdminState<S>>>,
    Path(model): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<SuccessEnvelope<Value>> {
    let principal = state.require_admin(&headers)?;

    if !state.store.has_model(&model) {
        return Err(RestError::UnknownModel(model));
    }

    let record = PermissionFlags::parse(&body)?.into_record(model);
    let previous = state.registry.upsert(record.clone())?;

    Logger::info(
        "permission_updated",
        &[
            ("model", &record.model),
            ("key", &principal.name),
            ("created", if previous.is_none() { "true" } else { "false" }),
            ("allow_get", bool_str(record.allow_get)),
            ("allow_post", bool_str(record.allow_post)),
            ("allow_put", bool_str(record.allow_put)),
            ("allow_delete", bool_str(record.allow_delete)),
        ],
    );

    Ok(SuccessEnvelope::new(to_value(&record)?))
}

async fn delete_permission_handler<S: ModelStore + 'static>(
    State(state): State<Arc<PermissionAdminState<S>>>,
    Path(model): Path<String>,
    headers: HeaderMap,
) -> RestResult<SuccessEnvelope<Value>> {
    let principal = state.require_admin(&headers)?;

    let removed = state.registry.remove(&model)?.ok_or(RestError::NotFound)?;
    Logger::info(
        "permission_removed",
        &[("model", &removed.model), ("key", &principal.name)],
    );

    Ok(SuccessEnvelope::new(to_value(&removed)?))
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
