//! Health Route
//!
//! Unauthenticated liveness check. Reports what the gateway exposes
//! without touching any record.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::permission::PermissionRegistry;
use crate::store::ModelStore;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Models known to the store
    pub models: usize,
    /// Models with a permission record
    pub exposed_models: usize,
}

pub struct HealthState<S: ModelStore> {
    pub store: Arc<S>,
    pub registry: Arc<PermissionRegistry>,
}

pub fn health_routes<S: ModelStore + 'static>(state: Arc<HealthState<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<S>))
        .with_state(state)
}

async fn health_handler<S: ModelStore + 'static>(
    State(state): State<Arc<HealthState<S>>>,
) -> impl IntoResponse {
    // Poisoned registry reports zero.
    let exposed_models = state.registry.list().map(|r| r.len()).unwrap_or(0);
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        models: state.store.models().len(),
        exposed_models,
    };

    (StatusCode::OK, Json(response))
}
