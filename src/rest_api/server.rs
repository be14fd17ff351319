//! # Gateway HTTP Endpoint
//!
//! Axum route for `/send_request`. Authenticates the caller, decodes the
//! request and hands it to the dispatcher.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::auth::ApiKeyStore;
use crate::observability::Logger;
use crate::permission::{HttpVerb, PermissionRegistry};
use crate::store::ModelStore;

use super::errors::RestError;
use super::handler::GatewayHandler;
use super::request::{BodyPayload, GatewayRequest};
use super::response::{encode_records, SuccessEnvelope};

/// Path of the gateway endpoint
pub const SEND_REQUEST_PATH: &str = "/send_request";

pub struct GatewayServer<S: ModelStore> {
    handler: GatewayHandler<S>,
    api_keys: Arc<ApiKeyStore>,
}

impl<S: ModelStore + 'static> GatewayServer<S> {
    pub fn new(
        store: Arc<S>,
        permissions: Arc<PermissionRegistry>,
        api_keys: Arc<ApiKeyStore>,
    ) -> Self {
        Self {
            handler: GatewayHandler::new(store, permissions),
            api_keys,
        }
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route(
                SEND_REQUEST_PATH,
                get(send_request::<S>)
                    .post(send_request::<S>)
                    .put(send_request::<S>)
                    .delete(send_request::<S>),
            )
            .with_state(state)
    }
}

/// Shared state type
type ServerState<S> = Arc<GatewayServer<S>>;

async fn send_request<S: ModelStore + 'static>(
    State(server): State<ServerState<S>>,
    method: Method,
    client: Option<ConnectInfo<SocketAddr>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let client = client
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let model = params.get("model").cloned().unwrap_or_default();

    let principal = match server.api_keys.authenticate_headers(&headers) {
        Ok(principal) => principal,
        Err(e) => {
            Logger::warn(
                "auth_rejected",
                &[
                    ("request_id", &request_id),
                    ("method", method.as_str()),
                    ("client", &client),
                    ("reason", &e.to_string()),
                ],
            );
            return RestError::from(e).into_response();
        }
    };

    // The router only admits the four gateway verbs.
    let verb = match HttpVerb::from_method(&method) {
        Some(verb) => verb,
        None => return RestError::MethodNotAllowed.into_response(),
    };

    let request = GatewayRequest::new(verb, &params, &body);

    if let BodyPayload::Malformed(reason) = &request.body {
        if matches!(verb, HttpVerb::Get | HttpVerb::Delete) {
            Logger::warn(
                "request_body_ignored",
                &[
                    ("request_id", &request_id),
                    ("method", verb.as_str()),
                    ("model", &model),
                    ("reason", reason),
                ],
            );
        }
    }

    match server.handler.dispatch(&request) {
        Ok(records) => {
            let count = records.len().to_string();
            Logger::info(
                "request_completed",
                &[
                    ("request_id", &request_id),
                    ("method", verb.as_str()),
                    ("model", &model),
                    ("key", &principal.name),
                    ("client", &client),
                    ("records", &count),
                ],
            );
            SuccessEnvelope::new(encode_records(&records)).into_response()
        }
        Err(e) => {
            Logger::error(
                "request_failed",
                &[
                    ("request_id", &request_id),
                    ("method", verb.as_str()),
                    ("model", &model),
                    ("key", &principal.name),
                    ("client", &client),
                    ("error", &e.to_string()),
                ],
            );
            e.into_response()
        }
    }
}
