//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use restgate::auth::hash_api_key;
use restgate::config::GatewayConfig;
use restgate::http_server::HttpServer;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const USER_KEY: &str = "user-key-0001";
pub const ADMIN_KEY: &str = "admin-key-0001";

pub fn gateway_config() -> GatewayConfig {
    let config = json!({
        "api_keys": [
            {"name": "integration", "key_hash": hash_api_key(USER_KEY)},
            {"name": "ops", "key_hash": hash_api_key(ADMIN_KEY), "admin": true}
        ],
        "models": [
            {"name": "res.partner", "fields": {
                "name": {"type": "char", "required": true},
                "email": {"type": "char"},
                "parent_id": {"type": "many2one", "comodel": "res.partner"},
                "last_login": {"type": "datetime"},
                "photo": {"type": "binary"}
            }},
            {"name": "sale.order", "fields": {
                "name": {"type": "char", "required": true},
                "state": {"type": "char"},
                "partner_id": {"type": "many2one", "comodel": "res.partner"}
            }},
            {"name": "res.country", "fields": {"name": {"type": "char"}}},
            {"name": "res.bank", "fields": {"bic": {"type": "char"}}}
        ],
        "permissions": [
            {"model": "res.partner", "allow_get": true, "allow_post": true, "allow_put": true, "allow_delete": true},
            {"model": "sale.order", "allow_get": true, "allow_post": true, "allow_put": true, "allow_delete": true},
            {"model": "res.country", "allow_post": true}
        ],
        "seed": {
            "res.partner": [
                {
                    "name": "Azure Interior",
                    "email": "azure@example.com",
                    "last_login": "2024-05-01 09:30:00",
                    "photo": "aGVsbG8="
                },
                {"name": "Deco Addict", "parent_id": 1}
            ],
            "sale.order": [
                {"name": "S00001", "state": "draft", "partner_id": 1}
            ]
        }
    });
    GatewayConfig::from_json(&config.to_string()).unwrap()
}

pub fn build_app() -> Router {
    let config = gateway_config();
    HttpServer::new(
        config.server.clone(),
        Arc::new(config.build_store().unwrap()),
        Arc::new(config.build_registry()),
        Arc::new(config.build_api_keys()),
    )
    .router()
}

/// Send a request and decode the JSON response body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("api-key", key);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(Body::from(body.unwrap_or_default().to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, method, uri, api_key, Some(&body.to_string())).await
}

pub fn error_of(body: &Value) -> &str {
    assert_eq!(body["success"], false, "expected an error envelope: {}", body);
    body["error"].as_str().unwrap_or_default()
}

pub fn data_of(body: &Value) -> &Vec<Value> {
    assert_eq!(body["success"], true, "expected a success envelope: {}", body);
    body["data"].as_array().unwrap()
}
