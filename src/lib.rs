//! restgate - API-key gated REST gateway over a model store
//!
//! HTTP verbs on `/send_request` become search/create/write/unlink calls
//! on the model named in the query string, subject to that model's
//! permission record.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod permission;
pub mod rest_api;
pub mod store;
