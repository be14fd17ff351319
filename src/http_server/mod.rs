//! # HTTP Server Module
//!
//! Axum server hosting the gateway.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/send_request` - Gateway endpoint (GET/POST/PUT/DELETE)
//! - `/admin/permissions/*` - Permission record administration

pub mod config;
pub mod health_routes;
pub mod permission_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use permission_routes::PermissionAdminState;
pub use server::HttpServer;
