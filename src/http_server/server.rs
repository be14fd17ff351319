//! # HTTP Server
//!
//! Combines the health check, the gateway endpoint and the admin routes
//! into one Axum server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::ApiKeyStore;
use crate::observability::Logger;
use crate::permission::PermissionRegistry;
use crate::rest_api::{GatewayServer, SEND_REQUEST_PATH};
use crate::store::ModelStore;

use super::config::HttpServerConfig;
use super::health_routes::{health_routes, HealthState};
use super::permission_routes::{permission_routes, PermissionAdminState};

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new<S: ModelStore + 'static>(
        config: HttpServerConfig,
        store: Arc<S>,
        permissions: Arc<PermissionRegistry>,
        api_keys: Arc<ApiKeyStore>,
    ) -> Self {
        let router = Self::build_router(&config, store, permissions, api_keys);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router<S: ModelStore + 'static>(
        config: &HttpServerConfig,
        store: Arc<S>,
        permissions: Arc<PermissionRegistry>,
        api_keys: Arc<ApiKeyStore>,
    ) -> Router {
        let admin_state = Arc::new(PermissionAdminState::new(
            store.clone(),
            permissions.clone(),
            api_keys.clone(),
        ));
        let health_state = Arc::new(HealthState {
            store: store.clone(),
            registry: permissions.clone(),
        });
        let gateway = GatewayServer::new(store, permissions, api_keys);

        Router::new()
            .merge(health_routes(health_state))
            .merge(gateway.router())
            .nest("/admin", permission_routes(admin_state))
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        Logger::info(
            "server_started",
            &[
                ("addr", &addr.to_string()),
                ("endpoint", SEND_REQUEST_PATH),
                ("version", env!("CARGO_PKG_VERSION")),
            ],
        );

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
