//! ServerRegistration: fluent API to mount a GraphQL host
//!
//! # Example
//!
//! ```ignore
//! let app = ServerRegistration::new()
//!     .with_server(GraphQlHost::new(schema))
//!     .path("/api/graphql")
//!     .on_health_check(|| async { db.ping().await })
//!     .build()?;
//! ```

use crate::core::error::{BridgeResult, ConfigError};
use crate::server::health::{HEALTH_CHECK_PATH, HealthCheck, health_response};
use crate::server::host::GraphQlHost;
use crate::server::router::{MountState, mount};
use crate::server::uploads::{UploadLimits, UploadsConfig};
use anyhow::Result;
use async_graphql::Executor;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Default mount path for the query endpoint
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";

/// Default cap on JSON POST bodies (2 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Builder registering a [`GraphQlHost`] and its auxiliary routes
///
/// Registers three behaviors on a router:
/// - the query endpoint on the mount path, all methods, wrapped in
///   trace/CORS/upload layers
/// - the health endpoint on its well-known path, unless disabled
/// - the multipart upload pipeline, unless disabled
pub struct ServerRegistration<E> {
    server: Option<Arc<GraphQlHost<E>>>,
    path: String,
    cors: CorsLayer,
    body_limit: usize,
    disable_health_check: bool,
    on_health_check: Option<Arc<dyn HealthCheck>>,
    uploads: UploadsConfig,
}

impl<E: Executor> ServerRegistration<E> {
    /// Create a registration with default settings
    pub fn new() -> Self {
        Self {
            server: None,
            path: DEFAULT_GRAPHQL_PATH.to_string(),
            cors: CorsLayer::permissive(),
            body_limit: DEFAULT_BODY_LIMIT,
            disable_health_check: false,
            on_health_check: None,
            uploads: UploadsConfig::default(),
        }
    }

    /// Set the server instance (required)
    pub fn with_server(mut self, server: GraphQlHost<E>) -> Self {
        self.server = Some(Arc::new(server));
        self
    }

    /// Change the mount path (default `/graphql`)
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Replace the CORS layer (default permissive)
    pub fn cors(mut self, cors: CorsLayer) -> Self {
        self.cors = cors;
        self
    }

    /// Cap JSON POST body size in bytes
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Skip registering the health endpoint
    pub fn disable_health_check(mut self) -> Self {
        self.disable_health_check = true;
        self
    }

    /// Install a readiness probe behind the health endpoint
    pub fn on_health_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.on_health_check = Some(Arc::new(check));
        self
    }

    /// Set multipart upload limits (uploads stay enabled)
    pub fn uploads(mut self, limits: UploadLimits) -> Self {
        self.uploads = UploadsConfig::Enabled(limits);
        self
    }

    /// Remove the upload pipeline entirely
    pub fn disable_uploads(mut self) -> Self {
        self.uploads = UploadsConfig::Disabled;
        self
    }

    /// Register all routes onto an existing router
    ///
    /// Fails fast when no server instance was supplied; nothing is mounted
    /// in that case.
    pub fn register(self, router: Router) -> BridgeResult<Router> {
        let host = self.server.ok_or_else(|| ConfigError::MissingField {
            field: "server".to_string(),
            context: "ServerRegistration".to_string(),
        })?;

        let mut router = router;

        if !self.disable_health_check {
            let check = self.on_health_check.clone();
            router = router.route(
                HEALTH_CHECK_PATH,
                get(move || health_response(check.clone())),
            );
        }

        let state = Arc::new(MountState {
            host,
            path: self.path,
            body_limit: self.body_limit,
            uploads: self.uploads,
        });

        Ok(mount(router, state, self.cors))
    }

    /// Build a fresh router carrying only this registration
    pub fn build(self) -> BridgeResult<Router> {
        self.register(Router::new())
    }

    /// Serve the registration with graceful shutdown
    ///
    /// Binds the address, serves until SIGTERM or Ctrl+C, then drains.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("GraphQL server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl<E: Executor> Default for ServerRegistration<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BridgeError;
    use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};

    struct Query;

    #[Object]
    impl Query {
        async fn ping(&self) -> &str {
            "pong"
        }
    }

    type TestSchema = Schema<Query, EmptyMutation, EmptySubscription>;

    fn test_host() -> GraphQlHost<TestSchema> {
        GraphQlHost::new(Schema::new(Query, EmptyMutation, EmptySubscription))
    }

    #[test]
    fn test_missing_server_fails_at_setup() {
        let err = ServerRegistration::<TestSchema>::new().build().unwrap_err();
        match err {
            BridgeError::Config(ConfigError::MissingField { field, .. }) => {
                assert_eq!(field, "server");
            }
            other => panic!("expected config error, got: {}", other),
        }
    }

    #[test]
    fn test_build_with_server_succeeds() {
        let result = ServerRegistration::new().with_server(test_host()).build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_fluent_chaining_full_pipeline() {
        let result = ServerRegistration::new()
            .with_server(test_host())
            .path("/api/graphql")
            .body_limit(512 * 1024)
            .uploads(UploadLimits {
                max_file_size: Some(8 * 1024 * 1024),
                max_num_files: Some(4),
            })
            .on_health_check(|| async { anyhow::Ok(()) })
            .build();
        assert!(result.is_ok(), "full fluent pipeline should succeed");
    }

    #[test]
    fn test_register_merges_onto_existing_router() {
        let base = Router::new();
        let result = ServerRegistration::new()
            .with_server(test_host())
            .disable_health_check()
            .disable_uploads()
            .register(base);
        assert!(result.is_ok());
    }
}
