//! ServerBuilder for fluent API to build HTTP servers

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::router::{build_content_routes, build_health_routes, build_user_routes};
use crate::config::{AppConfig, StorageBackend};
use crate::core::auth::{AuthGate, AuthProvider};
use crate::core::extractors::ForwardedHeaders;
use crate::core::service::RecordStore;
use crate::entities::{Content, User};
use crate::handlers::{ContentState, UsersState};
use crate::storage::InMemoryStore;

/// Builder for the record API server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_user_store(InMemoryStore::new())
///     .with_content_store(InMemoryStore::new())
///     .with_auth_provider(TokenAuthProvider::new(["secret"]))
///     .build()?;
/// ```
pub struct ServerBuilder {
    user_store: Option<Arc<dyn RecordStore<User>>>,
    content_store: Option<Arc<dyn RecordStore<Content>>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    config: AppConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            user_store: None,
            content_store: None,
            auth_provider: None,
            config: AppConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Use this configuration for bind address, proxy trust, CORS and the
    /// session gate policy; its provider too, unless one is set explicitly
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the user store (required)
    pub fn with_user_store(mut self, store: impl RecordStore<User> + 'static) -> Self {
        self.user_store = Some(Arc::new(store));
        self
    }

    /// Set the content store (required)
    pub fn with_content_store(mut self, store: impl RecordStore<Content> + 'static) -> Self {
        self.content_store = Some(Arc::new(store));
        self
    }

    /// Set the auth provider, overriding the configured auth mode
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Add custom routes to the server, such as login endpoints
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Create both stores from the `storage` section of the configuration
    pub async fn with_configured_storage(self) -> Result<Self> {
        match self.config.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage; records are lost on restart");
                Ok(self
                    .with_user_store(InMemoryStore::<User>::new())
                    .with_content_store(InMemoryStore::<Content>::new()))
            }
            #[cfg(feature = "mongodb_backend")]
            StorageBackend::Mongodb => {
                use crate::storage::MongoStore;

                let uri = self
                    .config
                    .storage
                    .mongodb_uri
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("mongodb storage needs a connection uri"))?;
                let client = mongodb::Client::with_uri_str(&uri).await?;
                let database = client.database(&self.config.storage.database);

                tracing::info!(database = %self.config.storage.database, "using mongodb storage");
                Ok(self
                    .with_user_store(MongoStore::<User>::new(database.clone()))
                    .with_content_store(MongoStore::<Content>::new(database)))
            }
            #[cfg(not(feature = "mongodb_backend"))]
            StorageBackend::Mongodb => Err(anyhow::anyhow!(
                "mongodb storage requires the 'mongodb_backend' feature"
            )),
        }
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health routes at the root
    /// - User and content routes under `/api`
    /// - Request tracing, and CORS when configured
    pub fn build(mut self) -> Result<Router> {
        let user_store = self
            .user_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("User store is required. Call .with_user_store()"))?;
        let content_store = self.content_store.take().ok_or_else(|| {
            anyhow::anyhow!("Content store is required. Call .with_content_store()")
        })?;
        let provider = self
            .auth_provider
            .take()
            .unwrap_or_else(|| self.config.auth.build_provider());

        let gate = AuthGate {
            provider,
            policy: self.config.auth.policy(),
        };

        let users = UsersState {
            store: user_store,
            forwarded_headers: ForwardedHeaders(self.config.server.trust_forwarded_headers),
        };
        let content = ContentState {
            store: content_store,
        };

        let api = build_user_routes(users, gate.clone()).merge(build_content_routes(content, gate));

        let mut app = build_health_routes().nest("/api", api);
        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        if self.config.server.cors {
            app = app.layer(CorsLayer::permissive());
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured address
    /// - Serve requests with the peer address available to handlers
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_config(AppConfig::load()?)
    ///     .with_configured_storage()
    ///     .await?
    ///     .serve()
    ///     .await?;
    /// ```
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
    use crate::config::AuthMode;
    use crate::core::auth::NoAuthProvider;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ServerBuilder::new();
        assert!(builder.user_store.is_none());
        assert!(builder.content_store.is_none());
        assert!(builder.auth_provider.is_none());
        assert!(builder.custom_routes.is_empty());
        assert_eq!(builder.config, AppConfig::default());
    }

    #[test]
    fn test_with_stores_sets_stores() {
        let builder = ServerBuilder::new()
            .with_user_store(InMemoryStore::<User>::new())
            .with_content_store(InMemoryStore::<Content>::new());
        assert!(builder.user_store.is_some());
        assert!(builder.content_store.is_some());
    }

    #[test]
    fn test_build_without_user_store_fails() {
        let result = ServerBuilder::new()
            .with_content_store(InMemoryStore::<Content>::new())
            .build();
        let err = result.err().unwrap().to_string();
        assert!(err.contains("User store is required"));
    }

    #[test]
    fn test_build_without_content_store_fails() {
        let result = ServerBuilder::new()
            .with_user_store(InMemoryStore::<User>::new())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_with_stores_succeeds() {
        let result = ServerBuilder::new()
            .with_user_store(InMemoryStore::<User>::new())
            .with_content_store(InMemoryStore::<Content>::new())
            .with_auth_provider(NoAuthProvider)
            .build();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_configured_memory_storage() {
        let mut config = AppConfig::default();
        config.auth.mode = AuthMode::None;
        let builder = ServerBuilder::new()
            .with_config(config)
            .with_configured_storage()
            .await
            .unwrap();
        assert!(builder.user_store.is_some());
        assert!(builder.content_store.is_some());
        assert_eq!(builder.user_store.unwrap().backend_name(), "in-memory");
    }
}
