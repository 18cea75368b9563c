//! HTTP server setup and routing

use crate::error::ServerError;
use crate::identity::{CookieIdentity, IdentityExtractor};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vortex_core::{CatalogConfig, CatalogSearch, DetailResolver, SourceRegistry};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub search: CatalogSearch,
    pub detail: DetailResolver,
    pub identity: Arc<dyn IdentityExtractor>,
}

impl AppState {
    pub fn new(
        search: CatalogSearch,
        detail: DetailResolver,
        identity: Arc<dyn IdentityExtractor>,
    ) -> Self {
        Self {
            search,
            detail,
            identity,
        }
    }

    /// State over the configured sources, with real HTTP clients and
    /// cookie-based identity.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ServerError> {
        let registry = SourceRegistry::from_config(config)?;
        Ok(Self::new(
            CatalogSearch::with_settings(registry.clone(), &config.search),
            DetailResolver::with_settings(registry, &config.search),
            Arc::new(CookieIdentity),
        ))
    }

    pub fn registry(&self) -> &SourceRegistry {
        self.search.registry()
    }

    pub fn caller(&self, headers: &HeaderMap) -> Option<String> {
        self.identity.identify(headers)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(super::handlers::health))
        .route("/api/search", get(super::sse::search_stream))
        .route("/api/detail", get(super::handlers::get_detail))
        .route("/api/sources", get(super::handlers::list_sources))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `bind_addr` and serve until Ctrl-C.
pub async fn run(state: AppState, bind_addr: &str) -> Result<(), ServerError> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.to_string(),
            source,
        })?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed
        std::future::pending::<()>().await;
    }
}
