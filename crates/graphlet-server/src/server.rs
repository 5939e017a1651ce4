//! Router construction and server lifecycle

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use graphlet_storage::GraphStore;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers;

/// Shared handler state
pub struct AppState<S: GraphStore> {
    pub store: Arc<S>,
}

impl<S: GraphStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: GraphStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// Create the API router
pub fn create_router<S: GraphStore + 'static>(store: Arc<S>, config: &ServerConfig) -> Router {
    let state = AppState::new(store);

    Router::new()
        .route("/health", get(handlers::health::<S>))
        .route("/api/graph", get(handlers::get_graph::<S>))
        .route("/api/nodes", post(handlers::create_node::<S>))
        .route(
            "/api/nodes/:id",
            get(handlers::get_node::<S>).delete(handlers::delete_node::<S>),
        )
        .route(
            "/api/nodes/:id/relationships",
            get(handlers::node_relationships::<S>),
        )
        .route("/api/relationships", post(handlers::create_relationship::<S>))
        .route(
            "/api/relationships/:id",
            delete(handlers::delete_relationship::<S>),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(CorsLayer::permissive())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!("Request handler panicked: {}", detail);
    ApiError::Internal("Internal server error".to_string()).into_response()
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server<S: GraphStore + 'static>(
    store: Arc<S>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let router = create_router(store, config);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!("Graphlet server listening on {}", listener.local_addr()?);
    tracing::info!("  Graph endpoint: http://{}/api/graph", config.addr());
    tracing::info!("  Health check: http://{}/health", config.addr());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graphlet server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
