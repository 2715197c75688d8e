//! REST API over the tariff catalog and the comparison engine.
//!
//! Provides three endpoints:
//! - `GET /health`: liveness and catalog size
//! - `GET /tariffs`: the full catalog
//! - `POST /recommendations`: rank the catalog for one consumption record

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::catalog::Catalog;

pub use types::{ErrorResponse, HealthResponse, RecommendationRequest};

/// Immutable application state shared across all request handlers.
///
/// Constructed once at startup and wrapped in `Arc`; every request reads
/// the same catalog without locking.
pub struct AppState {
    /// Tariffs every request is ranked against.
    pub catalog: Catalog,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/tariffs", get(handlers::get_tariffs))
        .route("/recommendations", post(handlers::post_recommendations))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
