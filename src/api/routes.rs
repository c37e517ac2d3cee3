//! Route configuration.

use crate::api::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Trains
        .route("/api/routes", get(handlers::list_routes))
        .route("/api/train/{route}", get(handlers::get_train))
        .route("/api/trains-batch", get(handlers::get_trains_batch))
        // Tech
        .route("/api/products", get(handlers::list_products))
        .route("/api/tech", get(handlers::get_tech_all))
        .route("/api/tech/{product}", get(handlers::get_tech))
        .with_state(state)
}

/// Serves the static frontend from `static_dir` for every unmatched path,
/// answering unknown files with its `index.html` and a 200 status.
pub fn with_frontend(router: Router, static_dir: &Path) -> Router {
    let index = ServeFile::new(static_dir.join("index.html"));
    router.fallback_service(ServeDir::new(static_dir).fallback(index))
}
