//! API request handlers.

use crate::catalog::{Catalog, InstrumentListing};
use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    HealthResponse, ProductSummaryResponse, RouteSummaryResponse, SummaryBatchResponse,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instruments: state.registry.len(),
        history_cap: state.store.cap(),
        refresh_interval_secs: state.simulator.config().interval_secs,
    })
}

// ============================================================================
// Train Routes
// ============================================================================

/// List all train routes.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses(
        (status = 200, description = "List of routes", body = Vec<InstrumentListing>)
    ),
    tag = "Trains"
)]
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<Vec<InstrumentListing>> {
    Json(state.market.list_instruments(Catalog::Routes))
}

/// Get the price history of a train route.
#[utoipa::path(
    get,
    path = "/api/train/{route}",
    params(
        ("route" = String, Path, description = "Route key, e.g. PARIS-LYON (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Route price summary", body = RouteSummaryResponse),
        (status = 404, description = "Route not found", body = ErrorResponse)
    ),
    tag = "Trains"
)]
pub async fn get_train(
    State(state): State<Arc<AppState>>,
    Path(route): Path<String>,
) -> Result<Json<RouteSummaryResponse>, ApiError> {
    let route = Catalog::Routes.normalize_key(&route);
    let summary = state.market.get_summary(Catalog::Routes, &route)?;

    Ok(Json(RouteSummaryResponse { route, summary }))
}

/// Get the price history of every train route.
#[utoipa::path(
    get,
    path = "/api/trains-batch",
    responses(
        (status = 200, description = "Route price summaries keyed by route", body = SummaryBatchResponse)
    ),
    tag = "Trains"
)]
pub async fn get_trains_batch(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryBatchResponse>, ApiError> {
    let summaries = state.market.get_all_summaries(Catalog::Routes)?;
    Ok(Json(SummaryBatchResponse(summaries)))
}

// ============================================================================
// Tech Products
// ============================================================================

/// List all tech products.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List of products", body = Vec<InstrumentListing>)
    ),
    tag = "Tech"
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<InstrumentListing>> {
    Json(state.market.list_instruments(Catalog::Products))
}

/// Get recent prices of every tech product.
#[utoipa::path(
    get,
    path = "/api/tech",
    responses(
        (status = 200, description = "Product price summaries keyed by product, recent history only", body = SummaryBatchResponse)
    ),
    tag = "Tech"
)]
pub async fn get_tech_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryBatchResponse>, ApiError> {
    let summaries = state.market.get_all_summaries(Catalog::Products)?;
    Ok(Json(SummaryBatchResponse(summaries)))
}

/// Get the full price history of a tech product.
#[utoipa::path(
    get,
    path = "/api/tech/{product}",
    params(
        ("product" = String, Path, description = "Product name, URL-encoded (case-sensitive)")
    ),
    responses(
        (status = 200, description = "Product price summary", body = ProductSummaryResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Tech"
)]
pub async fn get_tech(
    State(state): State<Arc<AppState>>,
    Path(product): Path<String>,
) -> Result<Json<ProductSummaryResponse>, ApiError> {
    let summary = state.market.get_summary(Catalog::Products, &product)?;
    Ok(Json(ProductSummaryResponse { product, summary }))
}
