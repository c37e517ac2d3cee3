//! Error types for the price engine and the REST API.

use crate::catalog::Catalog;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[cfg(test)]
mod tests;

/// Price engine errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// No series exists for the instrument.
    #[error("instrument not found in {catalog}: {key}")]
    NotFound {
        /// Catalog that was searched.
        catalog: Catalog,
        /// Instrument key.
        key: String,
    },

    /// The instrument's series was already initialized.
    #[error("series already seeded in {catalog}: {key}")]
    AlreadySeeded {
        /// Catalog of the instrument.
        catalog: Catalog,
        /// Instrument key.
        key: String,
    },

    /// A series has no samples.
    #[error("empty series: {0}")]
    EmptySeries(String),

    /// A sample is older than the series' newest sample.
    #[error("sample out of order for {0}")]
    OutOfOrder(String),

    /// Backfilled timestamps fall outside the representable time range.
    #[error("backfill out of range: {0}")]
    BackfillOutOfRange(String),
}

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Route not found.
    #[error("Route not found")]
    RouteNotFound(String),

    /// Product not found.
    #[error("Product not found")]
    ProductNotFound(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::RouteNotFound(route) => {
                warn!("Route not found: {}", route);
                (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND")
            }
            ApiError::ProductNotFound(product) => {
                warn!("Product not found: {}", product);
                (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound {
                catalog: Catalog::Routes,
                key,
            } => ApiError::RouteNotFound(key),
            EngineError::NotFound {
                catalog: Catalog::Products,
                key,
            } => ApiError::ProductNotFound(key),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
