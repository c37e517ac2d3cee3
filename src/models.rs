//! Response models for the REST API.

use crate::summary::Summary;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of tracked instruments.
    pub instruments: usize,
    /// Maximum samples kept per instrument.
    pub history_cap: usize,
    /// Seconds between price refreshes.
    pub refresh_interval_secs: u64,
}

/// Price summary of one train route.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteSummaryResponse {
    /// Route key, uppercased.
    pub route: String,
    /// Price statistics.
    #[serde(flatten)]
    pub summary: Summary,
}

/// Price summary of one tech product.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummaryResponse {
    /// Product name.
    pub product: String,
    /// Price statistics.
    #[serde(flatten)]
    pub summary: Summary,
}

/// Price summaries of a whole catalog, keyed by instrument.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryBatchResponse(pub BTreeMap<String, Summary>);
