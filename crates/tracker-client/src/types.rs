//! Response types for the TrainTracker API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

// ============================================================================
// Catalogs
// ============================================================================

/// Train route listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Route key (e.g., "PARIS-LYON").
    pub id: String,
    /// Departure city.
    pub from: String,
    /// Arrival city.
    pub to: String,
    /// Reference peak fare.
    #[serde(default)]
    pub peak: Option<f64>,
}

/// Tech product listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Product name.
    pub id: String,
}

// ============================================================================
// Prices
// ============================================================================

/// A timestamped price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// RFC 3339 timestamp.
    pub time: String,
    /// Price in euros.
    pub price: f64,
}

/// Price statistics of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    /// Samples, oldest first.
    pub history: Vec<PricePoint>,
    /// Latest price.
    pub current: f64,
    /// Latest price minus the one before it.
    pub change: f64,
    /// Change relative to the previous price, in percent.
    pub change_percent: f64,
    /// Highest price over the retained history.
    pub high: f64,
    /// Lowest price over the retained history.
    pub low: f64,
    /// Oldest retained price (routes only).
    #[serde(default)]
    pub open: Option<f64>,
}

/// Single-route response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route key, uppercased.
    pub route: String,
    /// Price statistics.
    #[serde(flatten)]
    pub summary: PriceSummary,
}

/// Single-product response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product name.
    pub product: String,
    /// Price statistics.
    #[serde(flatten)]
    pub summary: PriceSummary,
}

/// Batch response keyed by instrument.
pub type SummaryBatch = BTreeMap<String, PriceSummary>;

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
