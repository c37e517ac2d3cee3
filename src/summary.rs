//! Summary statistics derived from a series snapshot.

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::generator::round_price;
use crate::series::{Sample, Series};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Shape of a summary: how much history to return and whether to report the
/// opening price. The default keeps the full history without `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryOptions {
    /// Return only the newest `n` samples in `history`.
    pub history_limit: Option<usize>,
    /// Report the first sample's price as `open`.
    pub include_open: bool,
}

impl SummaryOptions {
    /// Options for a single-instrument query.
    #[must_use]
    pub fn single(catalog: Catalog) -> Self {
        Self {
            history_limit: None,
            include_open: catalog.includes_open(),
        }
    }

    /// Options for a whole-catalog query. Products return only the newest
    /// `batch_history` samples.
    #[must_use]
    pub fn batch(catalog: Catalog, batch_history: usize) -> Self {
        Self {
            history_limit: match catalog {
                Catalog::Routes => None,
                Catalog::Products => Some(batch_history),
            },
            include_open: catalog.includes_open(),
        }
    }
}

/// Statistics of one instrument's series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Price history, oldest first.
    pub history: Vec<Sample>,
    /// Latest price.
    pub current: Decimal,
    /// Price before the latest one.
    #[serde(skip)]
    pub previous: Decimal,
    /// `current - previous`.
    pub change: Decimal,
    /// Change relative to `previous`, in percent.
    pub change_percent: Decimal,
    /// Highest price of the series.
    pub high: Decimal,
    /// Lowest price of the series.
    pub low: Decimal,
    /// First price of the series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
}

/// Percentage change, zero when `previous` is zero.
#[must_use]
pub fn change_percent(change: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    round_price(change / previous * Decimal::ONE_HUNDRED)
}

/// Builds the summary of a series.
///
/// `high`, `low` and `open` cover the whole series even when `history` is
/// truncated by `options.history_limit`.
///
/// # Errors
/// Returns [`EngineError::EmptySeries`] if the series has no samples.
pub fn summarize(key: &str, series: &Series, options: SummaryOptions) -> Result<Summary, EngineError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(EngineError::EmptySeries(key.to_string()));
    };

    let current = last.price;
    let previous = series.nth_back(1).map_or(current, |s| s.price);
    let change = round_price(current - previous);

    let (high, low) = series
        .iter()
        .fold((first.price, first.price), |(high, low), s| {
            (high.max(s.price), low.min(s.price))
        });

    let history = match options.history_limit {
        Some(limit) => series.tail(limit),
        None => series.iter().copied().collect(),
    };

    Ok(Summary {
        history,
        current,
        previous,
        change,
        change_percent: change_percent(change, previous),
        high,
        low,
        open: options.include_open.then_some(first.price),
    })
}
