//! Synthetic price generation.
//!
//! Prices drift along three superimposed sine waves of wall-clock time with a
//! uniform jitter term on top, scaled by the instrument's variance around its
//! base price.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Prices never fall below this fraction of the base price.
const FLOOR_RATIO: Decimal = dec!(0.4);

/// (period in ms, seed multiplier, weight) of each sine component.
const WAVES: [(f64, f64, f64); 3] = [
    (100_000.0, 1.0, 0.3),
    (50_000.0, 2.0, 0.2),
    (20_000.0, 3.0, 0.15),
];

/// Weight of the uniform jitter term.
const JITTER_WEIGHT: f64 = 0.35;

/// Rounds a price to cents, half away from zero.
#[must_use]
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Lowest price [`generate`] can return for `base`.
#[must_use]
pub fn floor_price(base: Decimal) -> Decimal {
    round_price(base * FLOOR_RATIO)
}

/// Unscaled noise signal at `at` for `seed`, roughly within `[-0.83, 0.83]`.
pub fn noise<R: Rng + ?Sized>(seed: f64, at: DateTime<Utc>, rng: &mut R) -> f64 {
    let t = at.timestamp_millis() as f64;
    let drift: f64 = WAVES
        .iter()
        .map(|(period, multiplier, weight)| (t / period + seed * multiplier).sin() * weight)
        .sum();
    let jitter = (rng.r#gen::<f64>() - 0.5) * JITTER_WEIGHT;

    drift + jitter
}

/// Generates a price for an instrument at `at`.
///
/// The result is `base + noise * variance` rounded to cents and floored at
/// 40% of `base`. A zero variance returns the rounded base exactly.
pub fn generate<R: Rng + ?Sized>(
    base: Decimal,
    variance: Decimal,
    seed: f64,
    at: DateTime<Utc>,
    rng: &mut R,
) -> Decimal {
    // noise is a finite sum of bounded terms
    let noise = Decimal::from_f64(noise(seed, at, rng)).unwrap_or_default();
    let price = round_price(base + noise * variance);

    price.max(floor_price(base))
}
