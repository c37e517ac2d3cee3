//! Instrument catalogs: train routes and tech products.
//!
//! The registry is built once at startup from configuration and never
//! mutated afterwards. It owns the per-instrument generation parameters and
//! knows how to backfill the initial history of every instrument.

use crate::config::{InstrumentDef, SimulationConfig};
use crate::error::EngineError;
use crate::generator::generate;
use crate::series::{Sample, SeriesStore};
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;
use utoipa::ToSchema;

/// Seed offset applied to the route catalog.
pub const ROUTE_SEED_BASE: f64 = 0.0;

/// Seed offset applied to the product catalog, keeps product seeds clear of route seeds.
pub const PRODUCT_SEED_BASE: f64 = 100.0;

/// Seed increment per backfilled minute.
const BACKFILL_SEED_STEP: f64 = 0.1;

/// One of the two instrument groups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// Train routes, keyed `FROM-TO`.
    Routes,
    /// Tech products, keyed by display name.
    Products,
}

impl Catalog {
    /// Both catalogs, routes first.
    pub const ALL: [Catalog; 2] = [Catalog::Routes, Catalog::Products];

    /// Maps a raw lookup key onto the catalog's key scheme.
    ///
    /// Route keys are matched case-insensitively by uppercasing; product keys
    /// are matched exactly.
    #[must_use]
    pub fn normalize_key(self, raw: &str) -> String {
        match self {
            Catalog::Routes => raw.to_uppercase(),
            Catalog::Products => raw.to_string(),
        }
    }

    /// Whether summaries for this catalog carry the opening price.
    #[must_use]
    pub fn includes_open(self) -> bool {
        matches!(self, Catalog::Routes)
    }

    /// Seed offset of the catalog's first instrument.
    #[must_use]
    pub fn seed_base(self) -> f64 {
        match self {
            Catalog::Routes => ROUTE_SEED_BASE,
            Catalog::Products => PRODUCT_SEED_BASE,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routes => write!(f, "routes"),
            Self::Products => write!(f, "products"),
        }
    }
}

/// Generation parameters of a single instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    /// Instrument key (route `FROM-TO` or product name).
    pub key: String,
    /// Base price the series oscillates around.
    pub base: Decimal,
    /// Amplitude applied to the noise signal.
    pub variance: Decimal,
    /// Per-instrument seed, unique across both catalogs.
    pub seed_offset: f64,
    /// Reference peak fare, routes only.
    pub peak: Option<Decimal>,
}

/// Splits a route key into its endpoints on the first hyphen.
///
/// Everything after the first hyphen is the destination, so
/// `PARIS-LA-ROCHELLE` yields `("PARIS", "LA-ROCHELLE")`. A key without a
/// hyphen yields an empty destination.
#[must_use]
pub fn split_route_key(key: &str) -> (String, String) {
    match key.split_once('-') {
        Some((from, to)) => (from.to_string(), to.to_string()),
        None => (key.to_string(), String::new()),
    }
}

/// Public listing entry for an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InstrumentListing {
    /// Instrument key.
    pub id: String,
    /// Departure city (routes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Arrival city (routes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Reference peak fare (routes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<Decimal>,
}

/// Static registry of both catalogs.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    routes: Vec<InstrumentConfig>,
    products: Vec<InstrumentConfig>,
}

impl CatalogRegistry {
    /// Builds the registry, assigning each instrument its catalog index plus
    /// the catalog's seed base as seed.
    #[must_use]
    pub fn new(routes: &[InstrumentDef], products: &[InstrumentDef]) -> Self {
        Self {
            routes: Self::build(Catalog::Routes, routes),
            products: Self::build(Catalog::Products, products),
        }
    }

    fn build(catalog: Catalog, defs: &[InstrumentDef]) -> Vec<InstrumentConfig> {
        defs.iter()
            .enumerate()
            .map(|(idx, def)| InstrumentConfig {
                key: def.key.clone(),
                base: def.base,
                variance: def.variance,
                seed_offset: catalog.seed_base() + idx as f64,
                peak: def.peak,
            })
            .collect()
    }

    /// Instruments of a catalog, in definition order.
    #[must_use]
    pub fn instruments(&self, catalog: Catalog) -> &[InstrumentConfig] {
        match catalog {
            Catalog::Routes => &self.routes,
            Catalog::Products => &self.products,
        }
    }

    /// Iterates over every instrument of both catalogs.
    pub fn iter(&self) -> impl Iterator<Item = (Catalog, &InstrumentConfig)> {
        Catalog::ALL
            .into_iter()
            .flat_map(move |catalog| self.instruments(catalog).iter().map(move |i| (catalog, i)))
    }

    /// Total number of instruments across both catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len() + self.products.len()
    }

    /// Returns `true` if neither catalog has instruments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listing entries of a catalog, in definition order.
    #[must_use]
    pub fn listing(&self, catalog: Catalog) -> Vec<InstrumentListing> {
        self.instruments(catalog)
            .iter()
            .map(|instrument| match catalog {
                Catalog::Routes => {
                    let (from, to) = split_route_key(&instrument.key);
                    InstrumentListing {
                        id: instrument.key.clone(),
                        from: Some(from),
                        to: Some(to),
                        peak: instrument.peak,
                    }
                }
                Catalog::Products => InstrumentListing {
                    id: instrument.key.clone(),
                    from: None,
                    to: None,
                    peak: None,
                },
            })
            .collect()
    }

    /// Backfills the history of every instrument into `store`.
    ///
    /// Each instrument gets `config.seed_points` samples spaced
    /// `config.backfill_step_secs` apart, the newest at `now`. The sample `i`
    /// steps in the past is generated at its own timestamp with the seed
    /// shifted by `i * 0.1`.
    ///
    /// # Errors
    /// Returns [`EngineError::AlreadySeeded`] if the store already holds one
    /// of the instruments and [`EngineError::BackfillOutOfRange`] if a
    /// backfilled timestamp cannot be represented.
    pub fn seed_store<R: Rng + ?Sized>(
        &self,
        store: &SeriesStore,
        config: &SimulationConfig,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<usize, EngineError> {
        let step = i64::try_from(config.backfill_step_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                EngineError::BackfillOutOfRange(format!("step of {}s", config.backfill_step_secs))
            })?;
        let mut seeded = 0;

        for (catalog, instrument) in self.iter() {
            let points = (0..config.seed_points)
                .rev()
                .map(|offset| {
                    let time = i32::try_from(offset)
                        .ok()
                        .and_then(|steps| step.checked_mul(steps))
                        .and_then(|back| now.checked_sub_signed(back))
                        .ok_or_else(|| {
                            EngineError::BackfillOutOfRange(format!(
                                "{} steps of {}s before {}",
                                offset, config.backfill_step_secs, now
                            ))
                        })?;
                    let seed = instrument.seed_offset + offset as f64 * BACKFILL_SEED_STEP;
                    Ok(Sample {
                        time,
                        price: generate(instrument.base, instrument.variance, seed, time, rng),
                    })
                })
                .collect::<Result<Vec<_>, EngineError>>()?;

            store.seed(catalog, &instrument.key, points)?;
            seeded += 1;
        }

        info!(
            "Seeded {} instruments with {} samples each",
            seeded, config.seed_points
        );

        Ok(seeded)
    }
}
