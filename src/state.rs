//! Application state management.

use crate::catalog::CatalogRegistry;
use crate::config::Config;
use crate::error::EngineError;
use crate::market::MarketData;
use crate::series::SeriesStore;
use crate::simulation::PriceSimulator;
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Instrument catalogs.
    pub registry: Arc<CatalogRegistry>,
    /// Price series of every instrument.
    pub store: Arc<SeriesStore>,
    /// Read-only query façade.
    pub market: MarketData,
    /// Price refresh scheduler.
    pub simulator: Arc<PriceSimulator>,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Creates application state from the default configuration.
    ///
    /// # Errors
    /// Returns error if the initial history cannot be seeded.
    pub fn new() -> Result<Self, EngineError> {
        Self::from_config(Config::default())
    }

    /// Creates application state from configuration, seeding every series
    /// with history ending now.
    ///
    /// # Errors
    /// Returns error if the initial history cannot be seeded.
    pub fn from_config(config: Config) -> Result<Self, EngineError> {
        Self::from_parts(config, StdRng::from_entropy(), Utc::now())
    }

    /// Creates application state with an explicit randomness source and
    /// seeding time.
    ///
    /// # Errors
    /// Returns error if the initial history cannot be seeded.
    pub fn from_parts(config: Config, mut rng: StdRng, now: DateTime<Utc>) -> Result<Self, EngineError> {
        let registry = Arc::new(CatalogRegistry::new(&config.routes, &config.products));
        let store = Arc::new(SeriesStore::new(config.simulation.history_cap));

        registry.seed_store(&store, &config.simulation, now, &mut rng)?;
        info!(
            "Loaded {} routes and {} products",
            config.routes.len(),
            config.products.len()
        );

        let market = MarketData::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            config.simulation.batch_history,
        );
        let simulator = Arc::new(PriceSimulator::with_rng(
            Arc::clone(&registry),
            Arc::clone(&store),
            config.simulation.clone(),
            rng,
        ));

        Ok(Self {
            registry,
            store,
            market,
            simulator,
            config,
        })
    }
}
