//! Read-only query interface over the catalogs and their price series.

use crate::catalog::{Catalog, CatalogRegistry, InstrumentListing};
use crate::error::EngineError;
use crate::series::SeriesStore;
use crate::summary::{Summary, SummaryOptions, summarize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Query façade used by the HTTP handlers.
///
/// Every call reads a fresh snapshot of the store and builds summaries on the
/// fly; nothing is mutated.
#[derive(Debug, Clone)]
pub struct MarketData {
    registry: Arc<CatalogRegistry>,
    store: Arc<SeriesStore>,
    batch_history: usize,
}

impl MarketData {
    /// Creates a façade over `registry` and `store`.
    ///
    /// # Arguments
    /// * `batch_history` - Samples kept per product in [`Self::get_all_summaries`].
    #[must_use]
    pub fn new(registry: Arc<CatalogRegistry>, store: Arc<SeriesStore>, batch_history: usize) -> Self {
        Self {
            registry,
            store,
            batch_history,
        }
    }

    /// Lists the instruments of a catalog in definition order.
    #[must_use]
    pub fn list_instruments(&self, catalog: Catalog) -> Vec<InstrumentListing> {
        self.registry.listing(catalog)
    }

    /// Summary of one instrument with its full history.
    ///
    /// Route keys are matched case-insensitively, product keys exactly.
    ///
    /// # Errors
    /// Returns [`EngineError::NotFound`] if the instrument does not exist.
    pub fn get_summary(&self, catalog: Catalog, raw_key: &str) -> Result<Summary, EngineError> {
        let key = catalog.normalize_key(raw_key);
        let series = self.store.get(catalog, &key)?;
        summarize(&key, &series, SummaryOptions::single(catalog))
    }

    /// Summaries of every instrument in a catalog, keyed by instrument.
    ///
    /// Product histories are cut to the newest `batch_history` samples.
    ///
    /// # Errors
    /// Returns an error if a registered instrument has no series.
    pub fn get_all_summaries(&self, catalog: Catalog) -> Result<BTreeMap<String, Summary>, EngineError> {
        let options = SummaryOptions::batch(catalog, self.batch_history);

        self.registry
            .instruments(catalog)
            .iter()
            .map(|instrument| -> Result<(String, Summary), EngineError> {
                let series = self.store.get(catalog, &instrument.key)?;
                let summary = summarize(&instrument.key, &series, options)?;
                Ok((instrument.key.clone(), summary))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SimulationConfig};
    use crate::generator::generate;
    use crate::series::Sample;
    use chrono::{Duration, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_market() -> (MarketData, Arc<CatalogRegistry>, Arc<SeriesStore>) {
        let config = Config::default();
        let registry = Arc::new(CatalogRegistry::new(&config.routes, &config.products));
        let store = Arc::new(SeriesStore::new(config.simulation.history_cap));
        let mut rng = StdRng::seed_from_u64(42);
        registry
            .seed_store(&store, &config.simulation, Utc::now(), &mut rng)
            .unwrap();

        let market = MarketData::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            config.simulation.batch_history,
        );
        (market, registry, store)
    }

    fn fill_to_cap(registry: &CatalogRegistry, store: &SeriesStore) {
        let mut rng = StdRng::seed_from_u64(1);
        let start = Utc::now();
        for minute in 1..=200 {
            let at = start + Duration::minutes(minute);
            for (catalog, instrument) in registry.iter() {
                let price = generate(instrument.base, instrument.variance, instrument.seed_offset, at, &mut rng);
                store
                    .append(catalog, &instrument.key, Sample { time: at, price })
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_list_routes() {
        let (market, _, _) = seeded_market();
        let routes = market.list_instruments(Catalog::Routes);
        assert_eq!(routes.len(), 11);
        assert!(routes.iter().all(|r| r.from.is_some() && r.to.is_some()));
    }

    #[test]
    fn test_list_products() {
        let (market, _, _) = seeded_market();
        let products = market.list_instruments(Catalog::Products);
        assert_eq!(products.len(), 10);
        assert_eq!(products[2].id, "RTX 4070 Ti");
    }

    #[test]
    fn test_route_lookup_is_case_insensitive() {
        let (market, _, _) = seeded_market();
        let upper = market.get_summary(Catalog::Routes, "PARIS-LYON").unwrap();
        let lower = market.get_summary(Catalog::Routes, "paris-lyon").unwrap();
        assert_eq!(upper, lower);
        assert!(upper.open.is_some());
        assert_eq!(upper.history.len(), 50);
    }

    #[test]
    fn test_product_lookup_is_case_sensitive() {
        let (market, _, _) = seeded_market();
        let summary = market.get_summary(Catalog::Products, "RTX 4090").unwrap();
        assert!(summary.open.is_none());

        let err = market.get_summary(Catalog::Products, "rtx 4090").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { catalog: Catalog::Products, .. }));
    }

    #[test]
    fn test_unknown_route() {
        let (market, _, _) = seeded_market();
        let err = market.get_summary(Catalog::Routes, "unknown-route").unwrap_err();
        assert_eq!(
            err,
            EngineError::NotFound {
                catalog: Catalog::Routes,
                key: "UNKNOWN-ROUTE".to_string()
            }
        );
    }

    #[test]
    fn test_all_route_summaries_have_full_history_and_open() {
        let (market, registry, store) = seeded_market();
        fill_to_cap(&registry, &store);

        let all = market.get_all_summaries(Catalog::Routes).unwrap();
        assert_eq!(all.len(), 11);
        for summary in all.values() {
            assert_eq!(summary.history.len(), 200);
            assert!(summary.open.is_some());
        }
    }

    #[test]
    fn test_all_product_summaries_truncate_history() {
        let (market, registry, store) = seeded_market();
        fill_to_cap(&registry, &store);

        let all = market.get_all_summaries(Catalog::Products).unwrap();
        assert_eq!(all.len(), 10);
        for (product, summary) in &all {
            assert_eq!(summary.history.len(), 60);
            assert!(summary.open.is_none());

            let full = market.get_summary(Catalog::Products, product).unwrap();
            assert_eq!(full.history.len(), 200);
            assert_eq!(full.history[140..], summary.history[..]);
            assert_eq!(full.current, summary.current);
        }
    }

    #[test]
    fn test_reads_are_idempotent() {
        let (market, _, _) = seeded_market();
        let first = market.get_all_summaries(Catalog::Routes).unwrap();
        let second = market.get_all_summaries(Catalog::Routes).unwrap();
        assert_eq!(first, second);

        let a = market.get_summary(Catalog::Products, "RTX 4080").unwrap();
        let b = market.get_summary(Catalog::Products, "RTX 4080").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_series_is_reported() {
        let config = Config::default();
        let registry = Arc::new(CatalogRegistry::new(&config.routes, &config.products));
        let store = Arc::new(SeriesStore::new(SimulationConfig::default().history_cap));
        let market = MarketData::new(registry, store, 60);

        assert!(market.get_all_summaries(Catalog::Routes).is_err());
    }
}
