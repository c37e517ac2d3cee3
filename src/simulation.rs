//! Periodic price refresh.
//!
//! Every tick appends one freshly generated sample to the series of every
//! instrument in both catalogs. Ticks are serialized through the simulator's
//! tick lock, so a manual [`PriceSimulator::tick_at`] never interleaves with
//! the background loop.

use crate::catalog::CatalogRegistry;
use crate::config::SimulationConfig;
use crate::generator::generate;
use crate::series::{Sample, SeriesStore};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Time stamped on every sample of the tick.
    pub time: DateTime<Utc>,
    /// Samples appended.
    pub appended: usize,
    /// Old samples evicted by the appends.
    pub evicted: usize,
    /// Instruments whose append failed.
    pub failed: usize,
}

/// Price refresh scheduler.
pub struct PriceSimulator {
    /// Instruments to refresh.
    registry: Arc<CatalogRegistry>,
    /// Series receiving the new samples.
    store: Arc<SeriesStore>,
    /// Simulation configuration.
    config: SimulationConfig,
    /// Randomness source; holding it is the tick lock.
    rng: Mutex<StdRng>,
}

impl PriceSimulator {
    /// Creates a simulator drawing randomness from OS entropy.
    #[must_use]
    pub fn new(registry: Arc<CatalogRegistry>, store: Arc<SeriesStore>, config: SimulationConfig) -> Self {
        Self::with_rng(registry, store, config, StdRng::from_entropy())
    }

    /// Creates a simulator with an explicit randomness source.
    #[must_use]
    pub fn with_rng(
        registry: Arc<CatalogRegistry>,
        store: Arc<SeriesStore>,
        config: SimulationConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            registry,
            store,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Simulation configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs one tick stamped with the current time.
    pub fn tick(&self) -> TickReport {
        self.tick_at(Utc::now())
    }

    /// Runs one tick stamped with `now`.
    ///
    /// A failed append is logged and skipped; the other instruments are still
    /// refreshed.
    pub fn tick_at(&self, now: DateTime<Utc>) -> TickReport {
        let mut rng = self.rng.lock();
        let mut report = TickReport {
            time: now,
            appended: 0,
            evicted: 0,
            failed: 0,
        };

        for (catalog, instrument) in self.registry.iter() {
            let price = generate(
                instrument.base,
                instrument.variance,
                instrument.seed_offset,
                now,
                &mut *rng,
            );

            match self
                .store
                .append(catalog, &instrument.key, Sample { time: now, price })
            {
                Ok(evicted) => {
                    report.appended += 1;
                    report.evicted += evicted;
                    debug!("Price update: {} {} = {}", catalog, instrument.key, price);
                }
                Err(err) => {
                    report.failed += 1;
                    warn!("Failed to append price for {}: {}", instrument.key, err);
                }
            }
        }

        report
    }

    /// Runs the refresh loop until `shutdown` flips to `true` or its sender is
    /// dropped.
    ///
    /// The first tick fires on the next wall-clock multiple of the interval.
    /// A tick that overruns delays the following one instead of overlapping it.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            info!("Price simulation disabled");
            return;
        }

        let period = self.config.interval();
        let delay = delay_until_next_boundary(Utc::now(), period);

        info!(
            "Starting price simulation every {}s, first tick in {}ms",
            period.as_secs(),
            delay.as_millis()
        );

        let start = Instant::now();
        let mut ticker = interval_at(start.checked_add(delay).unwrap_or(start), period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.tick();
                    info!(
                        "[{}] Prices updated: {} appended, {} evicted, {} failed",
                        report.time.to_rfc3339(),
                        report.appended,
                        report.evicted,
                        report.failed
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Price simulation stopped");
    }

    /// Spawns [`Self::run`] on the runtime and returns its handle.
    #[must_use]
    pub fn spawn(self: Arc<Self>) -> SimulationHandle {
        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(self.run(receiver));
        SimulationHandle { shutdown, task }
    }
}

/// Handle owning a running refresh loop.
#[derive(Debug)]
pub struct SimulationHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    /// Returns `true` once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the loop and waits for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!("Price simulation task failed: {}", err);
        }
    }
}

/// Time from `now` until the next wall-clock multiple of `period`.
///
/// Returns zero when `now` sits exactly on a boundary.
#[must_use]
pub fn delay_until_next_boundary(now: DateTime<Utc>, period: Duration) -> Duration {
    let period_ms = period.as_millis() as i64;
    if period_ms <= 0 {
        return Duration::ZERO;
    }

    match now.timestamp_millis().rem_euclid(period_ms) {
        0 => Duration::ZERO,
        elapsed => Duration::from_millis((period_ms - elapsed) as u64),
    }
}
