//! Bounded per-instrument price history.
//!
//! This module stores the price series of every instrument in memory, keyed by
//! catalog and instrument key. Each series is capped: appending past the cap
//! evicts the oldest samples first.

use crate::catalog::Catalog;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use utoipa::ToSchema;

/// Key for storing series: (catalog, instrument key).
type SeriesKey = (Catalog, String);

/// A single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Sample {
    /// Observation time.
    pub time: DateTime<Utc>,
    /// Price in currency units, two decimals.
    pub price: Decimal,
}

/// Timestamp-ordered, capped sequence of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    samples: VecDeque<Sample>,
    cap: usize,
}

impl Series {
    /// Creates an empty series holding at most `cap` samples.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Builds a series from ordered samples, keeping the newest `cap`.
    #[must_use]
    pub fn from_samples(cap: usize, samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut series = Self::new(cap);
        for sample in samples {
            series.samples.push_back(sample);
            series.evict();
        }
        series
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest sample.
    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Newest sample.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Sample `n` positions before the newest one.
    #[must_use]
    pub fn nth_back(&self, n: usize) -> Option<&Sample> {
        self.samples.len().checked_sub(n + 1).and_then(|idx| self.samples.get(idx))
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// The newest `n` samples, oldest first.
    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    /// Appends a sample and returns how many old samples were evicted.
    fn push(&mut self, sample: Sample) -> Result<usize, Sample> {
        if let Some(last) = self.samples.back()
            && sample.time < last.time
        {
            return Err(sample);
        }
        self.samples.push_back(sample);
        Ok(self.evict())
    }

    fn evict(&mut self) -> usize {
        let mut evicted = 0;
        while self.samples.len() > self.cap {
            self.samples.pop_front();
            evicted += 1;
        }
        evicted
    }
}

/// Store holding one series per instrument.
///
/// Each series sits behind its own map entry: readers clone a consistent
/// snapshot under the entry's read guard while the scheduler appends under the
/// write guard.
#[derive(Debug)]
pub struct SeriesStore {
    /// Storage for series: (catalog, key) -> series.
    series: DashMap<SeriesKey, Series>,
    /// Maximum samples per series.
    cap: usize,
}

impl SeriesStore {
    /// Creates an empty store whose series hold at most `cap` samples.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            series: DashMap::new(),
            cap,
        }
    }

    /// Maximum samples per series.
    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Initializes the series of an instrument.
    ///
    /// # Errors
    /// Returns [`EngineError::AlreadySeeded`] if the instrument already has a
    /// series, [`EngineError::EmptySeries`] if `points` is empty and
    /// [`EngineError::OutOfOrder`] if `points` is not ordered by time.
    pub fn seed(&self, catalog: Catalog, key: &str, points: Vec<Sample>) -> Result<(), EngineError> {
        if points.is_empty() {
            return Err(EngineError::EmptySeries(key.to_string()));
        }
        if points.windows(2).any(|pair| pair[1].time < pair[0].time) {
            return Err(EngineError::OutOfOrder(key.to_string()));
        }

        match self.series.entry((catalog, key.to_string())) {
            Entry::Occupied(_) => Err(EngineError::AlreadySeeded {
                catalog,
                key: key.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Series::from_samples(self.cap, points));
                Ok(())
            }
        }
    }

    /// Appends a sample to an instrument's series, evicting the oldest samples
    /// beyond the cap. Returns the number of evicted samples.
    ///
    /// # Errors
    /// Returns [`EngineError::NotFound`] for an unknown instrument and
    /// [`EngineError::OutOfOrder`] if `sample` is older than the newest sample.
    pub fn append(&self, catalog: Catalog, key: &str, sample: Sample) -> Result<usize, EngineError> {
        let mut series = self
            .series
            .get_mut(&(catalog, key.to_string()))
            .ok_or_else(|| EngineError::NotFound {
                catalog,
                key: key.to_string(),
            })?;

        series
            .push(sample)
            .map_err(|_| EngineError::OutOfOrder(key.to_string()))
    }

    /// Returns a snapshot copy of an instrument's series.
    ///
    /// # Errors
    /// Returns [`EngineError::NotFound`] for an unknown instrument.
    pub fn get(&self, catalog: Catalog, key: &str) -> Result<Series, EngineError> {
        self.series
            .get(&(catalog, key.to_string()))
            .map(|series| series.clone())
            .ok_or_else(|| EngineError::NotFound {
                catalog,
                key: key.to_string(),
            })
    }

    /// Keys of every seeded instrument in a catalog.
    #[must_use]
    pub fn list_keys(&self, catalog: Catalog) -> BTreeSet<String> {
        self.series
            .iter()
            .filter(|entry| entry.key().0 == catalog)
            .map(|entry| entry.key().1.clone())
            .collect()
    }

    /// Current length of an instrument's series.
    #[must_use]
    pub fn len(&self, catalog: Catalog, key: &str) -> Option<usize> {
        self.series
            .get(&(catalog, key.to_string()))
            .map(|series| series.len())
    }

    /// Number of series held.
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }
}
