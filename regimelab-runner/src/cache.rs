//! In-memory memo of indicator snapshots.
//!
//! Snapshots are pure functions of (candles, periods), so they are keyed by
//! the series fingerprint plus the periods and never invalidated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use regimelab_core::{
    CandleSeries, IndicatorPeriods, IndicatorSnapshot, SeriesFingerprint, SnapshotKey,
};

#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: Mutex<HashMap<SnapshotKey, IndicatorSnapshot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot for this series and periods, computing it on a miss.
    ///
    /// The lock is not held while computing; two threads racing on the same
    /// key both compute and store identical values.
    pub fn get_or_compute(
        &self,
        series: &CandleSeries,
        periods: &IndicatorPeriods,
    ) -> IndicatorSnapshot {
        let key = SnapshotKey::new(SeriesFingerprint::of(series), periods);

        if let Some(snapshot) = self.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return snapshot.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let snapshot = IndicatorSnapshot::compute(series, periods);
        self.lock().insert(key, snapshot.clone());
        snapshot
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SnapshotKey, IndicatorSnapshot>> {
        // Entries are immutable values; a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticCandleSource;
    use regimelab_core::CandleSource;

    #[test]
    fn second_lookup_hits() {
        let cache = SnapshotCache::new();
        let series = SyntheticCandleSource::new(100).fetch("BTC").unwrap();
        let periods = IndicatorPeriods::default();

        let first = cache.get_or_compute(&series, &periods);
        let second = cache.get_or_compute(&series, &periods);
        assert_eq!(first, second);
        assert_eq!(first, IndicatorSnapshot::compute(&series, &periods));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn periods_are_part_of_the_key() {
        let cache = SnapshotCache::new();
        let series = SyntheticCandleSource::new(100).fetch("BTC").unwrap();
        let mut fast = IndicatorPeriods::default();
        fast.rsi = 5;

        let slow = cache.get_or_compute(&series, &IndicatorPeriods::default());
        let quick = cache.get_or_compute(&series, &fast);
        assert_eq!(quick.rsi.period, 5);
        assert_eq!(slow.rsi.period, 14);
        assert_eq!(cache.stats().entries, 2);

        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn shared_across_threads() {
        let cache = SnapshotCache::new();
        let series = SyntheticCandleSource::new(100).fetch("ETH").unwrap();
        let periods = IndicatorPeriods::default();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| cache.get_or_compute(&series, &periods));
            }
        });
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits + stats.misses, 4);
    }
}
