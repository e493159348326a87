//! In-memory forecast cache keyed by quantized location.
//!
//! Uses `DashMap` so concurrent requests for different cells do not contend
//! on one lock. Entries are replaced whole on `put`; expired entries are
//! treated as absent on read and removed by the periodic sweep.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::time::Duration;

use crate::clock::SharedClock;
use crate::models::ForecastSeries;
use crate::services::quantize::CacheKey;

/// A cached forecast with the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub forecast: ForecastSeries,
    pub stored_at: DateTime<Utc>,
}

/// Thread-safe forecast cache with a fixed time-to-live.
pub struct ForecastCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: chrono::Duration,
    clock: SharedClock,
}

impl ForecastCache {
    pub fn new(ttl: Duration, clock: SharedClock) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.ttl
    }

    /// Return the cached forecast if it is younger than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<ForecastSeries> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if self.is_fresh(&entry, now) {
            return Some(entry.forecast.clone());
        }
        drop(entry);

        // Lazily evict, unless a concurrent put replaced it meanwhile.
        self.entries
            .remove_if(key, |_, entry| !self.is_fresh(entry, now));
        None
    }

    /// Store `forecast` under `key`, replacing any existing entry.
    pub fn put(&self, key: CacheKey, forecast: ForecastSeries) {
        self.entries.insert(
            key,
            CacheEntry {
                forecast,
                stored_at: self.clock.now(),
            },
        );
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::models::{Coordinate, ForecastPoint, PointValues, Source};
    use crate::services::quantize::quantize;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(6 * 60 * 60);

    fn series(height: f64) -> ForecastSeries {
        let points = (0..7)
            .map(|d| {
                ForecastPoint::new(
                    1_771_070_400 + d * 86_400,
                    PointValues {
                        total_wave_height: height,
                        wind_wave_height: 0.5,
                        swell_height: 0.5,
                        wind_speed: 10.0,
                        wind_direction: 90.0,
                        period: 10.0,
                    },
                    Source::Upstream,
                )
            })
            .collect();
        ForecastSeries::new(points).unwrap()
    }

    fn key() -> CacheKey {
        quantize(Coordinate::new(Some(18.5), Some(110.1)).unwrap())
    }

    fn setup() -> (Arc<ManualClock>, ForecastCache) {
        let clock = ManualClock::new("2026-02-14T12:00:00Z");
        let cache = ForecastCache::new(TTL, clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_get_missing() {
        let (_, cache) = setup();
        assert!(cache.get(&key()).is_none());
    }

    #[test]
    fn test_get_fresh_entry() {
        let (clock, cache) = setup();
        cache.put(key(), series(1.2));
        clock.advance(chrono::Duration::hours(6) - chrono::Duration::seconds(1));
        assert_eq!(cache.get(&key()), Some(series(1.2)));
    }

    #[test]
    fn test_get_expired_exactly_at_ttl() {
        let (clock, cache) = setup();
        cache.put(key(), series(1.2));
        clock.advance(chrono::Duration::hours(6));
        assert!(cache.get(&key()).is_none());
        // Lazily evicted on read
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_put_overwrites_and_restamps() {
        let (clock, cache) = setup();
        cache.put(key(), series(1.2));
        clock.advance(chrono::Duration::hours(5));
        cache.put(key(), series(2.0));
        clock.advance(chrono::Duration::hours(5));
        assert_eq!(cache.get(&key()), Some(series(2.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_expired() {
        let (clock, cache) = setup();
        let other = quantize(Coordinate::new(Some(36.1), Some(120.5)).unwrap());
        cache.put(key(), series(1.2));
        clock.advance(chrono::Duration::hours(4));
        cache.put(other, series(0.8));
        clock.advance(chrono::Duration::hours(3));

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&other).is_some());
    }
}
