// =============================================================================
// Series Cache
// =============================================================================
//
// TTL cache for fetched price series, keyed by (coin, quote currency, span).
// Lookups are lazy about expiry: a stale entry simply misses, and a periodic
// prune task reclaims the memory. The cache keys strictly on what was asked
// of the upstream API, never on anything derived from the series itself.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::types::PriceSeries;

/// Composite key that identifies one upstream chart request.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SeriesKey {
    pub coin_id: String,
    pub vs_currency: String,
    pub days: u32,
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}d", self.coin_id, self.vs_currency, self.days)
    }
}

struct CacheEntry {
    series: PriceSeries,
    fetched_at: Instant,
}

/// Thread-safe TTL cache of fetched price series.
pub struct SeriesCache {
    entries: RwLock<HashMap<SeriesKey, CacheEntry>>,
    ttl: Duration,
}

impl SeriesCache {
    /// Create a cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a clone of the cached series for `key` if still fresh.
    ///
    /// A stale entry misses but is left in place; `prune_expired` removes it
    /// later without lookups ever taking the write lock.
    pub fn get(&self, key: &SeriesKey) -> Option<PriceSeries> {
        let map = self.entries.read();
        match map.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.series.clone()),
            _ => None,
        }
    }

    /// Insert or replace the series for `key`, resetting its freshness.
    pub fn insert(&self, key: SeriesKey, series: PriceSeries) {
        let mut map = self.entries.write();
        map.insert(
            key,
            CacheEntry {
                series,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry older than the TTL; returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let mut map = self.entries.write();
        let before = map.len();
        map.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        let removed = before - map.len();
        if removed > 0 {
            debug!(removed, remaining = map.len(), "expired series pruned");
        }
        removed
    }

    /// Number of entries currently held, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(coin: &str) -> SeriesKey {
        SeriesKey {
            coin_id: coin.to_string(),
            vs_currency: "usd".to_string(),
            days: 30,
        }
    }

    fn series() -> PriceSeries {
        PriceSeries::from_pairs((0..12).map(|i| (1_000 + i * 10, 100.0 + i as f64)))
    }

    #[test]
    fn fresh_entry_hits() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.insert(key("bitcoin"), series());
        let hit = cache.get(&key("bitcoin")).unwrap();
        assert_eq!(hit.len(), 12);
    }

    #[test]
    fn expired_entry_misses_but_lingers() {
        let cache = SeriesCache::new(Duration::from_secs(0));
        cache.insert(key("bitcoin"), series());
        assert!(cache.get(&key("bitcoin")).is_none());
        // Still resident until pruned.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn prune_reclaims_expired_entries() {
        let cache = SeriesCache::new(Duration::from_secs(0));
        cache.insert(key("bitcoin"), series());
        cache.insert(key("ethereum"), series());
        assert_eq!(cache.prune_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn prune_keeps_fresh_entries() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.insert(key("bitcoin"), series());
        assert_eq!(cache.prune_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_parameters_are_distinct_entries() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.insert(key("bitcoin"), series());
        let mut other = key("bitcoin");
        other.days = 90;
        assert!(cache.get(&other).is_none());
        cache.insert(other.clone(), series());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&other).is_some());
    }

    #[test]
    fn key_renders_compactly() {
        assert_eq!(key("kaspa").to_string(), "kaspa/usd@30d");
    }
}
