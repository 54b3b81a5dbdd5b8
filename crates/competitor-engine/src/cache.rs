//! Snapshot cache shared across analysis runs
//!
//! Entries are never refreshed once stored: a long-lived engine keeps serving
//! the fundamentals it saw first for a symbol. The cache is bounded and evicts
//! the least recently used symbol when full; callers that need fresh data per
//! run clear it between runs.

use cached::{Cached, SizedCache};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::snapshot::StockSnapshot;

/// Thread-safe LRU cache of stock snapshots keyed by symbol
pub struct SnapshotCache {
    cache: Arc<Mutex<SizedCache<String, StockSnapshot>>>,
}

impl SnapshotCache {
    /// Create a new cache holding at most `capacity` symbols
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Arc::new(Mutex::new(SizedCache::with_size(capacity.max(1)))),
        }
    }

    /// Get a snapshot from the cache
    pub async fn get(&self, symbol: &str) -> Option<StockSnapshot> {
        let mut cache = self.cache.lock().await;
        cache.cache_get(&symbol.to_string()).cloned()
    }

    /// Insert a snapshot, keyed by its symbol
    pub async fn insert(&self, snapshot: StockSnapshot) {
        let mut cache = self.cache.lock().await;
        let _ = cache.cache_set(snapshot.symbol.clone(), snapshot);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.lock().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.lock().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for SnapshotCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = SnapshotCache::new(8);
        let snapshot = StockSnapshot {
            pe_ratio: Some(28.0),
            ..StockSnapshot::new("AAPL")
        };

        cache.insert(snapshot.clone()).await;

        assert_eq!(cache.get("AAPL").await, Some(snapshot));
        assert_eq!(cache.get("MSFT").await, None);
    }

    #[tokio::test]
    async fn test_cache_evicts_least_recently_used() {
        let cache = SnapshotCache::new(2);
        cache.insert(StockSnapshot::new("AAA")).await;
        cache.insert(StockSnapshot::new("BBB")).await;

        // Touch AAA so BBB becomes the eviction candidate
        assert!(cache.get("AAA").await.is_some());
        cache.insert(StockSnapshot::new("CCC")).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("AAA").await.is_some());
        assert!(cache.get("BBB").await.is_none());
        assert!(cache.get("CCC").await.is_some());
    }

    #[tokio::test]
    async fn test_cache_clear_and_shared_clone() {
        let cache = SnapshotCache::new(8);
        let shared = cache.clone();

        for symbol in ["AAA", "BBB", "CCC"] {
            cache.insert(StockSnapshot::new(symbol)).await;
        }
        assert_eq!(shared.len().await, 3);

        shared.clear().await;
        assert!(cache.is_empty().await);
    }
}
