//! Cache adapter contract.
//!
//! The same abstraction backs two independently keyed caches:
//!
//! - the **result cache**, keyed by business identity (a patient id), used as
//!   a read-through cache in front of the gateway
//! - the **correlation cache**, keyed by a single-use correlation id, written
//!   by the callback handler and read by the waiting requester
//!
//! Implementations only need atomic per-key `get`/`put`; no cross-key
//! transactions are required.

use async_trait::async_trait;
use tokio::sync::broadcast;

/// Generic asynchronous key/value store.
///
/// Values are returned by clone; store `Arc<T>` if clones are expensive.
#[async_trait]
pub trait CacheAdapter<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Get a value by key.
    ///
    /// Returns `None` if the entry doesn't exist or has expired.
    async fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace a value. Last writer wins.
    async fn put(&self, key: &str, value: V);

    /// Remove an entry if present.
    async fn invalidate(&self, key: &str);

    /// Get cache statistics for monitoring.
    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    /// Clean up expired entries.
    ///
    /// Default implementation is a no-op (for backends with native TTL).
    fn cleanup_expired(&self) -> usize {
        0
    }
}

/// A cache whose writes can be observed.
///
/// Every successful `put` publishes the written key to all current
/// subscribers. Writes that happen before `subscribe` is called are not
/// delivered, so waiters must subscribe before their first `get`.
pub trait ObservableCache<V>: CacheAdapter<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub size: usize,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries evicted due to TTL expiration.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}
