//! Local in-memory cache using DashMap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::adapter::{CacheAdapter, CacheStats, ObservableCache};

/// Buffer size for the write notification channel.
/// Slow subscribers beyond this limit observe a lag and must re-check the cache.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Cached entry with expiration time.
struct CachedEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CachedEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Per-instance cache with TTL-based expiration and write notifications.
///
/// Expired entries are evicted lazily on `get`, or in bulk by
/// [`LocalCache::cleanup_expired`] from a background task.
pub struct LocalCache<V> {
    name: &'static str,
    entries: DashMap<String, CachedEntry<V>>,
    ttl: Duration,
    writes: broadcast::Sender<String>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V> LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache. `name` is only used in log output.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        let (writes, _) = broadcast::channel(DEFAULT_BUFFER_SIZE);
        Self {
            name,
            entries: DashMap::new(),
            ttl,
            writes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live write subscriptions (pending waiters).
    pub fn subscriber_count(&self) -> usize {
        self.writes.receiver_count()
    }

    /// Remove every expired entry. Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            if entry.is_expired(now) {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
            tracing::debug!(cache = self.name, removed, "expired cache entries removed");
        }

        removed
    }
}

#[async_trait]
impl<V> CacheAdapter<V> for LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            drop(entry);
            if self
                .entries
                .remove_if(key, |_, entry| entry.is_expired(now))
                .is_some()
            {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn put(&self, key: &str, value: V) {
        let entry = CachedEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(key.to_string(), entry);
        // No subscribers is fine: nobody is waiting on this key.
        let waiters = self.writes.send(key.to_string()).unwrap_or_default();
        tracing::trace!(cache = self.name, key = %key, waiters, "cache put");
    }

    async fn invalidate(&self, key: &str) {
        self.entries.remove(key);
        tracing::debug!(cache = self.name, key = %key, "cache invalidated");
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn cleanup_expired(&self) -> usize {
        LocalCache::cleanup_expired(self)
    }
}

impl<V> ObservableCache<V> for LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.writes.subscribe()
    }
}

impl<V> std::fmt::Debug for LocalCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCache")
            .field("name", &self.name)
            .field("size", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
