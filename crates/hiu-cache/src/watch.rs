//! Deadline-bounded waiting for a cache entry to appear.

use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;

use crate::adapter::ObservableCache;

/// Waits until `key` is present in `cache` or `deadline` passes.
///
/// The subscription is taken before the first lookup, so an entry written
/// before or during the call is never missed. Both the subscription and the
/// timer are dropped when this future completes or is cancelled.
pub async fn wait_for_entry<V>(
    cache: &dyn ObservableCache<V>,
    key: &str,
    deadline: Instant,
) -> Option<V>
where
    V: Clone + Send + Sync + 'static,
{
    let mut writes = cache.subscribe();

    if let Some(value) = cache.get(key).await {
        return Some(value);
    }

    let watch = async {
        loop {
            match writes.recv().await {
                Ok(written) if written == key => {
                    if let Some(value) = cache.get(key).await {
                        return Some(value);
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(key = %key, skipped, "cache write subscription lagged");
                    if let Some(value) = cache.get(key).await {
                        return Some(value);
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    };

    match tokio::time::timeout_at(deadline, watch).await {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            // Writer side is gone; nothing can wake us, so check once more at the deadline.
            tokio::time::sleep_until(deadline).await;
            cache.get(key).await
        }
        Err(_) => None,
    }
}
