//! Inbound leg of the gateway exchange.

use std::sync::Arc;

use hiu_cache::{CacheAdapter, ObservableCache};

use crate::types::{GatewayReply, ReplyPayload};

/// Receives asynchronous replies and hands them to whoever is waiting.
///
/// Safe to call when nobody waits (the requester timed out, or the gateway
/// retransmitted a reply): it only performs idempotent cache writes.
pub struct CallbackHandler<P: ReplyPayload> {
    results: Arc<dyn CacheAdapter<P::Value>>,
    replies: Arc<dyn ObservableCache<GatewayReply<P>>>,
}

impl<P: ReplyPayload> CallbackHandler<P> {
    pub fn new(
        results: Arc<dyn CacheAdapter<P::Value>>,
        replies: Arc<dyn ObservableCache<GatewayReply<P>>>,
    ) -> Self {
        Self { results, replies }
    }

    pub async fn on_reply(&self, reply: GatewayReply<P>) {
        let correlation_id = reply.correlation_id();

        if let Some(error) = &reply.error {
            tracing::error!(
                correlation_id = %correlation_id,
                code = error.code,
                message = %error.message,
                "gateway replied with error"
            );
        }

        // Keyed by the subject, not the exchange, so later callers for the same
        // subject are served without a round trip.
        if let Some(payload) = &reply.result {
            self.results
                .put(payload.business_key(), payload.to_value())
                .await;
        }

        // Always written, so an error reply wakes the waiter instead of letting it time out.
        self.replies.put(&correlation_id.cache_key(), reply).await;
        tracing::debug!(correlation_id = %correlation_id, "gateway reply recorded");
    }
}
