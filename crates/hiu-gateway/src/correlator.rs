//! Request/await-callback correlation.
//!
//! ```text
//! caller ─▶ Correlator ─send─▶ gateway ⇒ remote party
//!              │                              ║
//!              │ wait (correlation id,        ▼
//!              │       deadline)        CallbackHandler
//!              ▼                              │
//!        correlation cache ◀─────────put──────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use hiu_cache::{CacheAdapter, ObservableCache, wait_for_entry};
use hiu_core::CorrelationId;
use tokio::time::Instant;

use crate::client::{GatewayClient, OutboundMessage};
use crate::error::{GatewayError, RemoteError};
use crate::types::{GatewayReply, ReplyOutcome, ReplyPayload};

/// Outbound message together with the consent manager suffix it is routed by
#[derive(Debug, Clone)]
pub struct RoutedMessage {
    pub message: OutboundMessage,
    pub routing_suffix: String,
}

impl RoutedMessage {
    pub fn new(message: OutboundMessage, routing_suffix: impl Into<String>) -> Self {
        Self {
            message,
            routing_suffix: routing_suffix.into(),
        }
    }
}

/// Issues a gateway request and waits for its correlated callback.
///
/// At most one outbound call is made per business key while the result cache
/// holds a value for it. Each call that does go out uses a fresh
/// [`CorrelationId`], so retries never observe a stale reply.
pub struct Correlator<P: ReplyPayload> {
    gateway: Arc<dyn GatewayClient>,
    results: Arc<dyn CacheAdapter<P::Value>>,
    replies: Arc<dyn ObservableCache<GatewayReply<P>>>,
}

impl<P: ReplyPayload> Correlator<P> {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        results: Arc<dyn CacheAdapter<P::Value>>,
        replies: Arc<dyn ObservableCache<GatewayReply<P>>>,
    ) -> Self {
        Self {
            gateway,
            results,
            replies,
        }
    }

    /// Resolves `business_key`, from the result cache if possible, otherwise by
    /// sending `build(correlation_id)` and waiting up to `timeout` for the reply.
    ///
    /// `build` only runs on a cache miss, so routing information it derives is
    /// never required for cached subjects. The timeout covers the whole
    /// exchange, including handing the request to the gateway.
    ///
    /// # Errors
    ///
    /// - whatever `build` fails with
    /// - [`GatewayError::Timeout`] if no reply arrives in time
    /// - [`GatewayError::Remote`] if the remote party reports an error
    /// - [`GatewayError::UnknownReply`] if the reply has neither result nor error
    /// - [`GatewayError::Transport`] if the gateway refuses the request
    pub async fn request_and_await<F, E>(
        &self,
        business_key: &str,
        build: F,
        timeout: Duration,
    ) -> Result<P::Value, E>
    where
        F: FnOnce(CorrelationId) -> Result<RoutedMessage, E> + Send,
        E: From<GatewayError>,
    {
        if let Some(value) = self.results.get(business_key).await {
            tracing::debug!(business_key, "served from result cache");
            return Ok(value);
        }

        let correlation_id = CorrelationId::new();
        let deadline = Instant::now() + timeout;
        let RoutedMessage {
            message,
            routing_suffix,
        } = build(correlation_id)?;
        let routing_suffix = routing_suffix.as_str();

        tracing::info!(
            business_key,
            correlation_id = %correlation_id,
            routing_suffix,
            "sending correlated gateway request"
        );

        tokio::time::timeout_at(deadline, self.gateway.send(message, routing_suffix))
            .await
            .map_err(|_| GatewayError::timeout(correlation_id, timeout))??;

        let Some(reply) =
            wait_for_entry(self.replies.as_ref(), &correlation_id.cache_key(), deadline).await
        else {
            tracing::warn!(
                business_key,
                correlation_id = %correlation_id,
                timeout_ms = timeout.as_millis() as u64,
                "no gateway reply before deadline"
            );
            return Err(GatewayError::timeout(correlation_id, timeout).into());
        };

        match reply.outcome() {
            ReplyOutcome::Payload(payload) => {
                if reply.error.is_some() {
                    tracing::warn!(
                        correlation_id = %correlation_id,
                        "gateway reply carries both result and error, using result"
                    );
                }
                let value = payload.to_value();
                self.results.put(business_key, value.clone()).await;
                tracing::debug!(
                    business_key,
                    correlation_id = %correlation_id,
                    "gateway reply resolved"
                );
                Ok(value)
            }
            ReplyOutcome::Error(error) => {
                let error = RemoteError::from(error);
                tracing::error!(
                    business_key,
                    correlation_id = %correlation_id,
                    kind = %error.kind,
                    code = error.code,
                    "gateway reported error"
                );
                Err(GatewayError::Remote(error).into())
            }
            ReplyOutcome::Malformed => {
                tracing::error!(
                    correlation_id = %correlation_id,
                    "gateway reply has neither result nor error"
                );
                Err(GatewayError::unknown_reply(correlation_id).into())
            }
        }
    }
}
