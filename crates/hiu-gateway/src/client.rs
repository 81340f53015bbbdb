//! Outbound leg of the gateway exchange.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::types::{FindPatientRequest, PatientStatusOnNotify};

/// Header used by the gateway to route a message to a consent manager.
pub const ROUTING_HEADER: &str = "X-CM-ID";

/// Message the HIU sends through the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    FindPatient(FindPatientRequest),
    PatientStatusOnNotify(PatientStatusOnNotify),
}

impl OutboundMessage {
    /// Gateway endpoint for this message.
    pub fn path(&self) -> &'static str {
        match self {
            Self::FindPatient(_) => "/v0.5/patients/find",
            Self::PatientStatusOnNotify(_) => "/v0.5/patients/status/on-notify",
        }
    }

    pub fn request_id(&self) -> Uuid {
        match self {
            Self::FindPatient(request) => *request.request_id.as_uuid(),
            Self::PatientStatusOnNotify(ack) => ack.request_id,
        }
    }
}

/// Gateway client.
///
/// `send` returns once the gateway has accepted the message for delivery; any
/// business answer arrives later through a separate inbound callback.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn send(&self, message: OutboundMessage, routing_suffix: &str)
    -> Result<(), GatewayError>;
}

/// Gateway client over HTTP.
pub struct HttpGatewayClient {
    http_client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn send(
        &self,
        message: OutboundMessage,
        routing_suffix: &str,
    ) -> Result<(), GatewayError> {
        let url = format!("{}{}", self.base_url, message.path());

        let mut request = self
            .http_client
            .post(&url)
            .header(ROUTING_HEADER, routing_suffix)
            .json(&message);

        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::transport(format!("POST {url}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                url = %url,
                request_id = %message.request_id(),
                routing_suffix,
                status = status.as_u16(),
                "gateway accepted request"
            );
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                body = %body,
                "gateway rejected request"
            );
            Err(GatewayError::transport(format!(
                "POST {url} returned {status}: {body}"
            )))
        }
    }
}
