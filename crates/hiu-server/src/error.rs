//! HTTP mapping of service errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hiu_gateway::{GatewayError, RemoteErrorKind};
use hiu_service::ConsentError;
use serde_json::json;

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError(pub ConsentError);

impl From<ConsentError> for ApiError {
    fn from(error: ConsentError) -> Self {
        Self(error)
    }
}

impl ApiError {
    /// Status code and machine-readable code for the wrapped error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ConsentError::NotFound { .. } => (StatusCode::NOT_FOUND, "consent-request-not-found"),
            ConsentError::InvalidHealthId(_) => (StatusCode::BAD_REQUEST, "invalid-health-id"),
            ConsentError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
            ConsentError::Gateway(error) => match error {
                GatewayError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "gateway-timeout"),
                GatewayError::Remote(remote) if remote.kind == RemoteErrorKind::PatientNotFound => {
                    (StatusCode::NOT_FOUND, "patient-not-found")
                }
                GatewayError::Remote(_) => (StatusCode::BAD_GATEWAY, "gateway-error"),
                GatewayError::UnknownReply { .. } => (StatusCode::BAD_GATEWAY, "unknown-reply"),
                GatewayError::Transport(_) => (StatusCode::BAD_GATEWAY, "gateway-unreachable"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, code, "request failed");
        } else {
            tracing::debug!(error = %self.0, code, "request rejected");
        }

        let body = json!({
            "error": {
                "code": code,
                "message": self.0.to_string()
            }
        });

        (status, Json(body)).into_response()
    }
}
