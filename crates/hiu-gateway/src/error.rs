use std::fmt;
use std::time::Duration;

use hiu_core::CorrelationId;
use thiserror::Error;

use crate::types::RespError;

/// Kind of failure signalled by the remote party, from its numeric error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    PatientNotFound,
    InvalidRequest,
    Unauthorized,
    ConsentManagerUnavailable,
    Unknown,
}

impl RemoteErrorKind {
    /// Maps a gateway error code to its kind. Unlisted codes are `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1000 => Self::PatientNotFound,
            1001 => Self::InvalidRequest,
            1002 => Self::Unauthorized,
            1003 => Self::ConsentManagerUnavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatientNotFound => write!(f, "patient_not_found"),
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::ConsentManagerUnavailable => write!(f, "consent_manager_unavailable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error reported by the remote party, classified by kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (code {code}): {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub code: i32,
    pub message: String,
}

impl From<RespError> for RemoteError {
    fn from(error: RespError) -> Self {
        Self {
            kind: RemoteErrorKind::from_code(error.code),
            code: error.code,
            message: error.message,
        }
    }
}

/// Errors of a correlated gateway exchange.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No correlated reply arrived before the deadline.
    #[error("Gateway timed out waiting for reply to {correlation_id} after {timeout:?}")]
    Timeout {
        correlation_id: CorrelationId,
        timeout: Duration,
    },

    /// The remote party answered with an explicit error.
    #[error("Gateway returned error: {0}")]
    Remote(RemoteError),

    /// The reply carried neither a result nor an error.
    #[error("Unknown reply from gateway for {correlation_id}")]
    UnknownReply { correlation_id: CorrelationId },

    /// The outbound request could not be handed to the gateway.
    #[error("Gateway transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(correlation_id: CorrelationId, timeout: Duration) -> Self {
        Self::Timeout {
            correlation_id,
            timeout,
        }
    }

    /// Creates a new `UnknownReply` error.
    #[must_use]
    pub fn unknown_reply(correlation_id: CorrelationId) -> Self {
        Self::UnknownReply { correlation_id }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns `true` if the deadline elapsed without a reply.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the remote party reported an error of `kind`.
    #[must_use]
    pub fn is_remote(&self, kind: RemoteErrorKind) -> bool {
        matches!(self, Self::Remote(error) if error.kind == kind)
    }

    /// Returns the remote error kind, if the remote party reported one.
    #[must_use]
    pub fn remote_kind(&self) -> Option<RemoteErrorKind> {
        match self {
            Self::Remote(error) => Some(error.kind),
            _ => None,
        }
    }
}

impl From<RemoteError> for GatewayError {
    fn from(error: RemoteError) -> Self {
        Self::Remote(error)
    }
}
