use hiu_gateway::GatewayError;
use hiu_storage::StorageError;
use thiserror::Error;

/// Errors of the consent and patient services.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// No consent request is stored under the id a notification refers to.
    #[error("Consent request not found: {consent_request_id}")]
    NotFound { consent_request_id: String },

    /// A health id without a `@suffix` routing part.
    #[error("Invalid health id: {0}")]
    InvalidHealthId(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ConsentError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(consent_request_id: impl Into<String>) -> Self {
        Self::NotFound {
            consent_request_id: consent_request_id.into(),
        }
    }

    /// Creates a new `InvalidHealthId` error.
    #[must_use]
    pub fn invalid_health_id(health_id: impl Into<String>) -> Self {
        Self::InvalidHealthId(health_id.into())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the underlying gateway error, if any.
    #[must_use]
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ConsentError::not_found("CR-X").to_string(),
            "Consent request not found: CR-X"
        );
        assert_eq!(
            ConsentError::invalid_health_id("alice").to_string(),
            "Invalid health id: alice"
        );
        let err = ConsentError::from(StorageError::internal("boom"));
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_gateway_accessor() {
        let err = ConsentError::from(GatewayError::transport("refused"));
        assert!(err.as_gateway().is_some());
        assert!(!err.is_not_found());
        assert!(ConsentError::not_found("CR-1").as_gateway().is_none());
    }
}
