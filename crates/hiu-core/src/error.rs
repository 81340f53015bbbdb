use thiserror::Error;

/// Core error types shared by the HIU crates
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid correlation id: {0}")]
    InvalidCorrelationId(String),

    #[error("Invalid gateway timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid health id '{0}': expected <user>@<consent-manager>")]
    InvalidHealthId(String),
}

impl CoreError {
    /// Create a new InvalidCorrelationId error
    pub fn invalid_correlation_id(id: impl Into<String>) -> Self {
        Self::InvalidCorrelationId(id.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp(value.into())
    }

    /// Create a new InvalidHealthId error
    pub fn invalid_health_id(id: impl Into<String>) -> Self {
        Self::InvalidHealthId(id.into())
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_health_id("alice");
        assert_eq!(
            err.to_string(),
            "Invalid health id 'alice': expected <user>@<consent-manager>"
        );

        let err = CoreError::invalid_timestamp("yesterday");
        assert_eq!(err.to_string(), "Invalid gateway timestamp: yesterday");
    }
}
