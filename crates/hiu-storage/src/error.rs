//! Storage error types for the consent repository.

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested record was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: String,
        /// Key that was looked up.
        id: String,
    },

    /// The stored data could not be read or written.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("ConsentRequest", "CR-1");
        assert_eq!(err.to_string(), "ConsentRequest not found: CR-1");

        let err = StorageError::internal("poisoned");
        assert_eq!(err.to_string(), "Internal error: poisoned");
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(StorageError::not_found("ConsentRequest", "CR-1").is_not_found());
        assert!(!StorageError::internal("boom").is_not_found());
    }
}
