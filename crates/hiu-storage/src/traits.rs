//! Repository contract for consent requests.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::ConsentRequest;

/// Key-based access to stored consent requests.
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use hiu_storage::{ConsentRepository, StorageError};
///
/// async fn status_of(repo: &dyn ConsentRepository, id: &str) -> Result<String, StorageError> {
///     repo.find_by_id(id)
///         .await?
///         .map(|request| request.status.to_string())
///         .ok_or_else(|| StorageError::not_found("ConsentRequest", id))
/// }
/// ```
#[async_trait]
pub trait ConsentRepository: Send + Sync {
    /// Reads a consent request by id.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing records.
    async fn find_by_id(&self, id: &str) -> Result<Option<ConsentRequest>, StorageError>;

    /// Inserts or replaces the consent request with the same id.
    async fn save(&self, request: &ConsentRequest) -> Result<(), StorageError>;

    /// Deletes a consent request by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such request exists.
    async fn delete_by_id(&self, id: &str) -> Result<(), StorageError>;

    /// Deletes every consent request about `patient_id`, returning how many were removed.
    async fn delete_by_patient(&self, patient_id: &str) -> Result<usize, StorageError>;
}
