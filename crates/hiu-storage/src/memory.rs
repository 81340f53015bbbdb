use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;

use crate::error::StorageError;
use crate::traits::ConsentRepository;
use crate::types::ConsentRequest;

const ENTITY: &str = "ConsentRequest";

/// In-memory consent repository using papaya lock-free HashMap.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConsentRepository {
    data: Arc<PapayaHashMap<String, ConsentRequest>>,
}

impl InMemoryConsentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ConsentRepository for InMemoryConsentRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ConsentRequest>, StorageError> {
        let guard = self.data.pin();
        Ok(guard.get(id).cloned())
    }

    async fn save(&self, request: &ConsentRequest) -> Result<(), StorageError> {
        let guard = self.data.pin();
        guard.insert(request.id.clone(), request.clone());
        tracing::debug!(
            consent_request_id = %request.id,
            status = %request.status,
            "consent request saved"
        );
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StorageError> {
        let guard = self.data.pin();
        match guard.remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(ENTITY, id)),
        }
    }

    async fn delete_by_patient(&self, patient_id: &str) -> Result<usize, StorageError> {
        let guard = self.data.pin();
        let ids: Vec<String> = guard
            .iter()
            .filter(|(_, request)| request.patient_id == patient_id)
            .map(|(id, _)| id.clone())
            .collect();

        let removed = ids
            .iter()
            .filter(|id| guard.remove(id.as_str()).is_some())
            .count();

        tracing::debug!(patient_id, removed, "consent requests deleted for patient");
        Ok(removed)
    }
}
