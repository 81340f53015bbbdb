use std::sync::Arc;

use hiu_cache::CacheAdapter;
use hiu_core::routing_suffix;
use hiu_gateway::{
    GatewayClient, HiuPatientStatusNotification, OutboundMessage, Patient, PatientStatus,
    PatientStatusOnNotify,
};
use hiu_storage::ConsentRepository;

use crate::error::ConsentError;

/// Reacts to patient account status changes announced by the consent manager.
pub struct PatientStatusHandler {
    gateway: Arc<dyn GatewayClient>,
    repository: Arc<dyn ConsentRepository>,
    results: Arc<dyn CacheAdapter<Patient>>,
}

impl PatientStatusHandler {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        repository: Arc<dyn ConsentRepository>,
        results: Arc<dyn CacheAdapter<Patient>>,
    ) -> Self {
        Self {
            gateway,
            repository,
            results,
        }
    }

    /// A deleted patient loses every consent request and cached lookup, and the
    /// notification is acknowledged. Other statuses need no action.
    pub async fn perform(
        &self,
        notification: HiuPatientStatusNotification,
    ) -> Result<(), ConsentError> {
        let health_id = notification.notification.patient.id.as_str();

        match notification.notification.status {
            PatientStatus::Deleted => {
                let suffix = routing_suffix(health_id)
                    .map_err(|_| ConsentError::invalid_health_id(health_id))?;

                let removed = self.repository.delete_by_patient(health_id).await?;
                self.results.invalidate(health_id).await;

                let ack = PatientStatusOnNotify::ok(notification.request_id);
                self.gateway
                    .send(OutboundMessage::PatientStatusOnNotify(ack), suffix)
                    .await?;

                tracing::info!(
                    health_id,
                    removed,
                    request_id = %notification.request_id,
                    "patient deleted, consent requests removed"
                );
            }
            status => {
                tracing::info!(health_id, ?status, "no action for patient status");
            }
        }
        Ok(())
    }
}
