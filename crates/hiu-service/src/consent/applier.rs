use std::sync::Arc;

use hiu_storage::ConsentRepository;
use time::OffsetDateTime;

use super::model::{ConsentNotificationKind, HiuConsentNotificationRequest};
use crate::error::ConsentError;

/// Applies inbound consent notifications to stored consent requests.
///
/// Every accepted notification overwrites the status unconditionally, so a
/// duplicate leaves the request unchanged and the latest one processed wins.
pub struct ConsentNotificationApplier {
    repository: Arc<dyn ConsentRepository>,
}

impl ConsentNotificationApplier {
    pub fn new(repository: Arc<dyn ConsentRepository>) -> Self {
        Self { repository }
    }

    /// Moves consent request `consent_request_id` to the status implied by `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::NotFound`] without writing anything when no
    /// such request exists.
    pub async fn apply(
        &self,
        consent_request_id: &str,
        kind: ConsentNotificationKind,
        timestamp: OffsetDateTime,
    ) -> Result<(), ConsentError> {
        let Some(mut request) = self.repository.find_by_id(consent_request_id).await? else {
            tracing::warn!(consent_request_id, ?kind, "notification for unknown consent request");
            return Err(ConsentError::not_found(consent_request_id));
        };

        let previous = request.status;
        request.transition(kind.target_status(), timestamp);
        self.repository.save(&request).await?;

        tracing::info!(
            consent_request_id,
            from = %previous,
            to = %request.status,
            "consent request status updated"
        );
        Ok(())
    }

    /// Entry point for the wire-level notification.
    pub async fn handle(
        &self,
        request: HiuConsentNotificationRequest,
    ) -> Result<(), ConsentError> {
        let notification = request.notification;
        match ConsentNotificationKind::from_status(notification.status) {
            Some(kind) => {
                self.apply(
                    &notification.consent_request_id,
                    kind,
                    request.timestamp.into_inner(),
                )
                .await
            }
            None => {
                tracing::warn!(
                    consent_request_id = %notification.consent_request_id,
                    status = %notification.status,
                    request_id = %request.request_id,
                    "ignoring consent notification with unhandled status"
                );
                Ok(())
            }
        }
    }
}
