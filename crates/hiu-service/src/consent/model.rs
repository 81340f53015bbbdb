use hiu_core::GatewayTimestamp;
use hiu_storage::ConsentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of inbound consent notification that changes a consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentNotificationKind {
    Granted,
    Denied,
    Expired,
    Revoked,
}

impl ConsentNotificationKind {
    /// Status a consent request moves to when this notification arrives.
    pub fn target_status(self) -> ConsentStatus {
        match self {
            Self::Granted => ConsentStatus::Granted,
            Self::Denied => ConsentStatus::Denied,
            Self::Expired => ConsentStatus::Expired,
            Self::Revoked => ConsentStatus::Revoked,
        }
    }

    /// Kind carried by a wire status. `REQUESTED` is not a notification kind.
    pub fn from_status(status: ConsentStatus) -> Option<Self> {
        match status {
            ConsentStatus::Granted => Some(Self::Granted),
            ConsentStatus::Denied => Some(Self::Denied),
            ConsentStatus::Expired => Some(Self::Expired),
            ConsentStatus::Revoked => Some(Self::Revoked),
            ConsentStatus::Requested => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentNotification {
    pub consent_request_id: String,
    pub status: ConsentStatus,
}

/// Inbound consent notification sent by the gateway to the HIU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiuConsentNotificationRequest {
    pub request_id: Uuid,
    pub timestamp: GatewayTimestamp,
    pub notification: ConsentNotification,
}
