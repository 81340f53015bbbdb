//! Consent request aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Lifecycle status of a consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Requested,
    Granted,
    Denied,
    Expired,
    Revoked,
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requested => "REQUESTED",
            Self::Granted => "GRANTED",
            Self::Denied => "DENIED",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
        };
        f.write_str(s)
    }
}

/// A consent request raised by the HIU on behalf of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRequest {
    pub id: String,
    /// Health id of the patient the consent is about (`name@suffix`).
    pub patient_id: String,
    pub status: ConsentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl ConsentRequest {
    /// Creates a new request in `REQUESTED` state.
    #[must_use]
    pub fn new(id: impl Into<String>, patient_id: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            status: ConsentStatus::Requested,
            created_at: now,
            last_updated: now,
        }
    }

    /// Moves the request to `status` as of `at`.
    ///
    /// No transition is rejected: the latest notification decides the status.
    pub fn transition(&mut self, status: ConsentStatus, at: OffsetDateTime) {
        self.status = status;
        self.last_updated = at;
    }
}
