use hiu_core::{CorrelationId, GatewayTimestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Back-reference to the request a gateway message answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub request_id: Uuid,
}

/// Error body carried by a gateway callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespError {
    pub code: i32,
    pub message: String,
}

/// Party on whose behalf a query is made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    #[serde(rename = "type")]
    pub requester_type: String,
    pub id: String,
}

impl Requester {
    pub fn hiu(id: impl Into<String>) -> Self {
        Self {
            requester_type: "HIU".to_string(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindPatientQuery {
    pub patient: PatientRef,
    pub requester: Requester,
}

/// Outbound patient discovery request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindPatientRequest {
    pub request_id: CorrelationId,
    pub timestamp: GatewayTimestamp,
    pub query: FindPatientQuery,
}

impl FindPatientRequest {
    pub fn new(
        request_id: CorrelationId,
        patient_id: impl Into<String>,
        requester: Requester,
    ) -> Self {
        Self {
            request_id,
            timestamp: GatewayTimestamp::now(),
            query: FindPatientQuery {
                patient: PatientRef {
                    id: patient_id.into(),
                },
                requester,
            },
        }
    }
}

/// Patient as described by the consent manager in a find reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPatient {
    pub id: String,
    pub name: String,
}

/// Patient as exposed by this service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub identifier: String,
    pub name: String,
}

/// Payload of a successful correlated reply.
///
/// `business_key` identifies the subject the payload describes, so a reply can
/// populate the result cache for any later caller asking about the same subject.
pub trait ReplyPayload: Clone + Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    fn business_key(&self) -> &str;

    fn to_value(&self) -> Self::Value;
}

impl ReplyPayload for GatewayPatient {
    type Value = Patient;

    fn business_key(&self) -> &str {
        &self.id
    }

    fn to_value(&self) -> Patient {
        Patient {
            identifier: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Inbound callback answering a correlated request.
///
/// On the wire exactly one of `result`/`error` is expected; [`GatewayReply::outcome`]
/// turns the pair of options into a [`ReplyOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReply<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<GatewayTimestamp>,
    pub resp: GatewayResponse,
    #[serde(alias = "patient", skip_serializing_if = "Option::is_none")]
    pub result: Option<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RespError>,
}

/// Reply to a patient discovery request
pub type PatientSearchReply = GatewayReply<GatewayPatient>;

/// Classified content of a [`GatewayReply`]
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome<P> {
    Payload(P),
    Error(RespError),
    Malformed,
}

impl<P> GatewayReply<P> {
    pub fn success(correlation_id: CorrelationId, payload: P) -> Self {
        Self::new(correlation_id, Some(payload), None)
    }

    pub fn failure(correlation_id: CorrelationId, error: RespError) -> Self {
        Self::new(correlation_id, None, Some(error))
    }

    pub fn new(correlation_id: CorrelationId, result: Option<P>, error: Option<RespError>) -> Self {
        Self {
            request_id: Some(Uuid::new_v4()),
            timestamp: Some(GatewayTimestamp::now()),
            resp: GatewayResponse {
                request_id: *correlation_id.as_uuid(),
            },
            result,
            error,
        }
    }

    /// Correlation id of the request this reply answers.
    pub fn correlation_id(&self) -> CorrelationId {
        CorrelationId::from_uuid(self.resp.request_id)
    }

    /// A payload takes precedence over an error if both are present.
    pub fn outcome(&self) -> ReplyOutcome<&P> {
        match (&self.result, &self.error) {
            (Some(payload), _) => ReplyOutcome::Payload(payload),
            (None, Some(error)) => ReplyOutcome::Error(error.clone()),
            (None, None) => ReplyOutcome::Malformed,
        }
    }
}

/// Patient account status reported by the consent manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    Active,
    Deactivated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientNotification {
    pub status: PatientStatus,
    pub patient: PatientRef,
}

/// Inbound patient status notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiuPatientStatusNotification {
    pub request_id: Uuid,
    pub timestamp: GatewayTimestamp,
    pub notification: PatientNotification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcknowledgementStatus {
    Ok,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientStatusAcknowledgement {
    pub status: AcknowledgementStatus,
}

/// Outbound acknowledgement of a patient status notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStatusOnNotify {
    pub request_id: Uuid,
    pub timestamp: GatewayTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgement: Option<PatientStatusAcknowledgement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RespError>,
    pub resp: GatewayResponse,
}

impl PatientStatusOnNotify {
    /// Positive acknowledgement for the notification with id `notification_request_id`.
    pub fn ok(notification_request_id: Uuid) -> Self {
        Self {
            request_id: hiu_core::generate_request_id(),
            timestamp: GatewayTimestamp::now(),
            acknowledgement: Some(PatientStatusAcknowledgement {
                status: AcknowledgementStatus::Ok,
            }),
            error: None,
            resp: GatewayResponse {
                request_id: notification_request_id,
            },
        }
    }
}
