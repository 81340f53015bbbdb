use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use hiu_gateway::{HiuPatientStatusNotification, Patient, PatientSearchReply};
use hiu_service::HiuConsentNotificationRequest;
use serde::Serialize;

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

#[derive(Serialize)]
pub struct SearchRepresentation {
    pub patient: Patient,
}

/// `GET /v1/patients/{id}`
pub async fn find_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SearchRepresentation>, ApiError> {
    let patient = state.patients.find_patient_with(&id).await?;
    Ok(Json(SearchRepresentation { patient }))
}

/// `POST /v0.5/patients/on-find`
pub async fn on_find_patient(
    State(state): State<AppState>,
    Json(reply): Json<PatientSearchReply>,
) -> StatusCode {
    state.patients.on_find_patient(reply).await;
    StatusCode::ACCEPTED
}

/// `POST /v0.5/consents/hiu/notify`
pub async fn consent_notify(
    State(state): State<AppState>,
    Json(request): Json<HiuConsentNotificationRequest>,
) -> Result<StatusCode, ApiError> {
    state.consents.handle(request).await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /v0.5/patients/status/notify`
pub async fn patient_status_notify(
    State(state): State<AppState>,
    Json(notification): Json<HiuPatientStatusNotification>,
) -> Result<StatusCode, ApiError> {
    state.patient_status.perform(notification).await?;
    Ok(StatusCode::ACCEPTED)
}
