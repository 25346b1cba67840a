use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use shared_models::auth::CurrentUser;
use shared_models::error::AppError;
use shared_utils::extractor::AppJson;
use shared_utils::AppState;

use crate::models::{
    AppointmentDetailResponse, AppointmentError, CancelAppointmentRequest,
    CompleteAppointmentRequest, CreateAppointmentRequest, DoctorAppointmentResponse,
    RescheduleRequest,
};
use crate::services::AppointmentService;

/// Parses an optional JSON body. Empty bodies and `null` fall back to the default.
pub fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppointmentError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppointmentError::MalformedBody(e.to_string()))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentDetailResponse>), AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service.create_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    AppJson(request): AppJson<RescheduleRequest>,
) -> Result<StatusCode, AppError> {
    let service = AppointmentService::new(&state);
    service
        .reschedule_appointment(appointment_id, request.new_date())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(appointment_id): Path<Uuid>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let request: CancelAppointmentRequest = optional_body(&body)?;

    let service = AppointmentService::new(&state);
    service
        .cancel_appointment(appointment_id, request, &user.email)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let request: CompleteAppointmentRequest = optional_body(&body)?;

    let service = AppointmentService::new(&state);
    service.complete_appointment(appointment_id, request).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<DoctorAppointmentResponse>>, AppError> {
    let service = AppointmentService::new(&state);
    Ok(Json(service.list_for_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn get_all_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentDetailResponse>>, AppError> {
    let service = AppointmentService::new(&state);
    Ok(Json(service.list_all().await?))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<AppointmentDetailResponse>, AppError> {
    let service = AppointmentService::new(&state);
    Ok(Json(service.get_appointment(appointment_id).await?))
}
