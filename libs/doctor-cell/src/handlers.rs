use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::extractor::AppJson;
use shared_utils::AppState;

use crate::models::{DoctorRequest, DoctorResponse, ScheduleRequest, ScheduleResponse};
use crate::services::{DoctorScheduleService, DoctorService};

// ==============================================================================
// DOCTORS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorResponse>>, AppError> {
    let service = DoctorService::new(&state);
    Ok(Json(service.list_doctors().await?))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorResponse>, AppError> {
    let service = DoctorService::new(&state);
    Ok(Json(service.get_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    AppJson(request): AppJson<DoctorRequest>,
) -> Result<(StatusCode, Json<DoctorResponse>), AppError> {
    let service = DoctorService::new(&state);
    let doctor = service.create_doctor(request).await?;

    Ok((StatusCode::CREATED, Json(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
    AppJson(request): AppJson<DoctorRequest>,
) -> Result<StatusCode, AppError> {
    let service = DoctorService::new(&state);
    service.update_doctor(doctor_id, request).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = DoctorService::new(&state);
    service.delete_doctor(doctor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// SCHEDULES
// ==============================================================================

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let service = DoctorScheduleService::new(&state);
    Ok(Json(service.list_schedules().await?))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let service = DoctorScheduleService::new(&state);
    Ok(Json(service.get_schedule(schedule_id).await?))
}

#[axum::debug_handler]
pub async fn list_schedules_by_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let service = DoctorScheduleService::new(&state);
    Ok(Json(service.list_by_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), AppError> {
    let service = DoctorScheduleService::new(&state);
    let schedule = service.create_schedule(request).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
    AppJson(request): AppJson<ScheduleRequest>,
) -> Result<StatusCode, AppError> {
    let service = DoctorScheduleService::new(&state);
    service.update_schedule(schedule_id, request).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = DoctorScheduleService::new(&state);
    service.delete_schedule(schedule_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
