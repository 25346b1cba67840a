use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use shared_models::auth::CurrentUser;
use shared_models::error::AppError;
use shared_utils::extractor::AppJson;
use shared_utils::AppState;

use crate::models::{PatientRequest, PatientResponse};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let service = PatientService::new(&state);
    let patients = service.list_patients().await?;

    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientResponse>, AppError> {
    let service = PatientService::new(&state);
    let patient = service.get_patient(patient_id).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    AppJson(request): AppJson<PatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), AppError> {
    let service = PatientService::new(&state);
    let patient = service.create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    AppJson(request): AppJson<PatientRequest>,
) -> Result<StatusCode, AppError> {
    let service = PatientService::new(&state);
    service.update_patient(patient_id, request).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = PatientService::new(&state);
    service.delete_patient(patient_id, &user.email).await?;

    Ok(StatusCode::NO_CONTENT)
}
