use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::entities::{Appointment, AppointmentStatus};
use shared_models::error::AppError;

pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_CANCELLATION_REASON_LENGTH: usize = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Either a bare timestamp or `{"NewDate": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RescheduleRequest {
    Bare(DateTime<Utc>),
    Wrapped {
        #[serde(rename = "NewDate")]
        new_date: DateTime<Utc>,
    },
}

impl RescheduleRequest {
    pub fn new_date(&self) -> DateTime<Utc> {
        match self {
            RescheduleRequest::Bare(date) => *date,
            RescheduleRequest::Wrapped { new_date } => *new_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelAppointmentRequest {
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompleteAppointmentRequest {
    pub completion_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppointmentDetailResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: Option<String>,
    pub doctor_id: Uuid,
    pub doctor_name: Option<String>,
    pub appointment_date: DateTime<Utc>,
    pub description: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl AppointmentDetailResponse {
    pub fn new(appointment: Appointment, patient_name: Option<String>, doctor_name: Option<String>) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            patient_name,
            doctor_id: appointment.doctor_id,
            doctor_name,
            appointment_date: appointment.appointment_date,
            description: appointment.description,
            status: appointment.status,
            created_at: appointment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DoctorAppointmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: Option<String>,
    pub appointment_date: DateTime<Utc>,
    pub description: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl DoctorAppointmentResponse {
    pub fn new(appointment: Appointment, patient_name: Option<String>) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            patient_name,
            appointment_date: appointment.appointment_date,
            description: appointment.description,
            status: appointment.status,
            created_at: appointment.created_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient with id {0} does not exist.")]
    PatientNotFound(Uuid),

    #[error("Doctor with id {0} does not exist.")]
    DoctorNotFound(Uuid),

    #[error("{0}")]
    InvalidStatusTransition(&'static str),

    #[error("Validation failed")]
    Validation(AppError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::PatientNotFound(_)
            | AppointmentError::DoctorNotFound(_)
            | AppointmentError::MalformedBody(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::InvalidStatusTransition(msg) => {
                AppError::InvalidStateTransition(msg.to_string())
            }
            AppointmentError::Validation(e) => e,
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reschedule_accepts_both_body_shapes() {
        let bare: RescheduleRequest = serde_json::from_value(json!("2025-03-01T10:00:00Z")).unwrap();
        let wrapped: RescheduleRequest =
            serde_json::from_value(json!({ "NewDate": "2025-03-01T10:00:00Z" })).unwrap();

        assert_eq!(bare.new_date(), wrapped.new_date());
        assert_eq!(bare.new_date().to_rfc3339(), "2025-03-01T10:00:00+00:00");
    }

    #[test]
    fn reschedule_rejects_other_shapes() {
        assert!(serde_json::from_value::<RescheduleRequest>(json!({ "Date": "2025-03-01T10:00:00Z" })).is_err());
        assert!(serde_json::from_value::<RescheduleRequest>(json!(42)).is_err());
    }
}
