use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::entities::Patient;
use shared_models::error::AppError;

pub const MAX_NAME_LENGTH: usize = 100;

/// Body for both create and update. `Id` is only checked against the path on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatientRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
            phone_number: patient.phone_number,
            date_of_birth: patient.date_of_birth,
            created_at: patient.created_at,
            is_deleted: patient.is_deleted,
        }
    }
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Route id does not match body id")]
    IdMismatch,

    #[error("Validation failed")]
    Validation(AppError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::IdMismatch => AppError::BadRequest(err.to_string()),
            PatientError::Validation(e) => e,
            PatientError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
