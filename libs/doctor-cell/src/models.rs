use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::entities::{DayOfWeek, Doctor, DoctorSchedule};
use shared_models::error::AppError;

pub const MAX_DOCTOR_TEXT_LENGTH: usize = 150;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DoctorRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub full_name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DoctorResponse {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            full_name: doctor.full_name,
            specialization: doctor.specialization,
            email: doctor.email,
            phone: doctor.phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleRequest {
    pub id: Option<Uuid>,
    pub doctor_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_name: Option<String>,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ScheduleResponse {
    pub fn new(schedule: DoctorSchedule, doctor_name: Option<String>) -> Self {
        Self {
            id: schedule.id,
            doctor_id: schedule.doctor_id,
            doctor_name,
            day_of_week: schedule.day_of_week,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
        }
    }
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor schedule not found")]
    ScheduleNotFound,

    #[error("Doctor ID mismatch.")]
    IdMismatch,

    #[error("ID mismatch")]
    ScheduleIdMismatch,

    #[error("Doctor with id {0} does not exist.")]
    UnknownDoctor(Uuid),

    #[error("Validation failed")]
    Validation(AppError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound | DoctorError::ScheduleNotFound => AppError::NotFound(err.to_string()),
            DoctorError::IdMismatch | DoctorError::ScheduleIdMismatch | DoctorError::UnknownDoctor(_) => {
                AppError::BadRequest(err.to_string())
            }
            DoctorError::Validation(e) => e,
            DoctorError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
