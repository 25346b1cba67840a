use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::UnitOfWork;
use shared_models::entities::Patient;
use shared_models::error::AppError;
use shared_utils::logging::DELETION;
use shared_utils::validation::{optional_text, FieldValidator};
use shared_utils::AppState;

use crate::models::{PatientError, PatientRequest, PatientResponse, MAX_NAME_LENGTH};

/// Validated, trimmed field values from a request body.
struct PatientFields {
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone_number: Option<String>,
    date_of_birth: NaiveDate,
}

fn validate(request: PatientRequest) -> Result<PatientFields, PatientError> {
    let first_name = request.first_name.trim().to_string();
    let last_name = request.last_name.trim().to_string();
    let email = optional_text(request.email);
    let phone_number = optional_text(request.phone_number);

    let mut validator = FieldValidator::new();
    validator
        .required("FirstName", &first_name)
        .max_length("FirstName", Some(&first_name), MAX_NAME_LENGTH)
        .required("LastName", &last_name)
        .max_length("LastName", Some(&last_name), MAX_NAME_LENGTH)
        .email("Email", email.as_deref())
        .phone("PhoneNumber", phone_number.as_deref());
    if request.date_of_birth.is_none() {
        validator.add("DateOfBirth", "The DateOfBirth field is required.");
    }
    validator.finish().map_err(PatientError::Validation)?;

    let date_of_birth = request.date_of_birth.ok_or_else(|| {
        PatientError::Validation(AppError::ValidationError(
            "The DateOfBirth field is required.".to_string(),
        ))
    })?;

    Ok(PatientFields {
        first_name,
        last_name,
        email,
        phone_number,
        date_of_birth,
    })
}

pub struct PatientService {
    uow: UnitOfWork,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            uow: state.unit_of_work(),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientResponse>, PatientError> {
        let patients = self.uow.patients().list().await?;
        debug!("Listing {} active patients", patients.len());
        Ok(patients.into_iter().map(PatientResponse::from).collect())
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<PatientResponse, PatientError> {
        self.uow
            .patients()
            .get(id)
            .await?
            .map(PatientResponse::from)
            .ok_or(PatientError::NotFound)
    }

    pub async fn create_patient(&self, request: PatientRequest) -> Result<PatientResponse, PatientError> {
        let fields = validate(request)?;

        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone_number: fields.phone_number,
            date_of_birth: fields.date_of_birth,
            created_at: Utc::now(),
            is_deleted: false,
        };

        self.uow.patients().add(&patient)?;
        self.uow.commit().await?;

        info!("Patient created: {}", patient.id);
        Ok(PatientResponse::from(patient))
    }

    /// Replaces the mutable fields. `created_at` and the deleted flag are kept.
    pub async fn update_patient(&self, id: Uuid, request: PatientRequest) -> Result<(), PatientError> {
        if request.id.is_some_and(|body_id| body_id != id) {
            return Err(PatientError::IdMismatch);
        }

        let fields = validate(request)?;

        let mut patient = self
            .uow
            .patients()
            .get(id)
            .await?
            .ok_or(PatientError::NotFound)?;

        patient.first_name = fields.first_name;
        patient.last_name = fields.last_name;
        patient.email = fields.email;
        patient.phone_number = fields.phone_number;
        patient.date_of_birth = fields.date_of_birth;

        self.uow.patients().update(&patient)?;
        self.uow.commit().await?;

        debug!("Patient updated: {}", id);
        Ok(())
    }

    pub async fn delete_patient(&self, id: Uuid, deleted_by: &str) -> Result<(), PatientError> {
        if !self.uow.patients().soft_delete(id).await? {
            return Err(PatientError::NotFound);
        }
        self.uow.commit().await?;

        info!(target: DELETION, patient_id = %id, deleted_by, "Patient soft-deleted");
        Ok(())
    }
}
