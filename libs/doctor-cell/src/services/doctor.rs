use tracing::{debug, info};
use uuid::Uuid;

use shared_database::UnitOfWork;
use shared_models::entities::Doctor;
use shared_utils::validation::{optional_text, FieldValidator};
use shared_utils::AppState;

use crate::models::{DoctorError, DoctorRequest, DoctorResponse, MAX_DOCTOR_TEXT_LENGTH};

fn validate(request: DoctorRequest, id: Uuid) -> Result<Doctor, DoctorError> {
    let full_name = request.full_name.trim().to_string();
    let specialization = optional_text(request.specialization);
    let email = optional_text(request.email);
    let phone = optional_text(request.phone);

    let mut validator = FieldValidator::new();
    validator
        .required("FullName", &full_name)
        .max_length("FullName", Some(&full_name), MAX_DOCTOR_TEXT_LENGTH)
        .max_length("Specialization", specialization.as_deref(), MAX_DOCTOR_TEXT_LENGTH)
        .email("Email", email.as_deref())
        .phone("Phone", phone.as_deref());
    validator.finish().map_err(DoctorError::Validation)?;

    Ok(Doctor {
        id,
        full_name,
        specialization,
        email,
        phone,
    })
}

pub struct DoctorService {
    uow: UnitOfWork,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            uow: state.unit_of_work(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorResponse>, DoctorError> {
        let doctors = self.uow.doctors().list().await?;
        Ok(doctors.into_iter().map(DoctorResponse::from).collect())
    }

    pub async fn get_doctor(&self, id: Uuid) -> Result<DoctorResponse, DoctorError> {
        self.uow
            .doctors()
            .get(id)
            .await?
            .map(DoctorResponse::from)
            .ok_or(DoctorError::NotFound)
    }

    pub async fn create_doctor(&self, request: DoctorRequest) -> Result<DoctorResponse, DoctorError> {
        let doctor = validate(request, Uuid::new_v4())?;

        self.uow.doctors().add(&doctor)?;
        self.uow.commit().await?;

        info!("Doctor created: {}", doctor.id);
        Ok(DoctorResponse::from(doctor))
    }

    pub async fn update_doctor(&self, id: Uuid, request: DoctorRequest) -> Result<(), DoctorError> {
        if request.id.is_some_and(|body_id| body_id != id) {
            return Err(DoctorError::IdMismatch);
        }

        let doctor = validate(request, id)?;

        if !self.uow.doctors().exists(id).await? {
            return Err(DoctorError::NotFound);
        }

        self.uow.doctors().update(&doctor)?;
        self.uow.commit().await?;

        debug!("Doctor updated: {}", id);
        Ok(())
    }

    /// Hard delete. Schedules and appointments that reference the doctor are left untouched.
    pub async fn delete_doctor(&self, id: Uuid) -> Result<(), DoctorError> {
        if !self.uow.doctors().exists(id).await? {
            return Err(DoctorError::NotFound);
        }

        self.uow.doctors().delete(id);
        self.uow.commit().await?;

        info!("Doctor deleted: {}", id);
        Ok(())
    }
}
