use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::UnitOfWork;
use shared_models::entities::{Appointment, AppointmentStatus};
use shared_utils::logging::CANCELLATION;
use shared_utils::validation::{optional_text, FieldValidator};
use shared_utils::AppState;

use crate::models::{
    AppointmentDetailResponse, AppointmentError, CancelAppointmentRequest,
    CompleteAppointmentRequest, CreateAppointmentRequest, DoctorAppointmentResponse,
    MAX_CANCELLATION_REASON_LENGTH, MAX_DESCRIPTION_LENGTH,
};
use crate::services::lifecycle::{AppointmentAction, AppointmentLifecycleService};

pub struct AppointmentService {
    uow: UnitOfWork,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            uow: state.unit_of_work(),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    async fn patient_names(&self) -> Result<HashMap<Uuid, String>, AppointmentError> {
        let patients = self.uow.patients().list_retained().await?;
        Ok(patients.iter().map(|p| (p.id, p.full_name())).collect())
    }

    async fn doctor_names(&self) -> Result<HashMap<Uuid, String>, AppointmentError> {
        let doctors = self.uow.doctors().list().await?;
        Ok(doctors.into_iter().map(|d| (d.id, d.full_name)).collect())
    }

    async fn detail(&self, appointment: Appointment) -> Result<AppointmentDetailResponse, AppointmentError> {
        let patient_name = self
            .uow
            .patients()
            .get_retained(appointment.patient_id)
            .await?
            .map(|p| p.full_name());
        let doctor_name = self
            .uow
            .doctors()
            .get(appointment.doctor_id)
            .await?
            .map(|d| d.full_name);

        Ok(AppointmentDetailResponse::new(appointment, patient_name, doctor_name))
    }

    async fn load(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.uow
            .appointments()
            .get(id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Applies `action` to a stored appointment and commits the new status.
    async fn transition(
        &self,
        id: Uuid,
        action: AppointmentAction,
        apply: impl FnOnce(&mut Appointment) -> Result<(), AppointmentError>,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.load(id).await?;

        appointment.status = self
            .lifecycle
            .validate_status_transition(appointment.status, action)?;
        apply(&mut appointment)?;

        self.uow.appointments().update(&appointment)?;
        self.uow.commit().await?;

        Ok(appointment)
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentDetailResponse, AppointmentError> {
        let description = optional_text(request.description);

        let mut validator = FieldValidator::new();
        validator.max_length("Description", description.as_deref(), MAX_DESCRIPTION_LENGTH);
        validator.finish().map_err(AppointmentError::Validation)?;

        let patient = self
            .uow
            .patients()
            .get(request.patient_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound(request.patient_id))?;
        let doctor = self
            .uow
            .doctors()
            .get(request.doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound(request.doctor_id))?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            doctor_id: doctor.id,
            appointment_date: request.appointment_date,
            description,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        };

        self.uow.appointments().add(&appointment)?;
        self.uow.commit().await?;

        info!(
            "Appointment {} created for patient {} with doctor {}",
            appointment.id, patient.id, doctor.id
        );

        Ok(AppointmentDetailResponse::new(
            appointment,
            Some(patient.full_name()),
            Some(doctor.full_name),
        ))
    }

    pub async fn reschedule_appointment(
        &self,
        id: Uuid,
        new_date: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        self.transition(id, AppointmentAction::Reschedule, |appointment| {
            appointment.appointment_date = new_date;
            Ok(())
        })
        .await?;

        info!("Appointment {} rescheduled to {}", id, new_date);
        Ok(())
    }

    pub async fn cancel_appointment(
        &self,
        id: Uuid,
        request: CancelAppointmentRequest,
        cancelled_by: &str,
    ) -> Result<(), AppointmentError> {
        let reason = optional_text(request.cancellation_reason);

        // Existence and status are reported before the reason is validated.
        let appointment = self
            .transition(id, AppointmentAction::Cancel, |_| {
                let mut validator = FieldValidator::new();
                validator.max_length(
                    "CancellationReason",
                    reason.as_deref(),
                    MAX_CANCELLATION_REASON_LENGTH,
                );
                validator.finish().map_err(AppointmentError::Validation)
            })
            .await?;

        info!(
            target: CANCELLATION,
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            doctor_id = %appointment.doctor_id,
            cancelled_by,
            reason = reason.as_deref().unwrap_or("not provided"),
            "Appointment cancelled"
        );
        Ok(())
    }

    pub async fn complete_appointment(
        &self,
        id: Uuid,
        request: CompleteAppointmentRequest,
    ) -> Result<(), AppointmentError> {
        let notes = optional_text(request.completion_notes);

        self.transition(id, AppointmentAction::Complete, |_| Ok(())).await?;

        match notes {
            Some(notes) => info!("Appointment {} completed: {}", id, notes),
            None => info!("Appointment {} completed", id),
        }
        Ok(())
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<DoctorAppointmentResponse>, AppointmentError> {
        let appointments = self.uow.appointments().list_by_doctor(doctor_id).await?;
        let patients = self.patient_names().await?;

        debug!("Doctor {} has {} appointments", doctor_id, appointments.len());
        Ok(appointments
            .into_iter()
            .map(|a| {
                let name = patients.get(&a.patient_id).cloned();
                DoctorAppointmentResponse::new(a, name)
            })
            .collect())
    }

    pub async fn list_all(&self) -> Result<Vec<AppointmentDetailResponse>, AppointmentError> {
        let appointments = self.uow.appointments().list().await?;
        let patients = self.patient_names().await?;
        let doctors = self.doctor_names().await?;

        Ok(appointments
            .into_iter()
            .map(|a| {
                let patient_name = patients.get(&a.patient_id).cloned();
                let doctor_name = doctors.get(&a.doctor_id).cloned();
                AppointmentDetailResponse::new(a, patient_name, doctor_name)
            })
            .collect())
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<AppointmentDetailResponse, AppointmentError> {
        let appointment = self.load(id).await?;
        self.detail(appointment).await
    }
}
