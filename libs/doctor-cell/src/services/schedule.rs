use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::UnitOfWork;
use shared_models::entities::DoctorSchedule;
use shared_utils::AppState;

use crate::models::{DoctorError, ScheduleRequest, ScheduleResponse};

pub struct DoctorScheduleService {
    uow: UnitOfWork,
}

impl DoctorScheduleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            uow: state.unit_of_work(),
        }
    }

    async fn doctor_names(&self) -> Result<HashMap<Uuid, String>, DoctorError> {
        let doctors = self.uow.doctors().list().await?;
        Ok(doctors.into_iter().map(|d| (d.id, d.full_name)).collect())
    }

    async fn doctor_name(&self, doctor_id: Uuid) -> Result<Option<String>, DoctorError> {
        Ok(self.uow.doctors().get(doctor_id).await?.map(|d| d.full_name))
    }

    async fn ensure_doctor_exists(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        if self.uow.doctors().exists(doctor_id).await? {
            Ok(())
        } else {
            Err(DoctorError::UnknownDoctor(doctor_id))
        }
    }

    // Accepted either way; only reported.
    async fn warn_on_suspicious_hours(&self, schedule: &DoctorSchedule) -> Result<(), DoctorError> {
        if schedule.start_time >= schedule.end_time {
            warn!(
                "Schedule {} for doctor {} starts at {} but ends at {}",
                schedule.id, schedule.doctor_id, schedule.start_time, schedule.end_time
            );
        }

        let existing = self.uow.doctor_schedules().list_by_doctor(schedule.doctor_id).await?;
        for other in existing.iter().filter(|s| s.id != schedule.id) {
            if schedule.overlaps(other) {
                warn!(
                    "Schedule {} overlaps schedule {} for doctor {} on {:?}",
                    schedule.id, other.id, schedule.doctor_id, schedule.day_of_week
                );
            }
        }

        Ok(())
    }

    pub async fn list_schedules(&self) -> Result<Vec<ScheduleResponse>, DoctorError> {
        let schedules = self.uow.doctor_schedules().list().await?;
        let names = self.doctor_names().await?;

        Ok(schedules
            .into_iter()
            .map(|s| {
                let name = names.get(&s.doctor_id).cloned();
                ScheduleResponse::new(s, name)
            })
            .collect())
    }

    pub async fn get_schedule(&self, id: Uuid) -> Result<ScheduleResponse, DoctorError> {
        let schedule = self
            .uow
            .doctor_schedules()
            .get(id)
            .await?
            .ok_or(DoctorError::ScheduleNotFound)?;
        let name = self.doctor_name(schedule.doctor_id).await?;

        Ok(ScheduleResponse::new(schedule, name))
    }

    /// Unknown doctors yield an empty list.
    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<ScheduleResponse>, DoctorError> {
        let schedules = self.uow.doctor_schedules().list_by_doctor(doctor_id).await?;
        let name = self.doctor_name(doctor_id).await?;

        Ok(schedules
            .into_iter()
            .map(|s| ScheduleResponse::new(s, name.clone()))
            .collect())
    }

    pub async fn create_schedule(&self, request: ScheduleRequest) -> Result<ScheduleResponse, DoctorError> {
        self.ensure_doctor_exists(request.doctor_id).await?;

        let schedule = DoctorSchedule {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            end_time: request.end_time,
        };
        self.warn_on_suspicious_hours(&schedule).await?;

        self.uow.doctor_schedules().add(&schedule)?;
        self.uow.commit().await?;

        info!("Schedule {} created for doctor {}", schedule.id, schedule.doctor_id);
        let name = self.doctor_name(schedule.doctor_id).await?;
        Ok(ScheduleResponse::new(schedule, name))
    }

    pub async fn update_schedule(&self, id: Uuid, request: ScheduleRequest) -> Result<(), DoctorError> {
        if request.id.is_some_and(|body_id| body_id != id) {
            return Err(DoctorError::ScheduleIdMismatch);
        }

        let mut schedule = self
            .uow
            .doctor_schedules()
            .get(id)
            .await?
            .ok_or(DoctorError::ScheduleNotFound)?;

        self.ensure_doctor_exists(request.doctor_id).await?;

        schedule.doctor_id = request.doctor_id;
        schedule.day_of_week = request.day_of_week;
        schedule.start_time = request.start_time;
        schedule.end_time = request.end_time;
        self.warn_on_suspicious_hours(&schedule).await?;

        self.uow.doctor_schedules().update(&schedule)?;
        self.uow.commit().await?;

        debug!("Schedule updated: {}", id);
        Ok(())
    }

    pub async fn delete_schedule(&self, id: Uuid) -> Result<(), DoctorError> {
        if self.uow.doctor_schedules().get(id).await?.is_none() {
            return Err(DoctorError::ScheduleNotFound);
        }

        self.uow.doctor_schedules().remove(id);
        self.uow.commit().await?;

        info!("Schedule deleted: {}", id);
        Ok(())
    }
}
