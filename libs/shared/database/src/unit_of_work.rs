use tracing::debug;

use crate::repository::{
    AppointmentRepository, ChangeSet, DoctorRepository, DoctorScheduleRepository,
    PatientRepository, Repository, UserRepository,
};
use crate::store::{SharedStore, StoreError};

/// Per-request view over the store. Repositories stage writes into a shared change set
/// which `commit` hands to the store as one atomic batch.
pub struct UnitOfWork {
    store: SharedStore,
    changes: ChangeSet,
    patients: PatientRepository,
    doctors: DoctorRepository,
    doctor_schedules: DoctorScheduleRepository,
    appointments: AppointmentRepository,
    users: UserRepository,
}

impl UnitOfWork {
    pub fn begin(store: SharedStore) -> Self {
        let changes = ChangeSet::default();

        Self {
            patients: Repository::new(store.clone(), changes.clone()).into(),
            doctors: Repository::new(store.clone(), changes.clone()).into(),
            doctor_schedules: Repository::new(store.clone(), changes.clone()).into(),
            appointments: Repository::new(store.clone(), changes.clone()).into(),
            users: Repository::new(store.clone(), changes.clone()).into(),
            store,
            changes,
        }
    }

    pub fn patients(&self) -> &PatientRepository {
        &self.patients
    }

    pub fn doctors(&self) -> &DoctorRepository {
        &self.doctors
    }

    pub fn doctor_schedules(&self) -> &DoctorScheduleRepository {
        &self.doctor_schedules
    }

    pub fn appointments(&self) -> &AppointmentRepository {
        &self.appointments
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn pending(&self) -> usize {
        self.changes.len()
    }

    /// Persists every staged mutation. An empty change set is a no-op returning 0.
    pub async fn commit(&self) -> Result<usize, StoreError> {
        let batch = self.changes.take();
        if batch.is_empty() {
            return Ok(0);
        }

        debug!("Committing unit of work with {} mutations", batch.len());
        self.store.apply(batch).await
    }
}
