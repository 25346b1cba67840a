use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use shared_models::entities::{
    ApplicationUser, Appointment, Doctor, DoctorSchedule, Entity, Patient,
};

use crate::store::{Filter, Mutation, SharedStore, StoreError};

/// Mutations staged by the repositories of one unit of work.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pending: Arc<Mutex<Vec<Mutation>>>,
}

impl ChangeSet {
    pub fn push(&self, mutation: Mutation) {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(mutation);
    }

    pub fn take(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typed access to one table. Reads hit the store directly; writes are staged.
pub struct Repository<E: Entity> {
    store: SharedStore,
    changes: ChangeSet,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Repository<E> {
    pub fn new(store: SharedStore, changes: ChangeSet) -> Self {
        Self {
            store,
            changes,
            _entity: PhantomData,
        }
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<E>, StoreError> {
        let rows = self.store.select(E::TABLE, filter).await?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<E>, StoreError> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    pub async fn list(&self) -> Result<Vec<E>, StoreError> {
        self.find(&Filter::all()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        self.find_one(&Filter::by_id(id)).await
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.get(id).await?.is_some())
    }

    pub fn add(&self, entity: &E) -> Result<(), StoreError> {
        self.changes.push(Mutation::Insert {
            table: E::TABLE,
            id: entity.id(),
            row: serde_json::to_value(entity)?,
        });
        Ok(())
    }

    pub fn update(&self, entity: &E) -> Result<(), StoreError> {
        self.changes.push(Mutation::Update {
            table: E::TABLE,
            id: entity.id(),
            row: serde_json::to_value(entity)?,
        });
        Ok(())
    }

    pub fn remove(&self, id: Uuid) {
        self.changes.push(Mutation::Delete { table: E::TABLE, id });
    }
}

// ==============================================================================
// ENTITY REPOSITORIES
// ==============================================================================

/// Patient reads never see soft-deleted rows, except the `*_retained` lookups used to
/// resolve names on records that still reference a deleted patient.
pub struct PatientRepository(Repository<Patient>);

impl PatientRepository {
    fn active() -> Filter {
        Filter::all().eq("is_deleted", false)
    }

    pub async fn list(&self) -> Result<Vec<Patient>, StoreError> {
        self.0.find(&Self::active()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        self.0.find_one(&Self::active().eq("id", id)).await
    }

    pub async fn list_retained(&self) -> Result<Vec<Patient>, StoreError> {
        self.0.list().await
    }

    pub async fn get_retained(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        self.0.get(id).await
    }

    pub fn add(&self, patient: &Patient) -> Result<(), StoreError> {
        self.0.add(patient)
    }

    pub fn update(&self, patient: &Patient) -> Result<(), StoreError> {
        self.0.update(patient)
    }

    /// Flags the patient as deleted. Returns `false` when there is no active patient with `id`.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let Some(mut patient) = self.get(id).await? else {
            return Ok(false);
        };

        patient.is_deleted = true;
        self.0.update(&patient)?;
        Ok(true)
    }
}

pub struct DoctorRepository(Repository<Doctor>);

impl DoctorRepository {
    pub async fn list(&self) -> Result<Vec<Doctor>, StoreError> {
        self.0.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        self.0.get(id).await
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        self.0.exists(id).await
    }

    pub fn add(&self, doctor: &Doctor) -> Result<(), StoreError> {
        self.0.add(doctor)
    }

    pub fn update(&self, doctor: &Doctor) -> Result<(), StoreError> {
        self.0.update(doctor)
    }

    pub fn delete(&self, id: Uuid) {
        self.0.remove(id)
    }
}

pub struct DoctorScheduleRepository(Repository<DoctorSchedule>);

impl DoctorScheduleRepository {
    pub async fn list(&self) -> Result<Vec<DoctorSchedule>, StoreError> {
        self.0.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<DoctorSchedule>, StoreError> {
        self.0.get(id).await
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<DoctorSchedule>, StoreError> {
        self.0.find(&Filter::all().eq("doctor_id", doctor_id)).await
    }

    pub fn add(&self, schedule: &DoctorSchedule) -> Result<(), StoreError> {
        self.0.add(schedule)
    }

    pub fn update(&self, schedule: &DoctorSchedule) -> Result<(), StoreError> {
        self.0.update(schedule)
    }

    pub fn remove(&self, id: Uuid) {
        self.0.remove(id)
    }
}

pub struct AppointmentRepository(Repository<Appointment>);

impl AppointmentRepository {
    pub async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        self.0.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        self.0.get(id).await
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        self.0.find(&Filter::all().eq("doctor_id", doctor_id)).await
    }

    pub fn add(&self, appointment: &Appointment) -> Result<(), StoreError> {
        self.0.add(appointment)
    }

    pub fn update(&self, appointment: &Appointment) -> Result<(), StoreError> {
        self.0.update(appointment)
    }

    pub fn delete(&self, id: Uuid) {
        self.0.remove(id)
    }
}

pub struct UserRepository(Repository<ApplicationUser>);

impl UserRepository {
    pub async fn list(&self) -> Result<Vec<ApplicationUser>, StoreError> {
        self.0.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<ApplicationUser>, StoreError> {
        self.0.get(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<ApplicationUser>, StoreError> {
        self.0.find_one(&Filter::all().eq("email", email)).await
    }

    pub fn add(&self, user: &ApplicationUser) -> Result<(), StoreError> {
        self.0.add(user)
    }

    pub fn update(&self, user: &ApplicationUser) -> Result<(), StoreError> {
        self.0.update(user)
    }
}

macro_rules! impl_from_repository {
    ($($wrapper:ident => $entity:ty),* $(,)?) => {
        $(
            impl From<Repository<$entity>> for $wrapper {
                fn from(inner: Repository<$entity>) -> Self {
                    Self(inner)
                }
            }
        )*
    };
}

impl_from_repository!(
    PatientRepository => Patient,
    DoctorRepository => Doctor,
    DoctorScheduleRepository => DoctorSchedule,
    AppointmentRepository => Appointment,
    UserRepository => ApplicationUser,
);
