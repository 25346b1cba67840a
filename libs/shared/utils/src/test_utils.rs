use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use shared_config::{AppConfig, StorageBackend};
use shared_database::{MemoryStore, SharedStore, UnitOfWork};
use shared_models::auth::{CurrentUser, JwtClaims, Role};
use shared_models::entities::{
    ApplicationUser, Appointment, AppointmentStatus, DayOfWeek, Doctor, DoctorSchedule, Patient,
};

use crate::jwt::sign_claims;
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            jwt_issuer: "clinic-management".to_string(),
            jwt_audience: "clinic-management-api".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            storage_backend: StorageBackend::Memory,
            jwt_secret: self.jwt_secret.clone(),
            jwt_issuer: self.jwt_issuer.clone(),
            jwt_audience: self.jwt_audience.clone(),
            log_dir: std::env::temp_dir().join("clinic-test-logs"),
            ..AppConfig::default()
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn to_state(&self) -> AppState {
        let store: SharedStore = Arc::new(MemoryStore::new());
        AppState::new(self.to_app_config(), store)
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            roles: vec![role],
        }
    }

    pub fn admin() -> Self {
        Self::new("admin@clinic.com", Role::Admin)
    }

    pub fn doctor() -> Self {
        Self::new("doctor@clinic.com", Role::Doctor)
    }

    pub fn receptionist() -> Self {
        Self::new("reception@clinic.com", Role::Receptionist)
    }

    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id.to_string(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn claims(user: &TestUser, config: &TestConfig, exp_hours: i64) -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: user.id.to_string(),
            name: user.email.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            roles: user.roles.clone(),
            iss: config.jwt_issuer.clone(),
            aud: config.jwt_audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(exp_hours)).timestamp(),
        }
    }

    pub fn create_test_token(user: &TestUser, config: &TestConfig, exp_hours: Option<i64>) -> String {
        let claims = Self::claims(user, config, exp_hours.unwrap_or(24));
        sign_claims(&claims, &config.jwt_secret).expect("test token signs")
    }

    pub fn create_expired_token(user: &TestUser, config: &TestConfig) -> String {
        Self::create_test_token(user, config, Some(-2))
    }

    pub fn create_invalid_signature_token(user: &TestUser, config: &TestConfig) -> String {
        let claims = Self::claims(user, config, 24);
        sign_claims(&claims, "some-other-secret").expect("test token signs")
    }

    pub fn create_malformed_token() -> String {
        "not.a.valid.jwt".to_string()
    }
}

pub fn patient(first_name: &str, last_name: &str) -> Patient {
    Patient {
        id: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: None,
        phone_number: None,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
        created_at: Utc::now(),
        is_deleted: false,
    }
}

pub fn doctor(full_name: &str) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        specialization: Some("General Practice".to_string()),
        email: None,
        phone: None,
    }
}

pub async fn seed_patient(store: &SharedStore, first_name: &str, last_name: &str) -> Patient {
    let patient = patient(first_name, last_name);
    let uow = UnitOfWork::begin(store.clone());
    uow.patients().add(&patient).expect("stage patient");
    uow.commit().await.expect("seed patient");
    patient
}

pub async fn seed_doctor(store: &SharedStore, full_name: &str) -> Doctor {
    let doctor = doctor(full_name);
    let uow = UnitOfWork::begin(store.clone());
    uow.doctors().add(&doctor).expect("stage doctor");
    uow.commit().await.expect("seed doctor");
    doctor
}

pub async fn seed_schedule(
    store: &SharedStore,
    doctor_id: Uuid,
    day_of_week: DayOfWeek,
    start: (u32, u32),
    end: (u32, u32),
) -> DoctorSchedule {
    let schedule = DoctorSchedule {
        id: Uuid::new_v4(),
        doctor_id,
        day_of_week,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).expect("valid start"),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).expect("valid end"),
    };
    let uow = UnitOfWork::begin(store.clone());
    uow.doctor_schedules().add(&schedule).expect("stage schedule");
    uow.commit().await.expect("seed schedule");
    schedule
}

pub async fn seed_appointment(
    store: &SharedStore,
    patient_id: Uuid,
    doctor_id: Uuid,
    status: AppointmentStatus,
) -> Appointment {
    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        appointment_date: Utc::now() + Duration::days(3),
        description: Some("Check-up".to_string()),
        status,
        created_at: Utc::now(),
    };
    let uow = UnitOfWork::begin(store.clone());
    uow.appointments().add(&appointment).expect("stage appointment");
    uow.commit().await.expect("seed appointment");
    appointment
}

pub async fn seed_user(
    store: &SharedStore,
    email: &str,
    password_hash: &str,
    roles: Vec<Role>,
) -> ApplicationUser {
    let user = ApplicationUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: "Test User".to_string(),
        password_hash: password_hash.to_string(),
        roles,
        created_at: Utc::now(),
    };
    let uow = UnitOfWork::begin(store.clone());
    uow.users().add(&user).expect("stage user");
    uow.commit().await.expect("seed user");
    user
}
