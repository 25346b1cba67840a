use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

// ==============================================================================
// STORAGE TABLES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Patients,
    Doctors,
    DoctorSchedules,
    Appointments,
    #[serde(rename = "app_users")]
    Users,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Patients => "patients",
            Table::Doctors => "doctors",
            Table::DoctorSchedules => "doctor_schedules",
            Table::Appointments => "appointments",
            Table::Users => "app_users",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record persisted as one row of a [`Table`], keyed by `id`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: Table;

    fn id(&self) -> Uuid;
}

// ==============================================================================
// CLINIC RECORDS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Patient {
    const TABLE: Table = Table::Patients;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Entity for Doctor {
    const TABLE: Table = Table::Doctors;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl DoctorSchedule {
    pub fn overlaps(&self, other: &DoctorSchedule) -> bool {
        self.doctor_id == other.doctor_id
            && self.day_of_week == other.day_of_week
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

impl Entity for DoctorSchedule {
    const TABLE: Table = Table::DoctorSchedules;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Scheduled"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub description: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Appointment {
    const TABLE: Table = Table::Appointments;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl Entity for ApplicationUser {
    const TABLE: Table = Table::Users;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(day: DayOfWeek, start: (u32, u32), end: (u32, u32)) -> DoctorSchedule {
        DoctorSchedule {
            id: Uuid::new_v4(),
            doctor_id: Uuid::nil(),
            day_of_week: day,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn schedules_overlap_only_on_same_day() {
        let morning = schedule(DayOfWeek::Monday, (9, 0), (12, 0));
        let late_morning = schedule(DayOfWeek::Monday, (11, 30), (13, 0));
        let afternoon = schedule(DayOfWeek::Monday, (12, 0), (17, 0));
        let tuesday = schedule(DayOfWeek::Tuesday, (9, 0), (12, 0));

        assert!(morning.overlaps(&late_morning));
        assert!(!morning.overlaps(&afternoon));
        assert!(!morning.overlaps(&tuesday));
    }

    #[test]
    fn table_serializes_to_its_name() {
        for table in [Table::Patients, Table::DoctorSchedules, Table::Users] {
            assert_eq!(serde_json::to_value(table).unwrap(), table.name());
        }
    }

    #[test]
    fn appointment_status_uses_pascal_case() {
        let json = serde_json::to_string(&AppointmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"Cancelled\"");
    }
}
