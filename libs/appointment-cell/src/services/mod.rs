pub mod appointment;
pub mod lifecycle;

pub use appointment::AppointmentService;
pub use lifecycle::{AppointmentAction, AppointmentLifecycleService};
