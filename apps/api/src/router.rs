use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::{doctor_routes, doctor_schedule_routes};
use patient_cell::router::patient_routes;
use shared_utils::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Management API is running!" }))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/patient", patient_routes(state.clone()))
        .nest("/api/doctor", doctor_routes(state.clone()))
        .nest("/api/doctorschedule", doctor_schedule_routes(state.clone()))
        .nest("/api/appointment", appointment_routes(state))
}
