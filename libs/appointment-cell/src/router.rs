use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_utils::extractor::{
    auth_middleware, role_guard, ADMIN_ONLY, DOCTOR_ONLY, FRONT_DESK, RECEPTIONIST_ONLY,
};
use shared_utils::AppState;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    let front_desk = || middleware::from_fn_with_state(FRONT_DESK, role_guard);
    let receptionist = || middleware::from_fn_with_state(RECEPTIONIST_ONLY, role_guard);
    let doctor = || middleware::from_fn_with_state(DOCTOR_ONLY, role_guard);
    let admin = || middleware::from_fn_with_state(ADMIN_ONLY, role_guard);

    Router::new()
        .route("/", post(handlers::create_appointment).route_layer(front_desk()))
        .route(
            "/{id}/reschedule",
            put(handlers::reschedule_appointment).route_layer(receptionist()),
        )
        .route(
            "/{id}/cancel",
            put(handlers::cancel_appointment).route_layer(receptionist()),
        )
        .route(
            "/{id}/complete",
            put(handlers::complete_appointment).route_layer(doctor()),
        )
        .route(
            "/doctor/{doctor_id}",
            get(handlers::get_doctor_appointments).route_layer(doctor()),
        )
        .route("/all", get(handlers::get_all_appointments).route_layer(admin()))
        // Any authenticated caller.
        .route("/{id}", get(handlers::get_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
