use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_utils::extractor::{auth_middleware, role_guard, ADMIN_ONLY, CLINIC_STAFF};
use shared_utils::AppState;

use crate::handlers;

pub fn doctor_routes(state: AppState) -> Router {
    let staff = || middleware::from_fn_with_state(CLINIC_STAFF, role_guard);
    let admin = || middleware::from_fn_with_state(ADMIN_ONLY, role_guard);

    Router::new()
        .route(
            "/",
            get(handlers::list_doctors)
                .route_layer(staff())
                .merge(post(handlers::create_doctor).route_layer(admin())),
        )
        .route(
            "/{id}",
            get(handlers::get_doctor)
                .route_layer(staff())
                .merge(put(handlers::update_doctor).route_layer(admin()))
                .merge(delete(handlers::delete_doctor).route_layer(admin())),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn doctor_schedule_routes(state: AppState) -> Router {
    let staff = || middleware::from_fn_with_state(CLINIC_STAFF, role_guard);
    let admin = || middleware::from_fn_with_state(ADMIN_ONLY, role_guard);

    Router::new()
        .route(
            "/",
            get(handlers::list_schedules)
                .route_layer(staff())
                .merge(post(handlers::create_schedule).route_layer(admin())),
        )
        .route(
            "/bydoctor/{doctor_id}",
            get(handlers::list_schedules_by_doctor).route_layer(staff()),
        )
        .route(
            "/{id}",
            get(handlers::get_schedule)
                .route_layer(staff())
                .merge(put(handlers::update_schedule).route_layer(admin()))
                .merge(delete(handlers::delete_schedule).route_layer(admin())),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
