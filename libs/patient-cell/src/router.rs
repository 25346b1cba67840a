use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_utils::extractor::{auth_middleware, role_guard, ADMIN_ONLY, CLINIC_STAFF, FRONT_DESK};
use shared_utils::AppState;

use crate::handlers;

pub fn patient_routes(state: AppState) -> Router {
    let staff = || middleware::from_fn_with_state(CLINIC_STAFF, role_guard);
    let front_desk = || middleware::from_fn_with_state(FRONT_DESK, role_guard);
    let admin = || middleware::from_fn_with_state(ADMIN_ONLY, role_guard);

    Router::new()
        .route(
            "/",
            get(handlers::list_patients)
                .route_layer(staff())
                .merge(post(handlers::create_patient).route_layer(front_desk())),
        )
        .route(
            "/{id}",
            get(handlers::get_patient)
                .route_layer(staff())
                .merge(put(handlers::update_patient).route_layer(front_desk()))
                .merge(delete(handlers::delete_patient).route_layer(admin())),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
