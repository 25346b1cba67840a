use axum::{middleware, routing::post, Router};

use shared_utils::extractor::{auth_middleware, role_guard, ADMIN_ONLY};
use shared_utils::AppState;

use crate::handlers;

pub fn auth_routes(state: AppState) -> Router {
    let public_routes = Router::new().route("/login", post(handlers::login));

    let admin_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/assign-role", post(handlers::assign_role))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, role_guard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
