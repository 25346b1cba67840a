use axum::{extract::State, Extension, Json};
use tracing::debug;

use shared_models::auth::CurrentUser;
use shared_models::error::AppError;
use shared_utils::extractor::AppJson;
use shared_utils::AppState;

use crate::models::{AssignRoleRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    debug!("Admin {} registering a new user", user.id);

    let service = AuthService::new(&state);
    let response = service.register(request).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = AuthService::new(&state);
    let response = service.login(request).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn assign_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(request): AppJson<AssignRoleRequest>,
) -> Result<String, AppError> {
    debug!("Admin {} assigning role {} to {}", user.id, request.role, request.user_id);

    let service = AuthService::new(&state);
    let message = service.assign_role(request).await?;

    Ok(message)
}
