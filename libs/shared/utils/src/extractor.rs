use axum::{
    body::Body,
    extract::{FromRequest, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::typed_header::{TypedHeader, TypedHeaderRejection};
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_models::auth::{CurrentUser, Role};
use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::state::AppState;

/// `Json` whose rejections surface as `AppError::BadRequest`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const DOCTOR_ONLY: &[Role] = &[Role::Doctor];
pub const RECEPTIONIST_ONLY: &[Role] = &[Role::Receptionist];
pub const FRONT_DESK: &[Role] = &[Role::Admin, Role::Receptionist];
pub const CLINIC_STAFF: &[Role] = &[Role::Admin, Role::Doctor, Role::Receptionist];

// Validates the bearer token and stores the caller in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        if rejection.is_missing() {
            AppError::Auth("Missing authorization header".to_string())
        } else {
            AppError::Auth("Invalid authorization header format".to_string())
        }
    })?;

    let user = validate_token(bearer.token(), &state.config).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Per-route guard: the caller must hold at least one of the allowed roles.
pub async fn role_guard(
    State(allowed): State<&'static [Role]>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = extract_user(&request)?;

    if !user.has_any_role(allowed) {
        debug!("User {} with roles {:?} denied, requires {:?}", user.id, user.roles, allowed);
        let required: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        return Err(AppError::Forbidden(format!(
            "Requires one of the roles: {}",
            required.join(", ")
        )));
    }

    Ok(next.run(request).await)
}

pub fn extract_user<B>(request: &Request<B>) -> Result<&CurrentUser, AppError> {
    request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}
