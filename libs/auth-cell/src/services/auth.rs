use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::UnitOfWork;
use shared_models::auth::Role;
use shared_models::entities::ApplicationUser;
use shared_models::error::FieldErrors;
use shared_utils::jwt::issue_token;
use shared_utils::validation::FieldValidator;
use shared_utils::AppState;

use crate::models::{
    AssignRoleRequest, AuthError, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UserSummary,
};
use crate::services::password::PasswordService;

pub const ADMIN_FULL_NAME: &str = "System Admin";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn parse_role(role: &str) -> Result<Role, AuthError> {
    role.parse::<Role>().map_err(|_| AuthError::InvalidRole)
}

pub struct AuthService {
    config: Arc<AppConfig>,
    uow: UnitOfWork,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            uow: state.unit_of_work(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AuthError> {
        let email = normalize_email(&request.email);
        debug!("Registering user: {}", email);

        let mut validator = FieldValidator::new();
        validator
            .required("Email", &email)
            .email("Email", Some(&email))
            .required("FullName", &request.full_name);
        let mut errors = validator.into_errors();

        let violations = PasswordService::policy_violations(&request.password);
        if !violations.is_empty() {
            errors.insert("Password".to_string(), violations);
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        // Resolve the role before anything is staged.
        let role = match request.role.as_deref() {
            Some(role) => parse_role(role)?,
            None => Role::Receptionist,
        };

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail(email));
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let user = ApplicationUser {
            id: Uuid::new_v4(),
            email,
            full_name: request.full_name.trim().to_string(),
            password_hash,
            roles: vec![role],
            created_at: Utc::now(),
        };

        self.uow.users().add(&user)?;
        self.uow.commit().await?;

        info!("User {} registered with role {}", user.id, role);

        Ok(RegisterResponse {
            message: "User registered successfully!".to_string(),
            user: UserSummary::from(&user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = PasswordService::verify_password(&request.password, &user.password_hash)
            .unwrap_or_else(|e| {
                warn!("Stored password hash for user {} is unreadable: {}", user.id, e);
                false
            });
        if !verified {
            debug!("Password mismatch for user: {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let issued = issue_token(&user, &self.config).map_err(AuthError::Token)?;

        info!("User {} logged in", user.id);

        Ok(LoginResponse {
            message: "User logged in successfully!".to_string(),
            token: issued.token,
            expiration: issued.expires_at,
            user: UserSummary::from(&user),
        })
    }

    /// Replaces every role the user holds with the requested one.
    pub async fn assign_role(&self, request: AssignRoleRequest) -> Result<String, AuthError> {
        let user_id = Uuid::parse_str(request.user_id.trim()).map_err(|_| AuthError::UserNotFound)?;

        let mut user = self
            .uow
            .users()
            .get(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let role = parse_role(&request.role)?;

        user.roles = vec![role];
        self.uow.users().update(&user)?;
        self.uow.commit().await?;

        info!("Role {} assigned to user {}", role, user.id);

        Ok(format!("Role '{}' assigned to user '{}'", role, user.email))
    }
}

/// Creates the initial administrator when a password is configured and the account is absent.
pub async fn seed_admin(state: &AppState) -> Result<Option<ApplicationUser>, AuthError> {
    let config = &state.config;
    let Some(password) = config.admin_password.as_deref() else {
        warn!("ADMIN_PASSWORD not set, skipping admin seeding");
        return Ok(None);
    };

    let email = normalize_email(&config.admin_email);
    let uow = state.unit_of_work();

    if uow.users().find_by_email(&email).await?.is_some() {
        debug!("Admin user {} already exists", email);
        return Ok(None);
    }

    let violations = PasswordService::policy_violations(password);
    if !violations.is_empty() {
        let mut errors = FieldErrors::new();
        errors.insert("ADMIN_PASSWORD".to_string(), violations);
        return Err(AuthError::Validation(errors));
    }

    let password_hash =
        PasswordService::hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))?;

    let admin = ApplicationUser {
        id: Uuid::new_v4(),
        email,
        full_name: ADMIN_FULL_NAME.to_string(),
        password_hash,
        roles: vec![Role::Admin],
        created_at: Utc::now(),
    };

    uow.users().add(&admin)?;
    uow.commit().await?;

    info!("Seeded admin user {}", admin.email);
    Ok(Some(admin))
}
