use assert_matches::assert_matches;
use axum::{extract::State, Extension, Json};
use uuid::Uuid;

use auth_cell::handlers::{assign_role, login, register};
use auth_cell::models::{AssignRoleRequest, LoginRequest, RegisterRequest};
use auth_cell::seed_admin;
use shared_config::AppConfig;
use shared_database::UnitOfWork;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{TestConfig, TestUser};
use shared_utils::extractor::AppJson;
use shared_utils::AppState;

fn admin() -> Extension<shared_models::auth::CurrentUser> {
    Extension(TestUser::admin().to_current_user())
}

fn register_request(email: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "Clinic#2025".to_string(),
        full_name: "Jane Receptionist".to_string(),
        role: role.map(str::to_string),
    }
}

async fn registered_user_id(state: &AppState, email: &str, role: Option<&str>) -> Uuid {
    let Json(response) = register(State(state.clone()), admin(), AppJson(register_request(email, role)))
        .await
        .unwrap();
    response.user.id
}

#[tokio::test]
async fn register_defaults_to_receptionist() {
    let state = TestConfig::default().to_state();

    let Json(response) = register(
        State(state.clone()),
        admin(),
        AppJson(register_request("  Jane@Clinic.com ", None)),
    )
    .await
    .unwrap();

    assert_eq!(response.message, "User registered successfully!");
    assert_eq!(response.user.email, "jane@clinic.com");
    assert_eq!(response.user.roles, vec![Role::Receptionist]);

    let stored = UnitOfWork::begin(state.store.clone())
        .users()
        .get(response.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "Clinic#2025");
}

#[tokio::test]
async fn register_rejects_unknown_role_without_creating_user() {
    let state = TestConfig::default().to_state();

    let result = register(
        State(state.clone()),
        admin(),
        AppJson(register_request("nurse@clinic.com", Some("Nurse"))),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "Invalid role");
    let users = UnitOfWork::begin(state.store.clone()).users().list().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let state = TestConfig::default().to_state();
    registered_user_id(&state, "jane@clinic.com", None).await;

    let result = register(
        State(state),
        admin(),
        AppJson(register_request("JANE@clinic.com", Some("Doctor"))),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("already taken"));
}

#[tokio::test]
async fn register_reports_password_policy_per_rule() {
    let state = TestConfig::default().to_state();
    let mut request = register_request("weak@clinic.com", None);
    request.password = "password".to_string();

    let result = register(State(state), admin(), AppJson(request)).await;

    assert_matches!(result, Err(AppError::Validation(errors)) => {
        let messages = &errors["Password"];
        assert_eq!(messages.len(), 3);
    });
}

#[tokio::test]
async fn login_issues_token_with_role_claims() {
    let state = TestConfig::default().to_state();
    let user_id = registered_user_id(&state, "doc@clinic.com", Some("Doctor")).await;

    let Json(response) = login(
        State(state.clone()),
        AppJson(LoginRequest {
            email: "doc@clinic.com".to_string(),
            password: "Clinic#2025".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(response.message, "User logged in successfully!");
    assert_eq!(response.user.id, user_id);

    let current = validate_token(&response.token, &state.config).unwrap();
    assert_eq!(current.id, user_id.to_string());
    assert_eq!(current.roles, vec![Role::Doctor]);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let state = TestConfig::default().to_state();
    registered_user_id(&state, "doc@clinic.com", Some("Doctor")).await;

    for (email, password) in [("doc@clinic.com", "Wrong#2025"), ("ghost@clinic.com", "Clinic#2025")] {
        let result = login(
            State(state.clone()),
            AppJson(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await;

        assert_matches!(result, Err(AppError::Auth(msg)) if msg == "Invalid login attempt.");
    }
}

#[tokio::test]
async fn assign_role_replaces_existing_roles() {
    let state = TestConfig::default().to_state();
    let user_id = registered_user_id(&state, "jane@clinic.com", Some("Receptionist")).await;

    let message = assign_role(
        State(state.clone()),
        admin(),
        AppJson(AssignRoleRequest {
            user_id: user_id.to_string(),
            role: "Doctor".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(message, "Role 'Doctor' assigned to user 'jane@clinic.com'");
    let stored = UnitOfWork::begin(state.store.clone())
        .users()
        .get(user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.roles, vec![Role::Doctor]);
}

#[tokio::test]
async fn assign_role_reports_unknown_user_and_role() {
    let state = TestConfig::default().to_state();
    let user_id = registered_user_id(&state, "jane@clinic.com", None).await;

    let result = assign_role(
        State(state.clone()),
        admin(),
        AppJson(AssignRoleRequest {
            user_id: Uuid::new_v4().to_string(),
            role: "Doctor".to_string(),
        }),
    )
    .await;
    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "User not found");

    let result = assign_role(
        State(state),
        admin(),
        AppJson(AssignRoleRequest {
            user_id: user_id.to_string(),
            role: "Janitor".to_string(),
        }),
    )
    .await;
    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "Invalid role");
}

#[tokio::test]
async fn seed_admin_creates_account_once() {
    let config = AppConfig {
        admin_password: Some("Admin#2025".to_string()),
        ..TestConfig::default().to_app_config()
    };
    let state = AppState::new(config, TestConfig::default().to_state().store);

    let seeded = seed_admin(&state).await.unwrap().unwrap();
    assert_eq!(seeded.full_name, "System Admin");
    assert_eq!(seeded.roles, vec![Role::Admin]);

    assert!(seed_admin(&state).await.unwrap().is_none());
    let users = UnitOfWork::begin(state.store.clone()).users().list().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn seed_admin_skips_without_password() {
    let state = TestConfig::default().to_state();

    assert!(seed_admin(&state).await.unwrap().is_none());
}
