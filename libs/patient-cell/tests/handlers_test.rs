use assert_matches::assert_matches;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

use patient_cell::handlers::{create_patient, delete_patient, get_patient, list_patients, update_patient};
use patient_cell::models::PatientRequest;
use shared_database::{Filter, Store};
use shared_models::entities::Table;
use shared_models::error::AppError;
use shared_utils::test_utils::{seed_patient, TestConfig, TestUser};
use shared_utils::extractor::AppJson;

fn jane() -> PatientRequest {
    PatientRequest {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
        ..PatientRequest::default()
    }
}

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let state = TestConfig::default().to_state();

    let (status, Json(created)) = create_patient(State(state.clone()), AppJson(jane())).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let Json(fetched) = get_patient(State(state), Path(created.id)).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.first_name, "Jane");
    assert_eq!(fetched.last_name, "Doe");
    assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
    assert!(!fetched.is_deleted);
}

#[tokio::test]
async fn create_collects_field_errors() {
    let state = TestConfig::default().to_state();
    let request = PatientRequest {
        first_name: "x".repeat(101),
        last_name: String::new(),
        email: Some("not-an-email".to_string()),
        phone_number: Some("12345678901234567890123".to_string()),
        date_of_birth: None,
        id: None,
    };

    let result = create_patient(State(state), AppJson(request)).await;

    assert_matches!(result, Err(AppError::Validation(errors)) => {
        for field in ["FirstName", "LastName", "Email", "PhoneNumber", "DateOfBirth"] {
            assert!(errors.contains_key(field), "missing {}", field);
        }
    });
}

#[tokio::test]
async fn get_unknown_patient_is_not_found() {
    let state = TestConfig::default().to_state();

    let result = get_patient(State(state), Path(Uuid::new_v4())).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Patient not found");
}

#[tokio::test]
async fn update_replaces_mutable_fields() {
    let state = TestConfig::default().to_state();
    let existing = seed_patient(&state.store, "Jane", "Doe").await;

    let request = PatientRequest {
        id: Some(existing.id),
        first_name: "Janet".to_string(),
        email: Some("janet@example.com".to_string()),
        ..jane()
    };
    let status = update_patient(State(state.clone()), Path(existing.id), AppJson(request))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(fetched) = get_patient(State(state), Path(existing.id)).await.unwrap();
    assert_eq!(fetched.first_name, "Janet");
    assert_eq!(fetched.email.as_deref(), Some("janet@example.com"));
    assert_eq!(fetched.created_at, existing.created_at);
}

#[tokio::test]
async fn update_rejects_id_mismatch_and_missing_patient() {
    let state = TestConfig::default().to_state();
    let existing = seed_patient(&state.store, "Jane", "Doe").await;

    let request = PatientRequest {
        id: Some(Uuid::new_v4()),
        ..jane()
    };
    let result = update_patient(State(state.clone()), Path(existing.id), AppJson(request)).await;
    assert_matches!(result, Err(AppError::BadRequest(_)));

    let result = update_patient(State(state), Path(Uuid::new_v4()), AppJson(jane())).await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn soft_delete_hides_patient_but_keeps_row() {
    let state = TestConfig::default().to_state();
    let jane = seed_patient(&state.store, "Jane", "Doe").await;
    let john = seed_patient(&state.store, "John", "Roe").await;
    let admin = Extension(TestUser::admin().to_current_user());

    let status = delete_patient(State(state.clone()), admin.clone(), Path(jane.id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let result = get_patient(State(state.clone()), Path(jane.id)).await;
    assert_matches!(result, Err(AppError::NotFound(_)));

    let Json(listed) = list_patients(State(state.clone())).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![john.id]);

    let rows = state
        .store
        .select(Table::Patients, &Filter::by_id(jane.id))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["is_deleted"], true);

    // Already deleted.
    let result = delete_patient(State(state), admin, Path(jane.id)).await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}
