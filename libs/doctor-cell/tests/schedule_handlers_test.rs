use assert_matches::assert_matches;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveTime;
use uuid::Uuid;

use doctor_cell::handlers::{
    create_schedule, delete_schedule, get_schedule, list_schedules, list_schedules_by_doctor,
    update_schedule,
};
use doctor_cell::models::ScheduleRequest;
use shared_models::entities::DayOfWeek;
use shared_models::error::AppError;
use shared_utils::test_utils::{seed_doctor, seed_schedule, TestConfig};
use shared_utils::extractor::AppJson;

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn request(doctor_id: Uuid, day_of_week: DayOfWeek, start: u32, end: u32) -> ScheduleRequest {
    ScheduleRequest {
        id: None,
        doctor_id,
        day_of_week,
        start_time: time(start),
        end_time: time(end),
    }
}

#[tokio::test]
async fn create_for_unknown_doctor_is_bad_request() {
    let state = TestConfig::default().to_state();
    let missing = Uuid::new_v4();

    let result = create_schedule(State(state.clone()), AppJson(request(missing, DayOfWeek::Monday, 9, 17))).await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg.contains(&missing.to_string()));
    let Json(all) = list_schedules(State(state)).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn create_projects_doctor_name() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state.store, "Dr. House").await;

    let (status, Json(created)) =
        create_schedule(State(state.clone()), AppJson(request(doctor.id, DayOfWeek::Monday, 9, 17)))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.doctor_name.as_deref(), Some("Dr. House"));

    let Json(fetched) = get_schedule(State(state.clone()), Path(created.id)).await.unwrap();
    assert_eq!(fetched, created);

    let Json(all) = list_schedules(State(state)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].doctor_name.as_deref(), Some("Dr. House"));
}

#[tokio::test]
async fn inverted_and_overlapping_hours_are_still_accepted() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state.store, "Dr. House").await;
    seed_schedule(&state.store, doctor.id, DayOfWeek::Tuesday, (9, 0), (13, 0)).await;

    let overlapping = create_schedule(
        State(state.clone()),
        AppJson(request(doctor.id, DayOfWeek::Tuesday, 12, 18)),
    )
    .await;
    assert!(overlapping.is_ok());

    let inverted = create_schedule(
        State(state.clone()),
        AppJson(request(doctor.id, DayOfWeek::Wednesday, 17, 9)),
    )
    .await;
    assert!(inverted.is_ok());

    let Json(by_doctor) = list_schedules_by_doctor(State(state), Path(doctor.id)).await.unwrap();
    assert_eq!(by_doctor.len(), 3);
}

#[tokio::test]
async fn list_by_doctor_filters_other_doctors() {
    let state = TestConfig::default().to_state();
    let house = seed_doctor(&state.store, "Dr. House").await;
    let wilson = seed_doctor(&state.store, "Dr. Wilson").await;
    seed_schedule(&state.store, house.id, DayOfWeek::Monday, (9, 0), (12, 0)).await;
    seed_schedule(&state.store, wilson.id, DayOfWeek::Monday, (9, 0), (12, 0)).await;

    let Json(schedules) = list_schedules_by_doctor(State(state.clone()), Path(wilson.id))
        .await
        .unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].doctor_id, wilson.id);
    assert_eq!(schedules[0].doctor_name.as_deref(), Some("Dr. Wilson"));

    let Json(none) = list_schedules_by_doctor(State(state), Path(Uuid::new_v4()))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn update_checks_ids_and_doctor() {
    let state = TestConfig::default().to_state();
    let house = seed_doctor(&state.store, "Dr. House").await;
    let wilson = seed_doctor(&state.store, "Dr. Wilson").await;
    let schedule = seed_schedule(&state.store, house.id, DayOfWeek::Monday, (9, 0), (12, 0)).await;

    let mut mismatched = request(house.id, DayOfWeek::Friday, 9, 12);
    mismatched.id = Some(Uuid::new_v4());
    let result = update_schedule(State(state.clone()), Path(schedule.id), AppJson(mismatched)).await;
    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "ID mismatch");

    let result = update_schedule(
        State(state.clone()),
        Path(schedule.id),
        AppJson(request(Uuid::new_v4(), DayOfWeek::Friday, 9, 12)),
    )
    .await;
    assert_matches!(result, Err(AppError::BadRequest(_)));

    let result = update_schedule(
        State(state.clone()),
        Path(Uuid::new_v4()),
        AppJson(request(house.id, DayOfWeek::Friday, 9, 12)),
    )
    .await;
    assert_matches!(result, Err(AppError::NotFound(_)));

    let status = update_schedule(
        State(state.clone()),
        Path(schedule.id),
        AppJson(request(wilson.id, DayOfWeek::Friday, 10, 14)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(fetched) = get_schedule(State(state), Path(schedule.id)).await.unwrap();
    assert_eq!(fetched.doctor_id, wilson.id);
    assert_eq!(fetched.day_of_week, DayOfWeek::Friday);
    assert_eq!(fetched.start_time, time(10));
}

#[tokio::test]
async fn delete_removes_schedule() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state.store, "Dr. House").await;
    let schedule = seed_schedule(&state.store, doctor.id, DayOfWeek::Monday, (9, 0), (12, 0)).await;

    let status = delete_schedule(State(state.clone()), Path(schedule.id)).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let result = get_schedule(State(state.clone()), Path(schedule.id)).await;
    assert_matches!(result, Err(AppError::NotFound(_)));

    let result = delete_schedule(State(state), Path(schedule.id)).await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}
