use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::{AppConfig, StorageBackend};
use shared_database::{Filter, Mutation, Store, StoreError, SupabaseStore};
use shared_models::entities::Table;

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        storage_backend: StorageBackend::Supabase,
        supabase_url: server.uri(),
        supabase_service_key: "service-key".to_string(),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn select_sends_equality_filters() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_schedules"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": Uuid::new_v4(), "doctor_id": doctor_id }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = SupabaseStore::new(&config_for(&mock_server));
    let rows = store
        .select(Table::DoctorSchedules, &Filter::all().eq("doctor_id", doctor_id))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["doctor_id"], json!(doctor_id));
}

#[tokio::test]
async fn apply_posts_batch_to_rpc() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/apply_changes"))
        .and(body_partial_json(json!({
            "changes": [{ "op": "delete", "table": "doctors", "id": id }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = SupabaseStore::new(&config_for(&mock_server));
    let applied = store
        .apply(vec![Mutation::Delete { table: Table::Doctors, id }])
        .await
        .unwrap();

    assert_eq!(applied, 1);
}

#[tokio::test]
async fn rpc_failure_surfaces_status_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/apply_changes"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "P0002",
            "message": "row not found in doctors"
        })))
        .mount(&mock_server)
        .await;

    let store = SupabaseStore::new(&config_for(&mock_server));
    let result = store
        .apply(vec![Mutation::Delete { table: Table::Doctors, id: Uuid::new_v4() }])
        .await;

    assert_matches!(result, Err(StoreError::Api { status: 404, message }) if message.contains("row not found"));
}
