use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fuel_ingest::config::EnvironmentConfig;
use fuel_ingest::models::fueling::{FuelingFilter, FuelingRecord, NewFuelingRecord, PageRequest};
use fuel_ingest::repositories::{FuelingStore, InMemoryFuelingRepository};
use fuel_ingest::routes::create_app_router;
use fuel_ingest::services::StaticReferencePrices;
use fuel_ingest::state::AppState;
use fuel_ingest::utils::errors::{AppError, AppResult};

const BASE: &str = "/api/v1/abastecimentos";

fn create_test_app() -> (Router, Arc<InMemoryFuelingRepository>) {
    let store = Arc::new(InMemoryFuelingRepository::new());
    let state = AppState::new(
        EnvironmentConfig::default(),
        store.clone(),
        Arc::new(StaticReferencePrices::default()),
    );
    (create_app_router(state), store)
}

fn fueling_json(fuel: &str, price: Value, cpf: &str) -> Value {
    json!({
        "id_posto": 42,
        "data_hora": "2024-01-15T10:30:00",
        "tipo_combustivel": fuel,
        "preco_por_litro": price,
        "volume_abastecido": 40.5,
        "cpf_motorista": cpf
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_json(app: &Router, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(BASE)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_create_fueling_within_reference() {
    let (app, store) = create_test_app();
    let request = fueling_json("GASOLINA", json!(6.00), "52998224725");
    let (status, body) = post_json(&app, &request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["id_posto"], 42);
    assert_eq!(body["tipo_combustivel"], "GASOLINA");
    assert_eq!(body["preco_por_litro"], "6.00");
    assert_eq!(body["volume_abastecido"], "40.50");
    assert_eq!(body["improper_data"], false);
    assert!(body["created_at"].is_string());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_create_fueling_flags_anomalous_price() {
    let (app, _) = create_test_app();
    let request = fueling_json("GASOLINA", json!(6.50), "52998224725");
    let (status, body) = post_json(&app, &request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["improper_data"], true);
}

#[tokio::test]
async fn test_create_fueling_normalizes_punctuated_cpf() {
    let (app, _) = create_test_app();
    let request = fueling_json("DIESEL", json!("4.80"), "529.982.247-25");
    let (status, body) = post_json(&app, &request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cpf_motorista"], "52998224725");
}

#[tokio::test]
async fn test_invalid_cpf_is_rejected_without_write() {
    let (app, store) = create_test_app();
    let request = fueling_json("GASOLINA", json!(5.50), "12345678900");
    let (status, body) = post_json(&app, &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_fuel_type_is_rejected() {
    let (app, store) = create_test_app();
    let (status, _) = post_json(&app, &fueling_json("QUEROSENE", json!(5.50), "52998224725")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_non_positive_price_is_rejected() {
    let (app, store) = create_test_app();
    let (status, _) = post_json(&app, &fueling_json("ETANOL", json!(0), "52998224725")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_price_that_rounds_past_column_limit_is_rejected() {
    let (app, store) = create_test_app();
    let request = fueling_json("DIESEL", json!("99999999.995"), "52998224725");
    let (status, body) = post_json(&app, &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _) = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri(BASE)
        .header("content-type", "application/json")
        .body(Body::from("{\"id_posto\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_list_first_page_of_25() {
    let (app, _) = create_test_app();
    for minute in 0..25 {
        let mut body = fueling_json("GASOLINA", json!(5.50), "52998224725");
        body["data_hora"] = json!(format!("2024-01-15T10:{:02}:00Z", minute));
        let (status, _) = post_json(&app, &body).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, &format!("{}?page=1&size=10", BASE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["items"][0]["data_hora"], "2024-01-15T10:24:00Z");

    let (_, last) = get(&app, &format!("{}?page=3&size=10", BASE)).await;
    assert_eq!(last["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_filters_by_fuel_type() {
    let (app, _) = create_test_app();
    post_json(&app, &fueling_json("GASOLINA", json!(5.50), "52998224725")).await;
    post_json(&app, &fueling_json("ETANOL", json!(3.60), "52998224725")).await;
    post_json(&app, &fueling_json("ETANOL", json!(3.70), "16899535009")).await;

    let (status, body) = get(&app, &format!("{}?tipo_combustivel=ETANOL", BASE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["size"], 10);
}

#[tokio::test]
async fn test_list_rejects_out_of_range_size() {
    let (app, _) = create_test_app();

    let (status, _) = get(&app, &format!("{}?size=101", BASE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, &format!("{}?page=0", BASE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_inverted_window() {
    let (app, _) = create_test_app();
    let uri = format!(
        "{}?data_inicio=2024-02-01T00:00:00Z&data_fim=2024-01-01T00:00:00Z",
        BASE
    );
    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_driver_history() {
    let (app, _) = create_test_app();
    post_json(&app, &fueling_json("GASOLINA", json!(5.50), "52998224725")).await;
    post_json(&app, &fueling_json("DIESEL", json!(4.90), "52998224725")).await;
    post_json(&app, &fueling_json("DIESEL", json!(4.90), "16899535009")).await;

    let (status, body) = get(&app, &format!("{}/motorista/529.982.247-25", BASE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cpf_motorista"], "52998224725");
    assert_eq!(body["total_abastecimentos"], 2);
    assert_eq!(body["abastecimentos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_driver_history_unknown_cpf_is_not_found() {
    let (app, _) = create_test_app();
    let (status, body) = get(&app, &format!("{}/motorista/98765432100", BASE)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_driver_history_invalid_cpf_is_bad_request() {
    let (app, _) = create_test_app();
    let (status, _) = get(&app, &format!("{}/motorista/11111111111", BASE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app();
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"], "healthy");
    assert_eq!(body["version"], "v1");
}

struct UnreachableStore;

#[async_trait]
impl FuelingStore for UnreachableStore {
    async fn save(&self, _record: NewFuelingRecord) -> AppResult<FuelingRecord> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_driver_tax_id(&self, _driver_tax_id: &str) -> AppResult<Vec<FuelingRecord>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_page(
        &self,
        _filter: &FuelingFilter,
        _page: PageRequest,
    ) -> AppResult<(Vec<FuelingRecord>, i64)> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::Internal("Database ping failed".to_string()))
    }
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_server_error() {
    let state = AppState::new(
        EnvironmentConfig::default(),
        Arc::new(UnreachableStore),
        Arc::new(StaticReferencePrices::default()),
    );
    let app = create_app_router(state);

    let request = fueling_json("GASOLINA", json!(5.50), "52998224725");
    let (status, body) = post_json(&app, &request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DB_ERROR");

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"], "unhealthy");
}
