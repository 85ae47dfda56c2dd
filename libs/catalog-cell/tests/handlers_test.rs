use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_cell::router::catalog_routes;
use shared_database::{DocumentStore, InMemoryStore, SupabaseStore};
use shared_models::booking::Booking;
use shared_utils::test_utils::{TestConfig, TestFixtures};

const DAY: &str = "Oct 19, 2026";

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_list_services_returns_full_catalog() {
    let store = Arc::new(InMemoryStore::with_services(TestFixtures::dental_catalog()));
    let app = catalog_routes(Arc::new(TestConfig::default().state_with(store)));

    let (status, json) = get_json(app, "/service").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[2]["name"], "Teeth Cleaning");
    assert_eq!(json[2]["slots"], json!(["9am", "10am", "11am"]));
}

#[tokio::test]
async fn test_available_removes_booked_slots() {
    let store = Arc::new(InMemoryStore::with_services(TestFixtures::dental_catalog()));
    store
        .insert_booking_unless_exists(Booking::new("Teeth Cleaning", DAY, "a@x.com", "10am"))
        .await
        .unwrap();
    store
        .insert_booking_unless_exists(Booking::new("Teeth Cleaning", "Oct 20, 2026", "b@x.com", "9am"))
        .await
        .unwrap();
    let app = catalog_routes(Arc::new(TestConfig::default().state_with(store)));

    let (status, json) = get_json(app, "/available?date=Oct%2019,%202026").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[2]["slots"], json!(["9am", "11am"]));
    assert_eq!(json[0]["slots"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_available_requires_date() {
    let app = catalog_routes(Arc::new(TestConfig::default().memory_state()));

    let (status, json) = get_json(app, "/available").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_available_over_supabase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            TestFixtures::service_row("1", "Teeth Cleaning", &["9am", "10am", "11am"])
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("date", format!("eq.{}", DAY)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            TestFixtures::booking_row("b1", "Teeth Cleaning", DAY, "a@x.com", "11am")
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase(&mock_server.uri());
    let store = Arc::new(SupabaseStore::new(&config.to_app_config()).unwrap());
    let app = catalog_routes(Arc::new(config.state_with(store)));

    let (status, json) = get_json(app, "/available?date=Oct%2019%2C%202026").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([{ "_id": "1", "name": "Teeth Cleaning", "slots": ["9am", "10am"] }]));
}

#[tokio::test]
async fn test_store_failure_is_a_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase(&mock_server.uri());
    let store = Arc::new(SupabaseStore::new(&config.to_app_config()).unwrap());
    let app = catalog_routes(Arc::new(config.state_with(store)));

    let (status, json) = get_json(app, "/service").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Database error");
}
