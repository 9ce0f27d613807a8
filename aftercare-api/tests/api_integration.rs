//! HTTP API integration tests
//!
//! Drives the full router (routes, validation, error mapping, fallback,
//! rate limiting) through tower's oneshot without binding a socket.
//! Persistence tests use an in-memory SQLite store; the cache stays
//! disabled so responses are deterministic.

use aftercare_api::cache::ResponseCache;
use aftercare_api::content::ContentStore;
use aftercare_api::db::TrackerStore;
use aftercare_api::{build_router, ApiConfig, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app(store: TrackerStore) -> Router {
    let state = AppState::new(
        ApiConfig::default(),
        ContentStore::with_builtin(),
        store,
        ResponseCache::disabled(),
    )
    .unwrap();
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_service_alive() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Aftercare Backend API");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn brochure_list_returns_summaries() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app.oneshot(get("/brochures")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], "myomectomy");
    assert_eq!(list[0]["title"], "Myomectomy Post-Operative Care Instructions");
    assert!(list[0]["lastUpdated"].is_string());
    // Not served from cache
    assert!(body.get("cached").is_none());
}

#[tokio::test]
async fn brochure_detail_has_tagged_sections() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app.oneshot(get("/brochures/myomectomy")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let sections = body["data"]["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 7);
    assert_eq!(sections[0]["body"]["type"], "list");
    let timeline = sections
        .iter()
        .find(|s| s["heading"] == "Healing Timeline")
        .unwrap();
    assert_eq!(timeline["body"]["type"], "timeline");
    assert!(timeline["body"]["entries"][0]["label"].is_string());
}

#[tokio::test]
async fn unknown_brochure_is_404() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app.oneshot(get("/brochures/appendectomy")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["message"], "Route GET /nope not found");
}

#[tokio::test]
async fn create_tracker_persists_and_returns_201() {
    let store = TrackerStore::in_memory().await.unwrap();
    let app = test_app(store.clone()).await;

    let response = app
        .oneshot(post_json(
            "/trackers",
            json!({
                "patientId": "patient-123",
                "symptoms": ["Cramping (mild)"],
                "notes": "resting at home",
                "painLevel": 4
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Patient tracker entry created successfully");
    assert!(body["data"]["id"].is_string());
    assert_eq!(body["data"]["procedureType"], "myomectomy");

    let listed = store.list("patient-123", 50, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn create_tracker_requires_patient_id() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app
        .oneshot(post_json("/trackers", json!({ "patientId": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().unwrap();
    assert!(details.contains(&json!("Patient ID is required")));
}

#[tokio::test]
async fn create_tracker_rejects_out_of_range_pain_level() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app
        .oneshot(post_json(
            "/trackers",
            json!({ "patientId": "p1", "painLevel": 15 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let details = body["details"].as_array().unwrap();
    assert!(details.contains(&json!("Pain level must be between 1 and 10")));
}

#[tokio::test]
async fn create_tracker_rejects_non_array_symptoms() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app
        .oneshot(post_json(
            "/trackers",
            json!({ "patientId": "p1", "symptoms": "fever" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let details = body["details"].as_array().unwrap();
    assert!(details.contains(&json!("Symptoms must be an array")));
}

#[tokio::test]
async fn create_tracker_collects_every_failure() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app
        .oneshot(post_json(
            "/trackers",
            json!({ "patientId": "", "painLevel": 0, "symptoms": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn create_tracker_without_database_echoes_record() {
    let app = test_app(TrackerStore::disabled()).await;
    let response = app
        .oneshot(post_json("/trackers", json!({ "patientId": "p1" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(body["data"]["id"].is_string());

    // ...but the record is not queryable afterwards
    let app = test_app(TrackerStore::disabled()).await;
    let response = app.oneshot(get("/trackers/p1")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn tracker_list_pages_reverse_chronologically() {
    let store = TrackerStore::in_memory().await.unwrap();
    let app = test_app(store.clone()).await;

    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/trackers",
                json!({ "patientId": "p1", "notes": format!("entry {i}") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        // Distinct timestamps for a deterministic ordering
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app
        .clone()
        .oneshot(get("/trackers/p1?limit=2&offset=0"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["notes"], "entry 2");
    assert_eq!(page[1]["notes"], "entry 1");
    assert_eq!(body["count"], 2);

    let response = app
        .oneshot(get("/trackers/p1?limit=2&offset=2"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["notes"], "entry 0");
}

#[tokio::test]
async fn rate_limit_rejects_after_budget() {
    let config = ApiConfig {
        rate_limit_max: 2,
        ..ApiConfig::default()
    };
    let state = AppState::new(
        config,
        ContentStore::with_builtin(),
        TrackerStore::disabled(),
        ResponseCache::disabled(),
    )
    .unwrap();
    let app = build_router(state);

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Too many requests");
    assert_eq!(body["retryAfter"], "1 minute");
}
