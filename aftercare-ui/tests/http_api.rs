//! Patient UI HTTP surface tests
//!
//! Drives the local router through tower's oneshot: page serving, state
//! snapshots, and every mutation endpoint backed by an in-memory store.
//! The backend client points at an unroutable port; endpoints that need
//! the backend degrade the way the UI expects.

use aftercare_ui::storage::MemoryStore;
use aftercare_ui::sync::BackendClient;
use aftercare_ui::{build_router, AppState, TrackerManager, UiConfig};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> Router {
    let client = BackendClient::new("http://127.0.0.1:1", Duration::from_millis(300)).unwrap();
    let manager = Arc::new(TrackerManager::new(Arc::new(MemoryStore::new()), client.clone()));
    let state = AppState::new(UiConfig::default(), manager, client);
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn index_serves_the_embedded_page() {
    let app = test_app();
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Aftercare Recovery Tracker"));
}

#[tokio::test]
async fn state_snapshot_has_seeded_tracker() {
    let app = test_app();
    let response = app.oneshot(get("/api/state")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = body_json(response).await;
    assert_eq!(state["data"]["todos"].as_array().unwrap().len(), 5);
    assert_eq!(state["progress"], 0);
    assert_eq!(state["loading"], false);
    assert_eq!(state["onboardingComplete"], false);
    assert!(state["error"].is_null());
    assert!(state["lastSyncedWithBackend"].is_null());
}

#[tokio::test]
async fn toggle_endpoint_mutates_and_returns_state() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/todos/1/toggle", json!({})))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["progress"], 20);
    let todo = &state["data"]["todos"][0];
    assert_eq!(todo["completed"], true);
    assert!(todo["completedAt"].is_string());
}

#[tokio::test]
async fn bulk_endpoint_completes_all_tasks() {
    let app = test_app();
    let response = app
        .oneshot(send_json(
            "POST",
            "/api/todos/bulk",
            json!({ "ids": ["1", "2", "3", "4", "5"], "completed": true }),
        ))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["progress"], 100);
}

#[tokio::test]
async fn symptom_lifecycle_over_http() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/symptoms",
            json!({ "symptom": "Nausea", "severity": "moderate" }),
        ))
        .await
        .unwrap();
    let state = body_json(response).await;
    let symptoms = state["data"]["symptoms"].as_array().unwrap();
    assert_eq!(symptoms.len(), 1);
    assert_eq!(symptoms[0]["severity"], "moderate");
    let id = symptoms[0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/symptoms/{id}"),
            json!({ "severity": "severe" }),
        ))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["data"]["symptoms"][0]["severity"], "severe");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/symptoms/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["data"]["symptoms"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn blank_symptom_is_rejected_quietly() {
    let app = test_app();
    let response = app
        .oneshot(send_json(
            "POST",
            "/api/symptoms",
            json!({ "symptom": "   ", "severity": "mild" }),
        ))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["data"]["symptoms"].as_array().unwrap().len(), 0);
    assert!(state["error"].is_null());
}

#[tokio::test]
async fn notes_endpoint_replaces_document() {
    let app = test_app();
    let response = app
        .oneshot(send_json("PUT", "/api/notes", json!({ "notes": "felt dizzy" })))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["data"]["notes"], "felt dizzy");
}

#[tokio::test]
async fn onboarding_then_reset_keeps_the_flag() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/onboarding/complete", json!({})))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["onboardingComplete"], true);

    let response = app
        .oneshot(send_json("POST", "/api/reset", json!({})))
        .await
        .unwrap();
    let state = body_json(response).await;
    assert_eq!(state["onboardingComplete"], true);
    assert_eq!(state["progress"], 0);
}

#[tokio::test]
async fn sync_endpoint_reports_failure_in_state() {
    let app = test_app();
    let response = app
        .oneshot(send_json("POST", "/api/sync", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = body_json(response).await;
    let error = state["error"].as_str().unwrap();
    assert!(error.starts_with("Sync failed: "), "got: {error}");
    assert_eq!(state["loading"], false);
}

#[tokio::test]
async fn brochure_proxy_degrades_to_503_when_backend_is_down() {
    let app = test_app();
    let response = app.oneshot(get("/api/brochure")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Backend unavailable");
}
