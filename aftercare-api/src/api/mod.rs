//! HTTP API handlers for aftercare-api

pub mod brochures;
pub mod health;
pub mod trackers;

use aftercare_common::envelope::ErrorBody;
use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};

/// JSON 404 for unknown routes
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let body = ErrorBody::new(
        "Not found",
        format!("Route {method} {} not found", uri.path()),
    );
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Render a cache hit: the stored envelope with cache metadata stamped on
pub(crate) fn cached_response(mut body: serde_json::Value, stored_at: DateTime<Utc>) -> Response {
    if let Some(envelope) = body.as_object_mut() {
        envelope.insert("cached".to_string(), serde_json::Value::Bool(true));
        envelope.insert(
            "cacheTimestamp".to_string(),
            serde_json::json!(stored_at),
        );
    }
    Json(body).into_response()
}
