//! Tracker record endpoints

use crate::api::cached_response;
use crate::cache::ResponseCache;
use crate::error::{Error, Result};
use crate::AppState;
use aftercare_common::envelope::ApiResponse;
use aftercare_common::model::CreateTrackerRequest;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Deserialize;

/// Default page size for patient tracker queries
const DEFAULT_PAGE_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /trackers
///
/// Validates the submission and persists it (or echoes it back when no
/// database is configured). 201 with the stored record; 400 with the
/// full details list on validation failure.
pub async fn create_tracker(
    State(state): State<AppState>,
    Json(request): Json<CreateTrackerRequest>,
) -> Result<impl IntoResponse> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let record = request.into_record(Utc::now());
    let stored = state.store.insert(&record).await?;
    tracing::info!(patient_id = %stored.patient_id, "Created tracker entry");

    let envelope =
        ApiResponse::new(stored).with_message("Patient tracker entry created successfully");
    Ok((StatusCode::CREATED, Json(envelope)))
}

/// GET /trackers/:patientId?limit&offset
///
/// Reverse-chronological page of one patient's records; empty without a
/// configured database.
pub async fn list_trackers(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Query(params): Query<PageParams>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let key = ResponseCache::key("GET", &path_and_query);
    if let Some((body, stored_at)) = state.cache.get(&key).await {
        return Ok(cached_response(body, stored_at));
    }

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let records = state.store.list(&patient_id, limit, offset).await?;

    let count = records.len();
    let envelope = ApiResponse::new(records).with_count(count);
    let body = serde_json::to_value(&envelope).map_err(|e| Error::Internal(e.to_string()))?;
    state.cache.put(&key, &body).await;
    Ok(Json(body).into_response())
}
