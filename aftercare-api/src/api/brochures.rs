//! Brochure endpoints
//!
//! Read-only content served from the in-process store, optionally
//! through the response cache.

use crate::api::cached_response;
use crate::cache::ResponseCache;
use crate::error::{Error, Result};
use crate::AppState;
use aftercare_common::envelope::ApiResponse;
use axum::extract::{OriginalUri, Path, State};
use axum::response::{IntoResponse, Json, Response};

/// GET /brochures
///
/// List of `{id, title, lastUpdated}` for every known procedure.
pub async fn list_brochures(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response> {
    let key = ResponseCache::key("GET", uri.path());
    if let Some((body, stored_at)) = state.cache.get(&key).await {
        return Ok(cached_response(body, stored_at));
    }

    let summaries = state.content.summaries();
    let envelope = ApiResponse::new(summaries);
    let body =
        serde_json::to_value(&envelope).map_err(|e| Error::Internal(e.to_string()))?;
    state.cache.put(&key, &body).await;
    Ok(Json(body).into_response())
}

/// GET /brochures/:id
///
/// Full brochure content, or 404 for an unknown procedure id.
pub async fn get_brochure(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response> {
    let key = ResponseCache::key("GET", uri.path());
    if let Some((body, stored_at)) = state.cache.get(&key).await {
        return Ok(cached_response(body, stored_at));
    }

    let brochure = state
        .content
        .get(&id)
        .ok_or_else(|| Error::NotFound(format!("Brochure content for '{id}' is not available")))?;

    let envelope = ApiResponse::new(brochure.clone());
    let body =
        serde_json::to_value(&envelope).map_err(|e| Error::Internal(e.to_string()))?;
    state.cache.put(&key, &body).await;
    Ok(Json(body).into_response())
}
