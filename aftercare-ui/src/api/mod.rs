//! Local JSON endpoints and embedded page for the patient UI
//!
//! Every mutation endpoint returns the full state snapshot so the page
//! re-renders from a single response.

use crate::error::Result;
use crate::state::{SymptomUpdate, TrackerState};
use crate::AppState;
use aftercare_common::brochure::Brochure;
use aftercare_common::envelope::HealthResponse;
use aftercare_common::model::Severity;
use axum::extract::{Path, State};
use axum::response::{Html, Json};
use serde::Deserialize;
use uuid::Uuid;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "Aftercare Patient UI";

/// GET / - the embedded single-page UI
pub async fn index() -> Html<&'static str> {
    Html(include_str!("patient_ui.html"))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok(SERVICE_NAME))
}

/// GET /api/state - current tracker state snapshot
pub async fn get_state(State(state): State<AppState>) -> Json<TrackerState> {
    Json(state.manager.snapshot().await)
}

/// GET /api/brochure - brochure content proxied from the backend
pub async fn get_brochure(State(state): State<AppState>) -> Result<Json<Brochure>> {
    let brochure = state.client.fetch_brochure(&state.config.procedure).await?;
    Ok(Json(brochure))
}

/// POST /api/todos/:id/toggle
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TrackerState> {
    state.manager.toggle_todo(&id).await;
    Json(state.manager.snapshot().await)
}

#[derive(Debug, Deserialize)]
pub struct BulkTodosBody {
    pub ids: Vec<String>,
    pub completed: bool,
}

/// POST /api/todos/bulk
pub async fn bulk_update_todos(
    State(state): State<AppState>,
    Json(body): Json<BulkTodosBody>,
) -> Json<TrackerState> {
    state.manager.bulk_update_todos(body.ids, body.completed).await;
    Json(state.manager.snapshot().await)
}

#[derive(Debug, Deserialize)]
pub struct AddSymptomBody {
    pub symptom: String,
    pub severity: Severity,
}

/// POST /api/symptoms
pub async fn add_symptom(
    State(state): State<AppState>,
    Json(body): Json<AddSymptomBody>,
) -> Json<TrackerState> {
    state.manager.add_symptom(&body.symptom, body.severity).await;
    Json(state.manager.snapshot().await)
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSymptomBody {
    pub symptom: Option<String>,
    pub severity: Option<Severity>,
}

/// PUT /api/symptoms/:id
pub async fn update_symptom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSymptomBody>,
) -> Json<TrackerState> {
    let update = SymptomUpdate {
        symptom: body.symptom,
        severity: body.severity,
    };
    state.manager.update_symptom(id, update).await;
    Json(state.manager.snapshot().await)
}

/// DELETE /api/symptoms/:id
pub async fn delete_symptom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<TrackerState> {
    state.manager.delete_symptom(id).await;
    Json(state.manager.snapshot().await)
}

#[derive(Debug, Deserialize)]
pub struct NotesBody {
    pub notes: String,
}

/// PUT /api/notes
pub async fn update_notes(
    State(state): State<AppState>,
    Json(body): Json<NotesBody>,
) -> Json<TrackerState> {
    state.manager.update_notes(&body.notes).await;
    Json(state.manager.snapshot().await)
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncBody {
    pub patient_id: Option<String>,
}

/// POST /api/sync - push local state to the backend
pub async fn sync_now(
    State(state): State<AppState>,
    body: Option<Json<SyncBody>>,
) -> Json<TrackerState> {
    let patient_id = body
        .and_then(|Json(b)| b.patient_id)
        .unwrap_or_else(|| state.config.patient_id.clone());
    state.manager.sync_with_backend(&patient_id).await;
    Json(state.manager.snapshot().await)
}

/// POST /api/onboarding/complete
pub async fn complete_onboarding(State(state): State<AppState>) -> Json<TrackerState> {
    state.manager.complete_onboarding().await;
    Json(state.manager.snapshot().await)
}

/// POST /api/reset
pub async fn reset_tracker(State(state): State<AppState>) -> Json<TrackerState> {
    state.manager.reset_tracker().await;
    Json(state.manager.snapshot().await)
}
