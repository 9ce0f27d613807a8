//! # Aftercare Patient UI
//!
//! Patient-facing service: owns the tracker state manager (the
//! authoritative recovery-tracking state), mirrors it to a local
//! file-backed store, syncs it one-way to the backend, and serves the
//! embedded web UI plus the local JSON endpoints the page consumes.

pub mod api;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod manager;
pub mod state;
pub mod storage;
pub mod sync;

pub use config::UiConfig;
pub use error::{Error, Result};
pub use manager::TrackerManager;

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use sync::BackendClient;
use tower_http::trace::TraceLayer;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<TrackerManager>,
    pub client: BackendClient,
    pub config: Arc<UiConfig>,
}

impl AppState {
    pub fn new(config: UiConfig, manager: Arc<TrackerManager>, client: BackendClient) -> Self {
        Self {
            manager,
            client,
            config: Arc::new(config),
        }
    }
}

/// Build the patient UI router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health_check))
        .route("/api/state", get(api::get_state))
        .route("/api/brochure", get(api::get_brochure))
        .route("/api/todos/:id/toggle", post(api::toggle_todo))
        .route("/api/todos/bulk", post(api::bulk_update_todos))
        .route("/api/symptoms", post(api::add_symptom))
        .route(
            "/api/symptoms/:id",
            put(api::update_symptom).delete(api::delete_symptom),
        )
        .route("/api/notes", put(api::update_notes))
        .route("/api/sync", post(api::sync_now))
        .route("/api/onboarding/complete", post(api::complete_onboarding))
        .route("/api/reset", post(api::reset_tracker))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
