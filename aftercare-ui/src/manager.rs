//! Tracker state manager
//!
//! Owns the authoritative [`TrackerState`], applies every mutation
//! through the reducer, mirrors tracker data to local storage on each
//! change, and pushes the lossy sync projection to the backend on
//! demand. Local mutations are synchronous state transitions; the only
//! suspension point is the network call inside `sync_with_backend`.

use crate::error::Error;
use crate::state::{
    calculate_progress, reduce, SymptomUpdate, TrackerAction, TrackerState, LOAD_FAILED_MESSAGE,
    SAVE_FAILED_MESSAGE, SYNC_FAILED_PREFIX, SYNC_OFFLINE_MESSAGE,
};
use crate::storage::{LocalStore, ONBOARDING_KEY, PROGRESS_KEY, TRACKER_KEY};
use crate::sync::{build_sync_payload, BackendClient};
use aftercare_common::model::{ProgressSummary, Severity, SymptomEntry, TrackerData};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub struct TrackerManager {
    state: RwLock<TrackerState>,
    store: Arc<dyn LocalStore>,
    client: BackendClient,
    /// Single-flight gate for sync; held for the whole network call
    sync_gate: Mutex<()>,
}

impl TrackerManager {
    /// Build the manager, seeding state from local storage when a saved
    /// blob exists. A missing blob seeds the fixed task list; an
    /// unreadable one seeds the task list and surfaces the load error.
    pub fn new(store: Arc<dyn LocalStore>, client: BackendClient) -> Self {
        let now = Utc::now();
        let mut state = TrackerState::initial(now);

        match store.get(TRACKER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<TrackerData>(&raw) {
                Ok(data) => reduce(&mut state, TrackerAction::SetTrackerData(data)),
                Err(err) => {
                    tracing::warn!(error = %err, "Saved tracker data is unreadable, reseeding");
                    reduce(
                        &mut state,
                        TrackerAction::SetError(Some(LOAD_FAILED_MESSAGE.to_string())),
                    );
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Could not read saved tracker data");
                reduce(
                    &mut state,
                    TrackerAction::SetError(Some(LOAD_FAILED_MESSAGE.to_string())),
                );
            }
        }

        if let Ok(Some(flag)) = store.get(ONBOARDING_KEY) {
            if flag.trim() == "true" {
                reduce(&mut state, TrackerAction::CompleteOnboarding);
            }
        }

        Self {
            state: RwLock::new(state),
            store,
            client,
            sync_gate: Mutex::new(()),
        }
    }

    /// Current state snapshot
    pub async fn snapshot(&self) -> TrackerState {
        self.state.read().await.clone()
    }

    /// Progress derived from the state at call time
    pub async fn calculate_progress(&self) -> u8 {
        calculate_progress(&self.state.read().await.data)
    }

    pub async fn toggle_todo(&self, id: &str) {
        self.dispatch(TrackerAction::ToggleTodo {
            id: id.to_string(),
            now: Utc::now(),
        })
        .await;
    }

    /// Log a symptom; blank text (after trimming) is a no-op
    pub async fn add_symptom(&self, text: &str, severity: Severity) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let entry = SymptomEntry {
            id: Uuid::new_v4(),
            symptom: trimmed.to_string(),
            severity,
            logged_at: Utc::now(),
        };
        self.dispatch(TrackerAction::AddSymptom(entry)).await;
    }

    pub async fn update_symptom(&self, id: Uuid, update: SymptomUpdate) {
        self.dispatch(TrackerAction::UpdateSymptom {
            id,
            update,
            now: Utc::now(),
        })
        .await;
    }

    pub async fn delete_symptom(&self, id: Uuid) {
        self.dispatch(TrackerAction::DeleteSymptom { id, now: Utc::now() })
            .await;
    }

    /// Set `completed` uniformly for every matching id in one state
    /// transition and one write-through save
    pub async fn bulk_update_todos(&self, ids: Vec<String>, completed: bool) {
        self.dispatch(TrackerAction::BulkUpdateTodos {
            ids,
            completed,
            now: Utc::now(),
        })
        .await;
    }

    pub async fn update_notes(&self, notes: &str) {
        self.dispatch(TrackerAction::UpdateNotes {
            notes: notes.to_string(),
            now: Utc::now(),
        })
        .await;
    }

    /// Flip the sticky onboarding flag and persist it under its own key
    pub async fn complete_onboarding(&self) {
        let mut state = self.state.write().await;
        reduce(&mut state, TrackerAction::CompleteOnboarding);
        if let Err(err) = self.store.set(ONBOARDING_KEY, "true") {
            tracing::warn!(error = %err, "Failed to persist onboarding flag");
            reduce(
                &mut state,
                TrackerAction::SetError(Some(SAVE_FAILED_MESSAGE.to_string())),
            );
        }
    }

    /// Reseed tracker data; onboarding flag and last sync time survive
    pub async fn reset_tracker(&self) {
        self.dispatch(TrackerAction::ResetTracker { now: Utc::now() })
            .await;
    }

    /// Apply a connectivity transition from the watcher (or a test)
    pub async fn handle_connectivity(&self, online: bool) {
        self.dispatch(TrackerAction::SetOnline(online)).await;
    }

    /// Push the lossy projection of local state to the backend
    ///
    /// At most one sync runs at a time; a call while one is in flight is
    /// a no-op. Offline calls fail fast into the error slot without
    /// touching the network. `loading` is cleared on every path that set
    /// it - both match arms below converge on the final dispatch.
    pub async fn sync_with_backend(&self, patient_id: &str) {
        let Ok(_guard) = self.sync_gate.try_lock() else {
            return;
        };

        let online = self.state.read().await.is_online;
        if !online {
            self.dispatch(TrackerAction::SetError(Some(
                SYNC_OFFLINE_MESSAGE.to_string(),
            )))
            .await;
            return;
        }

        self.dispatch(TrackerAction::SetLoading(true)).await;

        let payload = {
            let state = self.state.read().await;
            build_sync_payload(&state.data, patient_id, Utc::now())
        };

        match self.client.create_tracker_entry(&payload).await {
            Ok(_) => {
                self.dispatch(TrackerAction::SyncSucceeded { at: Utc::now() })
                    .await;
            }
            Err(err) => {
                let message = match err {
                    Error::Sync(message) => message,
                    other => other.to_string(),
                };
                self.dispatch(TrackerAction::SetError(Some(format!(
                    "{SYNC_FAILED_PREFIX}{message}"
                ))))
                .await;
            }
        }

        self.dispatch(TrackerAction::SetLoading(false)).await;
    }

    /// Apply an action and write tracker data through to local storage
    /// when the action changed it. A failed write keeps the in-memory
    /// state authoritative and surfaces the storage error.
    async fn dispatch(&self, action: TrackerAction) {
        let mut state = self.state.write().await;
        let before = state.data.last_updated;
        reduce(&mut state, action);
        if state.data.last_updated != before {
            if let Err(err) = self.persist(&state) {
                tracing::warn!(error = %err, "Write-through persistence failed");
                reduce(
                    &mut state,
                    TrackerAction::SetError(Some(SAVE_FAILED_MESSAGE.to_string())),
                );
            }
        }
    }

    /// Serialize the full blob and the progress summary to their keys
    fn persist(&self, state: &TrackerState) -> crate::error::Result<()> {
        let blob = serde_json::to_string(&state.data)
            .map_err(|e| Error::Storage(format!("serialize tracker data: {e}")))?;
        self.store.set(TRACKER_KEY, &blob)?;

        let summary = ProgressSummary {
            progress: state.progress,
            total_tasks: state.data.todos.len(),
            completed_tasks: state.data.todos.iter().filter(|t| t.completed).count(),
            last_updated: state.data.last_updated,
        };
        let summary = serde_json::to_string(&summary)
            .map_err(|e| Error::Storage(format!("serialize progress summary: {e}")))?;
        self.store.set(PROGRESS_KEY, &summary)?;
        Ok(())
    }
}
