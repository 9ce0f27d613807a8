//! Tracker state and reducer
//!
//! The single authoritative in-memory snapshot of a patient's recovery
//! tracking, and the pure transition function that advances it. Every
//! user-visible mutation is one [`TrackerAction`] applied atomically by
//! [`reduce`]; timestamps ride in on the action so transitions stay
//! deterministic under test.

use aftercare_common::model::{Severity, SymptomEntry, TrackerData};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Error slot message while connectivity is down
pub const OFFLINE_MESSAGE: &str = "You are currently offline. Changes will be saved locally.";

/// Error slot message for a sync attempted while offline
pub const SYNC_OFFLINE_MESSAGE: &str = "Cannot sync while offline";

/// Error slot message when the local write-through mirror fails
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save data locally";

/// Error slot message when the stored blob cannot be read back
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load saved data";

/// Prefix for transport/backend sync failures
pub const SYNC_FAILED_PREFIX: &str = "Sync failed: ";

/// Process-local tracker state
///
/// Wraps [`TrackerData`] with the transient session fields. `loading`
/// and `error` are never persisted; `onboarding_complete` lives under
/// its own storage key and survives a tracker reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    pub data: TrackerData,
    pub loading: bool,
    pub error: Option<String>,
    pub last_synced_with_backend: Option<DateTime<Utc>>,
    pub is_online: bool,
    /// Derived: completed todos / total todos * 100
    pub progress: u8,
    pub onboarding_complete: bool,
}

impl TrackerState {
    /// Fresh state seeded from the fixed task list
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            data: TrackerData::seed(now),
            loading: false,
            error: None,
            last_synced_with_backend: None,
            is_online: true,
            progress: 0,
            onboarding_complete: false,
        }
    }
}

/// Partial update for one symptom entry; absent fields keep their value
#[derive(Debug, Clone, Default)]
pub struct SymptomUpdate {
    pub symptom: Option<String>,
    pub severity: Option<Severity>,
}

/// State transitions
#[derive(Debug, Clone)]
pub enum TrackerAction {
    /// Replace the tracker data wholesale (initial load from storage)
    SetTrackerData(TrackerData),
    ToggleTodo {
        id: String,
        now: DateTime<Utc>,
    },
    /// Entry is pre-built (id and timestamp already assigned)
    AddSymptom(SymptomEntry),
    UpdateSymptom {
        id: Uuid,
        update: SymptomUpdate,
        now: DateTime<Utc>,
    },
    DeleteSymptom {
        id: Uuid,
        now: DateTime<Utc>,
    },
    /// One atomic transition for the whole id set
    BulkUpdateTodos {
        ids: Vec<String>,
        completed: bool,
        now: DateTime<Utc>,
    },
    UpdateNotes {
        notes: String,
        now: DateTime<Utc>,
    },
    SetLoading(bool),
    SetError(Option<String>),
    SetOnline(bool),
    SyncSucceeded {
        at: DateTime<Utc>,
    },
    CompleteOnboarding,
    ResetTracker {
        now: DateTime<Utc>,
    },
}

/// Completed/total as a whole percentage; 0 for an empty todo list
pub fn calculate_progress(data: &TrackerData) -> u8 {
    let total = data.todos.len();
    if total == 0 {
        return 0;
    }
    let completed = data.todos.iter().filter(|t| t.completed).count();
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Apply one action to the state
///
/// Unknown todo/symptom ids are deliberate no-ops: the state (including
/// `last_updated`) is left untouched, not silently re-stamped.
pub fn reduce(state: &mut TrackerState, action: TrackerAction) {
    match action {
        TrackerAction::SetTrackerData(data) => {
            state.data = data;
            state.error = None;
            state.progress = calculate_progress(&state.data);
        }

        TrackerAction::ToggleTodo { id, now } => {
            let Some(todo) = state.data.todos.iter_mut().find(|t| t.id == id) else {
                return;
            };
            todo.completed = !todo.completed;
            todo.completed_at = if todo.completed { Some(now) } else { None };
            state.data.last_updated = now;
            state.progress = calculate_progress(&state.data);
        }

        TrackerAction::AddSymptom(entry) => {
            state.data.last_updated = entry.logged_at;
            state.data.symptoms.insert(0, entry);
        }

        TrackerAction::UpdateSymptom { id, update, now } => {
            let Some(entry) = state.data.symptoms.iter_mut().find(|s| s.id == id) else {
                return;
            };
            let mut changed = false;
            if let Some(symptom) = update.symptom {
                let trimmed = symptom.trim();
                if !trimmed.is_empty() {
                    entry.symptom = trimmed.to_string();
                    changed = true;
                }
            }
            if let Some(severity) = update.severity {
                entry.severity = severity;
                changed = true;
            }
            if changed {
                state.data.last_updated = now;
            }
        }

        TrackerAction::DeleteSymptom { id, now } => {
            let before = state.data.symptoms.len();
            state.data.symptoms.retain(|s| s.id != id);
            if state.data.symptoms.len() != before {
                state.data.last_updated = now;
            }
        }

        TrackerAction::BulkUpdateTodos { ids, completed, now } => {
            let mut changed = false;
            for todo in state
                .data
                .todos
                .iter_mut()
                .filter(|t| ids.iter().any(|id| *id == t.id))
            {
                todo.completed = completed;
                todo.completed_at = if completed { Some(now) } else { None };
                changed = true;
            }
            if changed {
                state.data.last_updated = now;
                state.progress = calculate_progress(&state.data);
            }
        }

        TrackerAction::UpdateNotes { notes, now } => {
            state.data.notes = notes;
            state.data.last_updated = now;
        }

        TrackerAction::SetLoading(loading) => {
            state.loading = loading;
        }

        TrackerAction::SetError(error) => {
            state.error = error;
        }

        TrackerAction::SetOnline(online) => {
            state.is_online = online;
            if !online {
                state.error = Some(OFFLINE_MESSAGE.to_string());
            } else if state.error.as_deref() == Some(OFFLINE_MESSAGE) {
                // Reconnecting clears only the connectivity notice;
                // unrelated errors stay visible until resolved.
                state.error = None;
            }
        }

        TrackerAction::SyncSucceeded { at } => {
            state.last_synced_with_backend = Some(at);
            state.error = None;
        }

        TrackerAction::CompleteOnboarding => {
            state.onboarding_complete = true;
        }

        TrackerAction::ResetTracker { now } => {
            state.data = TrackerData::seed(now);
            state.progress = 0;
        }
    }
}
