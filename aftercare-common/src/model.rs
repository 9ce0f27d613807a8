//! Tracker data model
//!
//! Client-side tracker state (todos, symptoms, notes) and the server-side
//! tracker record projection with its validation rules. All timestamps are
//! UTC; JSON field names use camelCase to match the wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default procedure type for tracker records that omit one
pub const DEFAULT_PROCEDURE_TYPE: &str = "myomectomy";

/// Fixed seed list of daily care tasks (id, label)
pub const SEED_TODOS: [(&str, &str); 5] = [
    ("1", "Avoid lifting more than 1 gallon of milk"),
    ("2", "Take prescribed pain medications as directed"),
    ("3", "Keep incision clean and dry"),
    ("4", "Attend follow-up appointment"),
    ("5", "Stay well hydrated (8-10 glasses of water daily)"),
];

/// Symptom severity reported by the patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Lowercase wire form, also used in the flattened sync strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One daily care task
///
/// Seeded at initialization; never deleted. `completed_at` is `Some`
/// exactly while `completed` is true (cleared when toggled back).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One logged symptom, newest entries first in `TrackerData::symptoms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
    pub id: Uuid,
    pub symptom: String,
    pub severity: Severity,
    pub logged_at: DateTime<Utc>,
}

/// Aggregate root for the client-side tracker
///
/// `last_updated` bumps on every mutation to todos, symptoms, or notes and
/// serves as the dirty marker for local persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerData {
    pub todos: Vec<TodoItem>,
    pub symptoms: Vec<SymptomEntry>,
    pub notes: String,
    pub last_updated: DateTime<Utc>,
}

impl TrackerData {
    /// Fresh tracker seeded from the fixed task list
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            todos: SEED_TODOS
                .iter()
                .map(|(id, text)| TodoItem {
                    id: (*id).to_string(),
                    text: (*text).to_string(),
                    completed: false,
                    completed_at: None,
                })
                .collect(),
            symptoms: Vec::new(),
            notes: String::new(),
            last_updated: now,
        }
    }
}

/// Lightweight progress projection persisted under its own storage key
/// for fast reads without parsing the full tracker blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub progress: u8,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub last_updated: DateTime<Utc>,
}

/// Server-side tracker record: the persisted projection of one sync event
///
/// Symptoms arrive flattened to strings; local todos are never part of the
/// record (the backend has no todo concept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub patient_id: String,
    pub procedure_type: String,
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_level: Option<f64>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub follow_up_needed: bool,
    #[serde(default)]
    pub warning_signs_present: bool,
}

/// Incoming `POST /trackers` body, validated before it becomes a record
///
/// `symptoms` stays a raw JSON value until validation so a non-array
/// payload produces the structured "Symptoms must be an array" detail
/// rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTrackerRequest {
    pub patient_id: String,
    pub procedure_type: Option<String>,
    pub symptoms: Option<serde_json::Value>,
    pub notes: String,
    pub pain_level: Option<f64>,
    pub medications: Option<Vec<String>>,
    pub timestamp: Option<DateTime<Utc>>,
    pub follow_up_needed: Option<bool>,
    pub warning_signs_present: Option<bool>,
}

impl CreateTrackerRequest {
    /// Validate the request, returning every failure (not just the first)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.patient_id.trim().is_empty() {
            errors.push("Patient ID is required".to_string());
        }

        if let Some(level) = self.pain_level {
            if !(1.0..=10.0).contains(&level) {
                errors.push("Pain level must be between 1 and 10".to_string());
            }
        }

        if let Some(symptoms) = &self.symptoms {
            if !symptoms.is_array() {
                errors.push("Symptoms must be an array".to_string());
            }
        }

        errors
    }

    /// Convert a validated request into a record, stamping `now` when the
    /// client supplied no timestamp. Non-string symptom elements are
    /// rendered through their JSON form.
    pub fn into_record(self, now: DateTime<Utc>) -> TrackerRecord {
        let symptoms = match self.symptoms {
            Some(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        TrackerRecord {
            id: None,
            patient_id: self.patient_id,
            procedure_type: self
                .procedure_type
                .unwrap_or_else(|| DEFAULT_PROCEDURE_TYPE.to_string()),
            symptoms,
            notes: self.notes,
            pain_level: self.pain_level,
            medications: self.medications.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or(now),
            follow_up_needed: self.follow_up_needed.unwrap_or(false),
            warning_signs_present: self.warning_signs_present.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreateTrackerRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn valid_request_passes() {
        let req = request(serde_json::json!({
            "patientId": "patient-123",
            "symptoms": ["Cramping (mild)"],
            "notes": "feeling ok",
            "painLevel": 3
        }));
        assert!(req.validate().is_empty());
    }

    #[test]
    fn missing_patient_id_is_rejected() {
        let req = request(serde_json::json!({ "patientId": "" }));
        let errors = req.validate();
        assert!(errors.contains(&"Patient ID is required".to_string()));
    }

    #[test]
    fn whitespace_patient_id_is_rejected() {
        let req = request(serde_json::json!({ "patientId": "   " }));
        assert_eq!(req.validate(), vec!["Patient ID is required".to_string()]);
    }

    #[test]
    fn pain_level_out_of_range_is_rejected() {
        let req = request(serde_json::json!({ "patientId": "p1", "painLevel": 15 }));
        let errors = req.validate();
        assert!(errors.contains(&"Pain level must be between 1 and 10".to_string()));

        let req = request(serde_json::json!({ "patientId": "p1", "painLevel": 0 }));
        assert!(!req.validate().is_empty());
    }

    #[test]
    fn non_array_symptoms_is_rejected() {
        let req = request(serde_json::json!({ "patientId": "p1", "symptoms": "fever" }));
        let errors = req.validate();
        assert_eq!(errors, vec!["Symptoms must be an array".to_string()]);
    }

    #[test]
    fn all_failures_are_collected() {
        let req = request(serde_json::json!({
            "patientId": "",
            "painLevel": 12,
            "symptoms": 5
        }));
        assert_eq!(req.validate().len(), 3);
    }

    #[test]
    fn into_record_applies_defaults() {
        let now = Utc::now();
        let record = request(serde_json::json!({ "patientId": "p1" })).into_record(now);
        assert_eq!(record.procedure_type, DEFAULT_PROCEDURE_TYPE);
        assert_eq!(record.timestamp, now);
        assert!(record.symptoms.is_empty());
        assert!(!record.follow_up_needed);
    }

    #[test]
    fn seed_tracker_has_five_open_todos() {
        let data = TrackerData::seed(Utc::now());
        assert_eq!(data.todos.len(), 5);
        assert!(data.todos.iter().all(|t| !t.completed && t.completed_at.is_none()));
        assert!(data.symptoms.is_empty());
        assert!(data.notes.is_empty());
    }

    #[test]
    fn severity_round_trips_lowercase() {
        let json = serde_json::to_string(&Severity::Severe).unwrap();
        assert_eq!(json, "\"severe\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Severe);
    }
}
