//! Backend synchronization
//!
//! One-way push of a lossy projection of local tracker state. The
//! payload flattens symptoms to display strings and derives the two
//! triage flags; local todos are never sent (the backend has no todo
//! concept, and that mismatch is intentional).

use crate::error::{Error, Result};
use aftercare_common::envelope::{ApiResponse, ErrorBody};
use aftercare_common::model::{Severity, TrackerData, TrackerRecord, DEFAULT_PROCEDURE_TYPE};
use aftercare_common::brochure::Brochure;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Symptom keywords that raise the warning flag
///
/// A crude keyword heuristic kept bit-for-bit for compatibility with
/// stored records; it is not a clinical classifier.
pub const WARNING_KEYWORDS: [&str; 3] = ["fever", "bleeding", "pain"];

/// Build the sync payload from local tracker data
///
/// Severity is folded into the symptom string and loses its enum
/// identity on the wire; `follow_up_needed` is any severe symptom;
/// `warning_signs_present` is the keyword heuristic over symptom text.
pub fn build_sync_payload(
    data: &TrackerData,
    patient_id: &str,
    now: DateTime<Utc>,
) -> TrackerRecord {
    let follow_up_needed = data
        .symptoms
        .iter()
        .any(|s| s.severity == Severity::Severe);
    let warning_signs_present = data.symptoms.iter().any(|s| {
        let text = s.symptom.to_lowercase();
        WARNING_KEYWORDS.iter().any(|kw| text.contains(kw))
    });

    TrackerRecord {
        id: None,
        patient_id: patient_id.to_string(),
        procedure_type: DEFAULT_PROCEDURE_TYPE.to_string(),
        symptoms: data
            .symptoms
            .iter()
            .map(|s| format!("{} ({})", s.symptom, s.severity))
            .collect(),
        notes: data.notes.clone(),
        pain_level: None,
        medications: Vec::new(),
        timestamp: now,
        follow_up_needed,
        warning_signs_present,
    }
}

/// HTTP client for the backend API
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client with an explicit request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /trackers - create one tracker entry
    pub async fn create_tracker_entry(&self, record: &TrackerRecord) -> Result<TrackerRecord> {
        let url = format!("{}/trackers", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| Error::Sync(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("HTTP error! status: {status}"));
            return Err(Error::Sync(message));
        }

        let envelope = response
            .json::<ApiResponse<TrackerRecord>>()
            .await
            .map_err(|e| Error::Sync(format!("invalid response body: {e}")))?;
        Ok(envelope.data)
    }

    /// GET /brochures/:id - full brochure content
    pub async fn fetch_brochure(&self, id: &str) -> Result<Brochure> {
        let url = format!("{}/brochures/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Upstream(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("HTTP error! status: {status}")));
        }

        let envelope = response
            .json::<ApiResponse<Brochure>>()
            .await
            .map_err(|e| Error::Upstream(format!("invalid response body: {e}")))?;
        Ok(envelope.data)
    }

    /// GET /health - true when the backend answers 200
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Short human form of a transport failure for the error slot
fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "could not reach backend".to_string()
    } else {
        err.to_string()
    }
}
