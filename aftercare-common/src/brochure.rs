//! Brochure content model
//!
//! Post-operative care content for one procedure type. Sections carry an
//! explicit tagged body variant (`List` vs `Timeline`) so renderers never
//! have to inspect the runtime shape of the JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full brochure for one procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brochure {
    pub id: String,
    pub title: String,
    pub last_updated: NaiveDate,
    pub sections: Vec<BrochureSection>,
}

/// One titled section of a brochure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrochureSection {
    pub heading: String,
    pub body: SectionBody,
}

/// Section body variants
///
/// `List` renders as bullet points; `Timeline` renders as ordered
/// label/detail pairs (follow-up schedules, healing milestones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionBody {
    List { items: Vec<String> },
    Timeline { entries: Vec<TimelineEntry> },
}

/// One ordered entry of a timeline section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub label: String,
    pub detail: String,
}

/// Summary row returned by the brochure list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrochureSummary {
    pub id: String,
    pub title: String,
    pub last_updated: NaiveDate,
}

impl Brochure {
    pub fn summary(&self) -> BrochureSummary {
        BrochureSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_updated: self.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_body_is_tagged() {
        let list = SectionBody::List {
            items: vec!["Keep incision clean and dry".to_string()],
        };
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["type"], "list");

        let timeline = SectionBody::Timeline {
            entries: vec![TimelineEntry {
                label: "fullRecovery".to_string(),
                detail: "Full recovery typically takes 4-6 weeks".to_string(),
            }],
        };
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["type"], "timeline");
        assert_eq!(json["entries"][0]["label"], "fullRecovery");
    }
}
