//! Static brochure content store
//!
//! Post-operative care content, loaded once at process start and
//! read-only thereafter. Content lives here as code the same way the
//! seed task list does; a future procedure is added by extending
//! `ContentStore::with_builtin`.

use aftercare_common::brochure::{
    Brochure, BrochureSection, BrochureSummary, SectionBody, TimelineEntry,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// In-process mapping from procedure id to brochure content
#[derive(Debug, Clone)]
pub struct ContentStore {
    brochures: HashMap<String, Brochure>,
}

impl ContentStore {
    /// Store seeded with the built-in brochures
    pub fn with_builtin() -> Self {
        let mut brochures = HashMap::new();
        let myomectomy = myomectomy_brochure();
        brochures.insert(myomectomy.id.clone(), myomectomy);
        Self { brochures }
    }

    /// Empty store (tests)
    pub fn empty() -> Self {
        Self {
            brochures: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Brochure> {
        self.brochures.get(id)
    }

    /// Summary rows for the list endpoint, sorted by id for stable output
    pub fn summaries(&self) -> Vec<BrochureSummary> {
        let mut summaries: Vec<_> = self.brochures.values().map(Brochure::summary).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    pub fn len(&self) -> usize {
        self.brochures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brochures.is_empty()
    }
}

fn list(heading: &str, items: &[&str]) -> BrochureSection {
    BrochureSection {
        heading: heading.to_string(),
        body: SectionBody::List {
            items: items.iter().map(|s| (*s).to_string()).collect(),
        },
    }
}

fn timeline(heading: &str, entries: &[(&str, &str)]) -> BrochureSection {
    BrochureSection {
        heading: heading.to_string(),
        body: SectionBody::Timeline {
            entries: entries
                .iter()
                .map(|(label, detail)| TimelineEntry {
                    label: (*label).to_string(),
                    detail: (*detail).to_string(),
                })
                .collect(),
        },
    }
}

/// Myomectomy post-operative care brochure
fn myomectomy_brochure() -> Brochure {
    Brochure {
        id: "myomectomy".to_string(),
        title: "Myomectomy Post-Operative Care Instructions".to_string(),
        last_updated: NaiveDate::from_ymd_opt(2025, 1, 25).expect("valid brochure date"),
        sections: vec![
            list(
                "Activity Restrictions",
                &[
                    "Lifting: Avoid lifting more than 1 gallon of milk (approximately 8 lbs) for 4-6 weeks",
                    "Driving: Restricted until pain medications are discontinued and you can safely operate a vehicle",
                    "Intercourse: No sexual activity for 6 weeks to allow proper healing",
                    "Exercise: No strenuous exercise or heavy lifting for 4-6 weeks",
                    "Work: Return to desk work when comfortable, typically 1-2 weeks; physical work may require 4-6 weeks",
                    "Stairs: Limit stair climbing for the first week; use handrails when necessary",
                    "Bathing: Showers only for first 48 hours; avoid baths until incision is fully healed",
                ],
            ),
            list(
                "Pain Management",
                &[
                    "Take prescribed pain medications as directed by your physician",
                    "Use stool softeners if experiencing constipation from pain medications",
                    "Apply ice packs to incision area for 15-20 minutes every 2-3 hours for first 48 hours",
                    "Take medications with food to prevent stomach upset",
                    "Do not exceed recommended dosages",
                    "Gradually reduce pain medication as discomfort decreases",
                    "Contact your doctor if pain is not controlled with prescribed medications",
                ],
            ),
            list(
                "Warning Signs",
                &[
                    "Fever greater than 100.4\u{b0}F (38\u{b0}C)",
                    "Heavy bleeding requiring more than one pad per hour",
                    "Severe unrelieved abdominal pain",
                    "Signs of infection: increased redness, warmth, swelling, or drainage from incision",
                    "Persistent nausea and vomiting",
                    "Difficulty urinating or inability to urinate",
                    "Shortness of breath or chest pain",
                    "Leg swelling or pain (possible blood clot)",
                    "Unusual vaginal discharge with foul odor",
                ],
            ),
            timeline(
                "Follow-up Schedule",
                &[
                    (
                        "Post-operative appointment",
                        "Post-operative appointment scheduled at 4-6 weeks",
                    ),
                    (
                        "Urgent care",
                        "Contact office immediately if warning signs occur",
                    ),
                    (
                        "Routine questions",
                        "Call office during business hours for routine questions",
                    ),
                ],
            ),
            timeline(
                "Healing Timeline",
                &[
                    (
                        "Full recovery",
                        "Full recovery typically takes 4-6 weeks",
                    ),
                    (
                        "Discharge time",
                        "Hospital discharge usually occurs 4-8 hours after procedure for outpatient cases",
                    ),
                    (
                        "Return to normal activity",
                        "Gradual return to normal activities over 4-6 weeks",
                    ),
                    (
                        "Incision healing",
                        "Incision should heal within 2-3 weeks",
                    ),
                ],
            ),
            list(
                "Dietary Guidelines",
                &[
                    "Start with clear liquids and advance to regular diet as tolerated",
                    "Increase fiber intake to prevent constipation",
                    "Stay well hydrated - drink 8-10 glasses of water daily",
                    "Avoid alcohol while taking pain medications",
                    "Take iron supplements if recommended by your doctor",
                ],
            ),
            list(
                "Incision Care",
                &[
                    "Keep incision clean and dry",
                    "Gently wash with soap and water during shower",
                    "Pat dry - do not rub the incision area",
                    "Do not apply lotions, creams, or ointments unless prescribed",
                    "Wear loose, comfortable clothing to avoid irritation",
                    "Remove surgical tape/strips as directed by your surgeon",
                ],
            ),
        ],
    }
}
