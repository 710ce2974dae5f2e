//! Input records – the domain objects the export pipeline consumes.
//!
//! A [`Record`] is owned by the caller and never mutated by the pipeline.
//! Field names serialise in camelCase so record JSON matches the shape the
//! clinic frontend produces.

use serde::{Deserialize, Serialize};

/// Maximum notes length shown in listing views before truncation.
const SUMMARY_LEN: usize = 50;

/// A record to be exported: a clinical visit or a prescription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Record {
    Visit(VisitRecord),
    Prescription(PrescriptionRecord),
}

impl Record {
    pub fn patient_name(&self) -> &str {
        match self {
            Record::Visit(v) => &v.patient_name,
            Record::Prescription(p) => &p.patient_name,
        }
    }
}

/// A clinical visit. `visit_date` is stored as ISO `YYYY-MM-DD` and is
/// reformatted to `MM/DD/YY` when presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: u32,
    pub patient_name: String,
    pub visit_date: String,
    pub visit_type: String,
    pub who_stage: String,
    pub notes: String,
}

impl VisitRecord {
    /// Notes summary used by listing views: at most 50 characters, with an
    /// ellipsis marker when truncated. The export pipeline always receives
    /// the full notes text, never this summary.
    pub fn notes_summary(&self) -> String {
        if self.notes.chars().count() > SUMMARY_LEN {
            let head: String = self.notes.chars().take(SUMMARY_LEN).collect();
            format!("{head}...")
        } else {
            self.notes.clone()
        }
    }
}

/// A prescription. `prescription_date` and `next_refill` are stored
/// pre-formatted (`MM/DD/YYYY`) and pass through to the document verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRecord {
    pub id: u32,
    pub patient_name: String,
    pub patient_age: u32,
    pub patient_gender: String,
    pub physician_name: String,
    pub prescription_date: String,
    pub medications: Vec<MedicationLine>,
    pub notes: String,
    pub next_refill: String,
}

/// One prescribed medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationLine {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}
