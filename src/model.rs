//! Document Model Builder – maps a [`Record`] into an ordered sequence of
//! layout blocks with explicit semantic roles. No rendering concerns live
//! here; block order is deterministic for a given record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Which document template a model was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    ClinicalVisit,
    Prescription,
}

impl DocumentKind {
    /// Filename-safe label.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::ClinicalVisit => "ClinicalVisit",
            DocumentKind::Prescription => "Prescription",
        }
    }
}

/// Renderer-agnostic representation of a record's printable layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentModel {
    pub kind: DocumentKind,
    pub patient_name: String,
    pub blocks: Vec<Block>,
}

/// One layout block, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Block {
    /// Centered document header with optional subtitle lines beneath the
    /// title, closed by a rule.
    Header {
        title: String,
        subtitle_lines: Vec<String>,
    },
    /// A labelled value, e.g. `Patient: John Doe`. Long values wrap.
    Text { label: String, value: String },
    /// A titled, itemised list; each item has a bold lead line and
    /// follow-up lines, separated by a dashed rule.
    List { title: String, items: Vec<TextItem> },
    /// Two side-by-side info panels (patient info / prescription metadata).
    PanelPair { left: Panel, right: Panel },
    /// Right-aligned signature box: name above a rule, caption below.
    Signature { name: String, caption: String },
}

/// One list item: a lead line plus detail lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    pub label: String,
    pub lines: Vec<String>,
}

/// One info panel: a bold title and plain lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub lines: Vec<String>,
}

/// Format an ISO `YYYY-MM-DD` visit date as `MM/DD/YY`. Unparsable input is
/// passed through verbatim so that [`build`] stays total.
pub fn format_visit_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%d/%y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Zero-padded six-digit prescription sequence number, e.g. `RX-000007`.
pub fn rx_number(id: u32) -> String {
    format!("RX-{id:06}")
}

/// Build the document model for a record. Pure and total: `generated_on` is
/// an explicit input (the orchestrator passes today's date) so the visit
/// footer does not read the wall clock here.
///
/// Note the date asymmetry carried over from the source system: visit dates
/// are reformatted to `MM/DD/YY` at build time, while prescription dates are
/// stored pre-formatted and pass through untouched.
pub fn build(record: &Record, generated_on: NaiveDate) -> DocumentModel {
    match record {
        Record::Visit(v) => DocumentModel {
            kind: DocumentKind::ClinicalVisit,
            patient_name: v.patient_name.clone(),
            blocks: vec![
                Block::Header {
                    title: "CLINICAL VISIT REPORT".to_string(),
                    subtitle_lines: Vec::new(),
                },
                Block::Text {
                    label: "Patient".to_string(),
                    value: v.patient_name.clone(),
                },
                Block::Text {
                    label: "Date".to_string(),
                    value: format_visit_date(&v.visit_date),
                },
                Block::Text {
                    label: "Visit Type".to_string(),
                    value: v.visit_type.clone(),
                },
                Block::Text {
                    label: "WHO Stage".to_string(),
                    value: v.who_stage.clone(),
                },
                Block::Text {
                    label: "Notes".to_string(),
                    value: v.notes.clone(),
                },
                Block::Text {
                    label: "Generated on".to_string(),
                    value: generated_on.format("%m/%d/%y").to_string(),
                },
            ],
        },
        Record::Prescription(p) => DocumentModel {
            kind: DocumentKind::Prescription,
            patient_name: p.patient_name.clone(),
            blocks: vec![
                Block::Header {
                    title: "Medical Prescription".to_string(),
                    subtitle_lines: vec![
                        "MyHubCares".to_string(),
                        "123 Healthcare Street, Medical City".to_string(),
                    ],
                },
                Block::PanelPair {
                    left: Panel {
                        title: "Patient Information".to_string(),
                        lines: vec![
                            format!("Name: {}", p.patient_name),
                            format!("Age: {} years", p.patient_age),
                            format!("Sex: {}", p.patient_gender),
                        ],
                    },
                    right: Panel {
                        title: "Prescription Details".to_string(),
                        lines: vec![
                            format!("Date: {}", p.prescription_date),
                            format!("Rx No: {}", rx_number(p.id)),
                            format!("Next Refill: {}", p.next_refill),
                        ],
                    },
                },
                Block::List {
                    title: "\u{211E} Medications".to_string(),
                    items: p
                        .medications
                        .iter()
                        .enumerate()
                        .map(|(i, med)| TextItem {
                            label: format!("{}. {}", i + 1, med.drug_name),
                            lines: vec![
                                format!("Sig: {} {}", med.dosage, med.frequency),
                                format!("Duration: {}", med.duration),
                            ],
                        })
                        .collect(),
                },
                Block::Text {
                    label: "Notes".to_string(),
                    value: p.notes.clone(),
                },
                Block::Signature {
                    name: p.physician_name.clone(),
                    caption: "Prescribing Physician".to_string(),
                },
            ],
        },
    }
}
