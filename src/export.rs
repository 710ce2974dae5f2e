//! Export Orchestrator – sequences build → render → slice → assemble,
//! publishes the in-progress phase, and performs the save-as side effect.
//!
//! The orchestrator holds no ambient UI state: its phase is a value on a
//! watch channel and the user-facing toast is a [`Notification`] value the
//! presentation layer displays (and clears after ~[`NOTIFICATION_SECS`]
//! seconds with its own timer).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::sync::watch;

use crate::assemble;
use crate::error::Result;
use crate::layout::LOGICAL_WIDTH;
use crate::model;
use crate::pagination::{self, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::record::Record;
use crate::render::{self, RASTER_SCALE};

/// How long the presentation layer is expected to show a notification.
pub const NOTIFICATION_SECS: u64 = 3;

/// Configuration for one exporter.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Logical layout width (default 800).
    pub logical_width: f32,
    /// Raster pixels per logical unit (default 2.0, print quality).
    pub raster_scale: f32,
    /// Physical page width in millimetres (default A4 portrait, 210).
    pub page_width_mm: f32,
    /// Physical page height in millimetres (default A4 portrait, 297).
    pub page_height_mm: f32,
    /// Upper bound on total surface pixels before rendering is refused.
    pub max_surface_px: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            logical_width: LOGICAL_WIDTH,
            raster_scale: RASTER_SCALE,
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            max_surface_px: 64_000_000,
        }
    }
}

/// Where an export currently stands. `Failed` is terminal and reachable from
/// `Rendering` or `Assembling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Rendering,
    Paginating,
    Assembling,
    Done,
    Failed,
}

/// The final document plus its suggested filename. Terminal and immutable;
/// the pipeline holds no reference after handing it over.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Transient status message for the UI collaborator.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn exporting() -> Self {
        Self {
            message: "Exporting...".to_string(),
            kind: NotificationKind::Info,
        }
    }

    pub fn for_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self {
                message: "PDF downloaded successfully.".to_string(),
                kind: NotificationKind::Success,
            },
            Err(_) => Self {
                message: "Failed to generate PDF. Please try again.".to_string(),
                kind: NotificationKind::Error,
            },
        }
    }
}

/// Runs exports. One exporter backs one triggering affordance; concurrent
/// exports should use independent exporters (they share nothing anyway).
pub struct Exporter {
    config: ExportConfig,
    phase: watch::Sender<ExportPhase>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        let (phase, _) = watch::channel(ExportPhase::Idle);
        Self { config, phase }
    }

    /// Observe the export phase.
    pub fn subscribe(&self) -> watch::Receiver<ExportPhase> {
        self.phase.subscribe()
    }

    /// Run the full pipeline for one record. Runs to completion or failure;
    /// there is no cancellation and no retry.
    pub async fn export(&self, record: &Record) -> Result<ExportArtifact> {
        self.phase.send_replace(ExportPhase::Rendering);
        let model = model::build(record, Local::now().date_naive());

        let surface = self
            .fallible(
                render::render(
                    &model,
                    self.config.logical_width,
                    self.config.raster_scale,
                    self.config.max_surface_px,
                )
                .await,
            )?;

        self.phase.send_replace(ExportPhase::Paginating);
        let pages = pagination::slice(
            &surface,
            self.config.page_width_mm,
            self.config.page_height_mm,
        );
        log::debug!("sliced surface into {} page(s)", pages.len());

        self.phase.send_replace(ExportPhase::Assembling);
        let title = format!("{} {}", model.kind.label(), model.patient_name);
        let bytes = self.fallible(assemble::assemble(
            &pages,
            &title,
            self.config.page_width_mm,
            self.config.page_height_mm,
        ))?;

        self.phase.send_replace(ExportPhase::Done);
        Ok(ExportArtifact {
            bytes,
            suggested_filename: suggested_filename(record),
        })
    }

    /// Export and write the artifact into `dir` under its suggested
    /// filename. On failure nothing is written.
    pub async fn export_to(&self, record: &Record, dir: &Path) -> Result<PathBuf> {
        let artifact = self.export(record).await?;
        fs::create_dir_all(dir)?;
        let path = dir.join(&artifact.suggested_filename);
        fs::write(&path, &artifact.bytes)?;
        log::debug!("wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(path)
    }

    /// Mark the phase machine failed when a stage errors.
    fn fallible<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            log::warn!("export failed: {e}");
            self.phase.send_replace(ExportPhase::Failed);
        }
        result
    }
}

/// `{DocumentKind}_{PatientName}_{Date}.pdf` — non-alphanumeric runs in the
/// patient name collapse to a single `_`; date separators become `-`.
pub fn suggested_filename(record: &Record) -> String {
    let (kind, date) = match record {
        Record::Visit(v) => (
            model::DocumentKind::ClinicalVisit,
            model::format_visit_date(&v.visit_date),
        ),
        Record::Prescription(p) => (
            model::DocumentKind::Prescription,
            p.prescription_date.clone(),
        ),
    };
    format!(
        "{}_{}_{}.pdf",
        kind.label(),
        collapse_non_alphanumeric(record.patient_name()),
        date.replace('/', "-")
    )
}

fn collapse_non_alphanumeric(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::samples;

    #[test]
    fn filename_collapses_non_alphanumeric_runs() {
        assert_eq!(collapse_non_alphanumeric("John Doe"), "John_Doe");
        assert_eq!(collapse_non_alphanumeric("Dr.  A. B-C"), "Dr_A_B_C");
        assert_eq!(collapse_non_alphanumeric("  trimmed  "), "trimmed");
    }

    #[test]
    fn suggested_filenames_follow_the_pattern() {
        assert_eq!(
            suggested_filename(&samples::sample_visit()),
            "ClinicalVisit_John_Doe_10-15-25.pdf"
        );
        assert_eq!(
            suggested_filename(&samples::sample_prescription()),
            "Prescription_John_Doe_10-15-2025.pdf"
        );
    }

    #[test]
    fn notifications_map_results_to_kinds() {
        assert_eq!(Notification::exporting().kind, NotificationKind::Info);
        let ok: Result<()> = Ok(());
        assert_eq!(Notification::for_result(&ok).kind, NotificationKind::Success);
        let err: Result<()> = Err(ExportError::RenderFailed("x".to_string()));
        assert_eq!(Notification::for_result(&err).kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn phase_machine_reaches_done_on_success() {
        let exporter = Exporter::default();
        let phases = exporter.subscribe();
        assert_eq!(*phases.borrow(), ExportPhase::Idle);
        let artifact = exporter.export(&samples::sample_visit()).await.unwrap();
        assert_eq!(*phases.borrow(), ExportPhase::Done);
        assert_eq!(&artifact.bytes[0..5], b"%PDF-");
    }

    #[tokio::test]
    async fn phase_machine_reaches_failed_on_render_failure() {
        let exporter = Exporter::new(ExportConfig {
            max_surface_px: 10,
            ..ExportConfig::default()
        });
        let phases = exporter.subscribe();
        let result = exporter.export(&samples::sample_visit()).await;
        assert!(matches!(result, Err(ExportError::RenderFailed(_))));
        assert_eq!(*phases.borrow(), ExportPhase::Failed);
    }
}
