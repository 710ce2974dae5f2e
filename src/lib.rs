//! # careprint – clinical record → PDF export pipeline
//!
//! This crate turns a structured clinical record (visit or prescription)
//! into a downloadable multi-page PDF. The pipeline stages are:
//!
//! 1. **Build** – record → ordered layout blocks ([`model`])
//! 2. **Render** – blocks → one tall 2× raster surface ([`layout`], [`render`])
//! 3. **Slice** – surface → A4-sized page images ([`pagination`])
//! 4. **Assemble** – page images → PDF bytes via printpdf ([`assemble`])
//!
//! The [`export`] orchestrator sequences the stages, publishes its phase on
//! a watch channel, and performs the save-as side effect.

pub mod assemble;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod pagination;
pub mod record;
pub mod render;
pub mod samples;
pub mod text;

// Re-exports for convenience
pub use error::{ExportError, Result};
pub use export::{
    suggested_filename, ExportArtifact, ExportConfig, Exporter, ExportPhase, Notification,
    NotificationKind,
};
pub use record::Record;
