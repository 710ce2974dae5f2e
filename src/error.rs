//! Error types for the export pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while exporting a record.
///
/// Both rendering and assembly failures are terminal for the current export:
/// no partial or corrupt artifact is ever handed to the save step.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The rasterization backend could not produce a surface (bad SVG,
    /// pixmap allocation failure, or the surface exceeded the pixel budget).
    #[error("rendering failed: {0}")]
    RenderFailed(String),

    /// The PDF container could not be constructed from the page images.
    #[error("document assembly failed: {0}")]
    AssemblyFailed(String),

    /// I/O error while writing the exported file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
