//! Template Renderer – turns a document model into a single tall raster
//! surface.
//!
//! The laid-out primitives are serialised to an SVG string and rasterized
//! with resvg into a pixmap at 2× pixel density for print quality.
//! Rasterization can take non-trivial wall-clock time, so it runs on the
//! blocking thread pool; callers await the result.

use std::sync::{Arc, OnceLock};

use std::fmt::Write as _;
use tiny_skia::Pixmap;

use crate::error::{ExportError, Result};
use crate::layout::{self, Anchor, Layout, Primitive};
use crate::model::DocumentModel;

/// Raster scale applied on top of logical units (2× for print quality).
pub const RASTER_SCALE: f32 = 2.0;

/// The fully laid-out document as one tall pixel buffer. Read-only once
/// produced; the slicer only takes crops of it.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pub pixmap: Pixmap,
    /// Logical content width the layout was computed at.
    pub logical_width: f32,
    /// Pixels per logical unit.
    pub scale: f32,
}

impl RasterSurface {
    pub fn width_px(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height_px(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Shared system font database; loading it is expensive, so do it once.
fn font_database() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            if db.is_empty() {
                // Glyphs will be missing but geometry is unaffected; the
                // surface size comes from the layout, not the fonts.
                log::warn!("no system fonts found; text will not be rasterized");
            }
            Arc::new(db)
        })
        .clone()
}

/// Render a document model into a raster surface.
///
/// `max_surface_px` bounds the total pixel count of the surface; exceeding
/// it (or any rasterizer failure) aborts the export with
/// [`ExportError::RenderFailed`].
pub async fn render(
    model: &DocumentModel,
    logical_width: f32,
    scale: f32,
    max_surface_px: u64,
) -> Result<RasterSurface> {
    let laid_out = layout::lay_out(model, logical_width);
    let px_w = (laid_out.width * scale).round() as u32;
    let px_h = (laid_out.height * scale).round() as u32;
    log::debug!("rendering {px_w}x{px_h} surface ({} primitives)", laid_out.primitives.len());

    if px_w == 0 || px_h == 0 {
        return Err(ExportError::RenderFailed(format!(
            "degenerate surface size {px_w}x{px_h}"
        )));
    }
    if u64::from(px_w) * u64::from(px_h) > max_surface_px {
        return Err(ExportError::RenderFailed(format!(
            "surface {px_w}x{px_h} exceeds the {max_surface_px} pixel budget"
        )));
    }

    let svg = to_svg(&laid_out, scale);
    let pixmap = tokio::task::spawn_blocking(move || rasterize(&svg, px_w, px_h))
        .await
        .map_err(|e| ExportError::RenderFailed(format!("rasterization task failed: {e}")))??;

    Ok(RasterSurface {
        pixmap,
        logical_width,
        scale,
    })
}

/// Serialise layout primitives into a standalone SVG document. The viewBox
/// is in logical units; the width/height attributes carry the raster scale.
fn to_svg(laid_out: &Layout, scale: f32) -> String {
    let px_w = (laid_out.width * scale).round();
    let px_h = (laid_out.height * scale).round();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{px_w}\" height=\"{px_h}\" viewBox=\"0 0 {} {}\">",
        laid_out.width, laid_out.height
    );
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>",
        laid_out.width, laid_out.height
    );

    for prim in &laid_out.primitives {
        match prim {
            Primitive::Text {
                x,
                y,
                size,
                bold,
                anchor,
                content,
            } => {
                let weight = if *bold { " font-weight=\"bold\"" } else { "" };
                let anchor_attr = match anchor {
                    Anchor::Start => "",
                    Anchor::Middle => " text-anchor=\"middle\"",
                };
                let _ = writeln!(
                    out,
                    "<text x=\"{x:.1}\" y=\"{y:.1}\" font-family=\"sans-serif\" font-size=\"{size}\" fill=\"#333333\"{weight}{anchor_attr}>{}</text>",
                    escape_xml(content)
                );
            }
            Primitive::Rule {
                x1,
                x2,
                y,
                stroke,
                dashed,
            } => {
                let dash = if *dashed {
                    " stroke-dasharray=\"4 3\""
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "<line x1=\"{x1:.1}\" y1=\"{y:.1}\" x2=\"{x2:.1}\" y2=\"{y:.1}\" stroke=\"#cccccc\" stroke-width=\"{stroke}\"{dash}/>"
                );
            }
        }
    }

    let _ = writeln!(out, "</svg>");
    out
}

fn rasterize(svg: &str, px_w: u32, px_h: u32) -> Result<Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = font_database();

    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)
        .map_err(|e| ExportError::RenderFailed(format!("SVG parse error: {e}")))?;

    let mut pixmap = Pixmap::new(px_w, px_h).ok_or_else(|| {
        ExportError::RenderFailed(format!("failed to allocate {px_w}x{px_h} pixmap"))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LOGICAL_WIDTH;
    use crate::model;
    use crate::samples;
    use chrono::NaiveDate;

    fn sample_model() -> DocumentModel {
        let date = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        model::build(&samples::sample_prescription(), date)
    }

    #[test]
    fn xml_escaping() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn svg_dimensions_carry_the_raster_scale() {
        let laid_out = layout::lay_out(&sample_model(), LOGICAL_WIDTH);
        let svg = to_svg(&laid_out, RASTER_SCALE);
        let expected = format!(
            "width=\"{}\" height=\"{}\"",
            (laid_out.width * RASTER_SCALE).round(),
            (laid_out.height * RASTER_SCALE).round()
        );
        assert!(svg.contains(&expected), "missing {expected} in SVG header");
        assert!(svg.contains("RX-"), "metadata text should be serialised");
    }

    #[tokio::test]
    async fn rendered_surface_is_twice_the_logical_size() {
        let model = sample_model();
        let laid_out = layout::lay_out(&model, LOGICAL_WIDTH);
        let surface = render(&model, LOGICAL_WIDTH, RASTER_SCALE, u64::MAX)
            .await
            .unwrap();
        assert_eq!(surface.width_px(), (LOGICAL_WIDTH * RASTER_SCALE) as u32);
        assert_eq!(
            surface.height_px(),
            (laid_out.height * RASTER_SCALE).round() as u32
        );
    }

    #[tokio::test]
    async fn tiny_pixel_budget_fails_the_render() {
        let err = render(&sample_model(), LOGICAL_WIDTH, RASTER_SCALE, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::RenderFailed(_)));
    }
}
