//! Page Slicer – partitions the tall raster surface into fixed-height page
//! images sized to a physical page format.
//!
//! The physical page is mapped into surface pixel space using the surface
//! width as the 100 % reference: `scale = page_width_mm / surface_width_px`,
//! `page_height_px = page_height_mm / scale`. Offsets then advance in steps
//! of `page_height_px` with a strict `remaining > 0` guard, so a surface
//! height landing exactly on a page boundary never emits a trailing empty
//! page.

use tiny_skia::Pixmap;

use crate::render::RasterSurface;

/// Portrait A4, in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// One fixed-height crop of the raster surface, destined for one physical
/// page. Produced in strictly increasing `index` order.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based page number.
    pub index: usize,
    /// Vertical offset of this page's source region in surface pixels.
    pub origin_offset_y: f32,
    /// The cropped page image; the final page may be shorter than a full
    /// page height.
    pub image: Pixmap,
}

/// Height of one physical page expressed in surface pixels.
pub fn page_height_px(surface_width_px: u32, page_width_mm: f32, page_height_mm: f32) -> f32 {
    page_height_mm * surface_width_px as f32 / page_width_mm
}

/// Vertical offsets of every page, in surface pixels.
///
/// Returns exactly `ceil(surface_height / page_height)` offsets with offset
/// `i == i * page_height`. A zero-height surface still yields one page.
pub fn page_offsets(surface_height: f32, page_height: f32) -> Vec<f32> {
    if surface_height <= 0.0 || page_height <= 0.0 {
        return vec![0.0];
    }

    let mut offsets = Vec::new();
    let mut remaining = surface_height;
    let mut index = 0u32;
    while remaining > 0.0 {
        offsets.push(index as f32 * page_height);
        index += 1;
        remaining -= page_height;
    }
    offsets
}

/// Slice the surface into page images for the given physical page format.
pub fn slice(surface: &RasterSurface, page_width_mm: f32, page_height_mm: f32) -> Vec<Page> {
    let width = surface.width_px();
    let height = surface.height_px();
    let page_h = page_height_px(width, page_width_mm, page_height_mm);

    page_offsets(height as f32, page_h)
        .into_iter()
        .enumerate()
        .map(|(index, offset)| {
            let top = (offset.round() as u32).min(height.saturating_sub(1));
            // Crop, never pad: the last page keeps only the remaining
            // content rows (minimum one row, a zero-height pixmap being
            // unrepresentable).
            let crop_h = (page_h.round() as u32).min(height - top).max(1);
            Page {
                index,
                origin_offset_y: offset,
                image: crop_rows(&surface.pixmap, top, crop_h),
            }
        })
        .collect()
}

/// Copy `crop_h` rows starting at `top` into a fresh pixmap.
fn crop_rows(source: &Pixmap, top: u32, crop_h: u32) -> Pixmap {
    let width = source.width();
    let stride = width as usize * 4;
    let mut out = Pixmap::new(width, crop_h)
        .expect("page crop dimensions are non-zero and within the source");
    let from = top as usize * stride;
    let to = from + crop_h as usize * stride;
    out.data_mut().copy_from_slice(&source.data()[from..to]);
    out
}
