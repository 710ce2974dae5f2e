//! Document Assembler – appends page images into a multi-page PDF using
//! `printpdf` (v0.8 ops-based API).
//!
//! Each page image is PNG-encoded and placed full-bleed at the top of a
//! constant-size physical page; a short final image leaves the bottom of its
//! page blank rather than stretching.

use printpdf::*;

use crate::error::{ExportError, Result};
use crate::pagination::Page;

/// mm → PDF points (1 pt = 1/72 inch).
const PT_PER_MM: f32 = 2.834_646;

/// Assemble page images into PDF bytes, in index order.
pub fn assemble(
    pages: &[Page],
    title: &str,
    page_width_mm: f32,
    page_height_mm: f32,
) -> Result<Vec<u8>> {
    let page_w_pt = page_width_mm * PT_PER_MM;
    let page_h_pt = page_height_mm * PT_PER_MM;

    let mut doc = PdfDocument::new(title);
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();
    let mut pdf_pages = Vec::new();

    for page in pages {
        let png = page
            .image
            .encode_png()
            .map_err(|e| ExportError::AssemblyFailed(format!("PNG encode error: {e}")))?;
        let raw = RawImage::decode_from_bytes(&png, &mut img_warnings)
            .map_err(|e| ExportError::AssemblyFailed(format!("PDF image error: {e}")))?;
        let xobj_id = doc.add_image(&raw);

        // At dpi=72 printpdf renders 1 px = 1 pt, so one uniform factor maps
        // the image width onto the full physical page width.
        let scale = page_w_pt / page.image.width() as f32;
        let img_h_pt = page.image.height() as f32 * scale;

        // PDF origin is bottom-left; the image sits flush with the page top.
        let ops = vec![Op::UseXobject {
            id: xobj_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(page_h_pt - img_h_pt)),
                dpi: Some(72.0),
                scale_x: Some(scale),
                scale_y: Some(scale),
                rotate: None,
            },
        }];

        pdf_pages.push(PdfPage::new(Mm(page_width_mm), Mm(page_height_mm), ops));
    }

    for warning in &img_warnings {
        log::warn!("pdf image warning: {warning:?}");
    }

    // Ensure at least one page.
    if pdf_pages.is_empty() {
        pdf_pages.push(PdfPage::new(
            Mm(page_width_mm),
            Mm(page_height_mm),
            Vec::new(),
        ));
    }

    doc.with_pages(pdf_pages);
    Ok(doc.save(&PdfSaveOptions::default(), &mut Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
    use tiny_skia::Pixmap;

    fn blank_page(index: usize, width: u32, height: u32) -> Page {
        Page {
            index,
            origin_offset_y: 0.0,
            image: Pixmap::new(width, height).unwrap(),
        }
    }

    #[test]
    fn empty_input_still_produces_a_pdf() {
        let bytes = assemble(&[], "empty", PAGE_WIDTH_MM, PAGE_HEIGHT_MM).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn two_pages_assemble_in_order() {
        let pages = vec![blank_page(0, 100, 140), blank_page(1, 100, 60)];
        let bytes = assemble(&pages, "report", PAGE_WIDTH_MM, PAGE_HEIGHT_MM).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
        // Both page images embed even though the second is a short crop.
        assert!(bytes.len() > 200);
    }
}
