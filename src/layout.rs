//! Layout engine – lays document blocks out top-to-bottom at a fixed logical
//! width and flattens them into draw primitives (text runs and rules) plus a
//! total surface height.
//!
//! All coordinates are logical units with the origin at the surface top-left;
//! the renderer scales them to pixels.

use crate::model::{Block, DocumentModel, Panel, TextItem};
use crate::text;

/// Default logical content width of the rendered document.
pub const LOGICAL_WIDTH: f32 = 800.0;
/// Outer margin on all four sides, in logical units.
pub const MARGIN: f32 = 20.0;

const BODY_SIZE: f32 = 16.0;
const TITLE_SIZE: f32 = 32.0;
const SECTION_SIZE: f32 = 19.0;
const SMALL_SIZE: f32 = 13.0;
const LINE_FACTOR: f32 = 1.6;
const SIGNATURE_WIDTH: f32 = 200.0;

/// Horizontal anchor for a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
}

/// A flat draw primitive in document coordinates.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// A single line of text; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        anchor: Anchor,
        content: String,
    },
    /// A horizontal rule.
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        stroke: f32,
        dashed: bool,
    },
}

/// The laid-out document: primitives plus overall dimensions.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub primitives: Vec<Primitive>,
}

struct Engine {
    width: f32,
    y: f32,
    primitives: Vec<Primitive>,
}

impl Engine {
    fn new(width: f32) -> Self {
        Self {
            width,
            y: MARGIN,
            primitives: Vec::new(),
        }
    }

    /// Emit one line of text at the cursor and advance by the line height.
    fn line(&mut self, x: f32, size: f32, bold: bool, anchor: Anchor, content: &str) {
        self.primitives.push(Primitive::Text {
            x,
            y: self.y + size,
            size,
            bold,
            anchor,
            content: content.to_string(),
        });
        self.y += size * LINE_FACTOR;
    }

    /// Emit a rule at the cursor and advance by its stroke width.
    fn rule(&mut self, x1: f32, x2: f32, stroke: f32, dashed: bool) {
        self.primitives.push(Primitive::Rule {
            x1,
            x2,
            y: self.y,
            stroke,
            dashed,
        });
        self.y += stroke;
    }

    fn header(&mut self, title: &str, subtitle_lines: &[String]) {
        self.line(self.width / 2.0, TITLE_SIZE, true, Anchor::Middle, title);
        self.y += 10.0;
        for sub in subtitle_lines {
            self.line(self.width / 2.0, BODY_SIZE, false, Anchor::Middle, sub);
        }
        self.y += 20.0;
        self.rule(MARGIN, self.width - MARGIN, 2.0, false);
        self.y += 30.0;
    }

    /// Bold `label:` with the wrapped value starting on the same baseline.
    fn text_block(&mut self, label: &str, value: &str) {
        let label_text = format!("{label}:");
        let value_x = MARGIN + text::text_width(&label_text, BODY_SIZE, true) + 8.0;
        self.primitives.push(Primitive::Text {
            x: MARGIN,
            y: self.y + BODY_SIZE,
            size: BODY_SIZE,
            bold: true,
            anchor: Anchor::Start,
            content: label_text,
        });
        let available = self.width - MARGIN - value_x;
        for line in text::wrap(value, BODY_SIZE, false, available) {
            self.line(value_x, BODY_SIZE, false, Anchor::Start, &line);
        }
        self.y += 10.0;
    }

    fn list(&mut self, title: &str, items: &[TextItem]) {
        self.line(MARGIN, SECTION_SIZE, true, Anchor::Start, title);
        self.y += 10.0;
        for item in items {
            self.line(MARGIN, BODY_SIZE, true, Anchor::Start, &item.label);
            for detail in &item.lines {
                self.line(MARGIN, BODY_SIZE, false, Anchor::Start, detail);
            }
            // Items are separated by a visible dashed rule.
            self.y += 10.0;
            self.rule(MARGIN, self.width - MARGIN, 1.0, true);
            self.y += 15.0;
        }
        self.y += 5.0;
    }

    fn panel_pair(&mut self, left: &Panel, right: &Panel) {
        let top = self.y;
        let left_h = self.panel(MARGIN, top, left);
        let right_h = self.panel(self.width / 2.0, top, right);
        self.y = top + left_h.max(right_h) + 30.0;
    }

    /// Lay one panel column out at a fixed origin; returns its height.
    fn panel(&mut self, x: f32, top: f32, panel: &Panel) -> f32 {
        let line_h = BODY_SIZE * LINE_FACTOR;
        let mut y = top;
        self.primitives.push(Primitive::Text {
            x,
            y: y + BODY_SIZE,
            size: BODY_SIZE,
            bold: true,
            anchor: Anchor::Start,
            content: panel.title.clone(),
        });
        y += line_h;
        for line in &panel.lines {
            self.primitives.push(Primitive::Text {
                x,
                y: y + BODY_SIZE,
                size: BODY_SIZE,
                bold: false,
                anchor: Anchor::Start,
                content: line.clone(),
            });
            y += line_h;
        }
        y - top
    }

    fn signature(&mut self, name: &str, caption: &str) {
        self.y += 40.0;
        let right = self.width - MARGIN;
        let center = right - SIGNATURE_WIDTH / 2.0;
        self.line(center, BODY_SIZE, false, Anchor::Middle, name);
        self.y += 5.0;
        self.rule(right - SIGNATURE_WIDTH, right, 1.0, false);
        self.y += 5.0;
        self.line(center, SMALL_SIZE, false, Anchor::Middle, caption);
    }
}

/// Lay out a document model at the given logical width.
pub fn lay_out(model: &DocumentModel, logical_width: f32) -> Layout {
    let mut engine = Engine::new(logical_width);

    for block in &model.blocks {
        match block {
            Block::Header {
                title,
                subtitle_lines,
            } => engine.header(title, subtitle_lines),
            Block::Text { label, value } => engine.text_block(label, value),
            Block::List { title, items } => engine.list(title, items),
            Block::PanelPair { left, right } => engine.panel_pair(left, right),
            Block::Signature { name, caption } => engine.signature(name, caption),
        }
    }

    Layout {
        width: logical_width,
        height: engine.y + MARGIN,
        primitives: engine.primitives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{self, DocumentKind, DocumentModel};
    use crate::record::Record;
    use crate::samples;
    use chrono::NaiveDate;

    fn built(record: &Record) -> Layout {
        let date = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        lay_out(&model::build(record, date), LOGICAL_WIDTH)
    }

    #[test]
    fn empty_model_is_margins_only() {
        let layout = lay_out(
            &DocumentModel {
                kind: DocumentKind::ClinicalVisit,
                patient_name: String::new(),
                blocks: Vec::new(),
            },
            LOGICAL_WIDTH,
        );
        assert_eq!(layout.height, 2.0 * MARGIN);
        assert!(layout.primitives.is_empty());
    }

    #[test]
    fn layout_is_deterministic() {
        let record = samples::sample_prescription();
        let a = built(&record);
        let b = built(&record);
        assert_eq!(a.height, b.height);
        assert_eq!(a.primitives.len(), b.primitives.len());
    }

    #[test]
    fn primitives_stay_within_the_surface() {
        let layout = built(&samples::sample_prescription());
        for prim in &layout.primitives {
            match prim {
                Primitive::Text { x, y, .. } => {
                    assert!(*x >= 0.0 && *x <= layout.width);
                    assert!(*y > 0.0 && *y < layout.height);
                }
                Primitive::Rule { x1, x2, y, .. } => {
                    assert!(*x1 >= 0.0 && *x2 <= layout.width && x1 < x2);
                    assert!(*y > 0.0 && *y < layout.height);
                }
            }
        }
    }

    #[test]
    fn more_medications_make_a_taller_surface() {
        let mut record = samples::sample_prescription();
        let short = built(&record);
        if let Record::Prescription(p) = &mut record {
            let extra = p.medications[0].clone();
            for _ in 0..10 {
                p.medications.push(extra.clone());
            }
        }
        let tall = built(&record);
        assert!(tall.height > short.height);
    }

    #[test]
    fn long_notes_wrap_into_multiple_lines() {
        let mut record = samples::sample_visit();
        if let Record::Visit(v) = &mut record {
            v.notes = "word ".repeat(120).trim_end().to_string();
        }
        let layout = built(&record);
        let note_lines = layout
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Text { content, .. } if content.contains("word")))
            .count();
        assert!(note_lines > 3, "expected wrapped note lines, got {note_lines}");
    }
}
