//! Text measurement and word wrapping.
//!
//! Layout only needs widths good enough to wrap paragraphs consistently, so
//! measurement uses an average-character-width heuristic (glyph rasterization
//! is resvg's job and does not feed back into geometry).

/// Approximate rendered width of `text` at `font_size` logical units.
/// Average char width ≈ 0.5 × font size for proportional fonts; bold is
/// ~10 % wider.
pub fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let avg = if bold { 0.55 } else { 0.5 };
    text.chars().count() as f32 * font_size * avg
}

/// Word-wrap text to fit within `max_width` logical units. Existing newlines
/// start new lines; a word longer than the width gets a line of its own.
pub fn wrap(text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in &words {
            let candidate = if current.is_empty() {
                (*word).to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, font_size, bold) > max_width && !current.is_empty() {
                lines.push(current);
                current = (*word).to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
