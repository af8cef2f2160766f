//! Top-down page layout over lopdf content operations

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use pdf_access::text::encode_win_ansi;

use crate::metrics::wrap;

pub(crate) const PAGE_W: f64 = 612.0;
pub(crate) const PAGE_H: f64 = 792.0;
pub(crate) const MARGIN: f64 = 54.0;
pub(crate) const CONTENT_W: f64 = PAGE_W - 2.0 * MARGIN;
/// Baseline of the footer, measured from the top.
const FOOTER_Y: f64 = PAGE_H - 36.0;

pub(crate) type Color = (f64, f64, f64);

pub(crate) const BODY: Color = (0.20, 0.20, 0.20);
pub(crate) const MUTED: Color = (0.45, 0.45, 0.45);
const RULE: Color = (0.80, 0.80, 0.80);

fn num(value: f64) -> Object {
    Object::Real(value as f32)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Style {
    pub size: f64,
    pub bold: bool,
    pub color: Color,
    pub indent: f64,
    /// Extra space after the paragraph.
    pub spacing: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            size: 10.0,
            bold: false,
            color: BODY,
            indent: 0.0,
            spacing: 2.0,
        }
    }
}

/// Accumulates pages of operations. `y` grows downward from the top edge.
pub(crate) struct Canvas {
    finished: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    pub y: f64,
    footer: String,
}

impl Canvas {
    pub fn new(footer: String) -> Self {
        let mut canvas = Self {
            finished: Vec::new(),
            current: Vec::new(),
            y: MARGIN,
            footer,
        };
        canvas.start_page();
        canvas
    }

    fn start_page(&mut self) {
        self.y = MARGIN;
        let number = self.finished.len() + 1;
        let footer = self.footer.clone();
        self.text_at(MARGIN, FOOTER_Y, 7.0, false, MUTED, &footer);
        self.text_at(
            PAGE_W - MARGIN - 30.0,
            FOOTER_Y,
            7.0,
            false,
            MUTED,
            &format!("Page {number}"),
        );
    }

    pub fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.start_page();
    }

    pub fn ensure_space(&mut self, needed: f64) {
        if self.y + needed > FOOTER_Y {
            self.new_page();
        }
    }

    /// Text with its baseline `top` points below the top edge.
    pub fn text_at(&mut self, x: f64, top: f64, size: f64, bold: bool, color: Color, text: &str) {
        let font = if bold { "F2" } else { "F1" };
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), num(size)]),
            Operation::new("rg", vec![num(color.0), num(color.1), num(color.2)]),
            Operation::new("Td", vec![num(x), num(PAGE_H - top)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Filled rectangle whose top edge is `top` points below the page top.
    pub fn fill_rect(&mut self, x: f64, top: f64, width: f64, height: f64, color: Color) {
        self.current.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![num(color.0), num(color.1), num(color.2)]),
            Operation::new(
                "re",
                vec![num(x), num(PAGE_H - top - height), num(width), num(height)],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Thin horizontal rule across the content width.
    pub fn rule(&mut self) {
        let y = PAGE_H - self.y;
        self.current.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![num(RULE.0), num(RULE.1), num(RULE.2)]),
            Operation::new("w", vec![num(0.5)]),
            Operation::new("m", vec![num(MARGIN), num(y)]),
            Operation::new("l", vec![num(PAGE_W - MARGIN), num(y)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        self.y += 6.0;
    }

    /// Wrapped paragraph, breaking pages as needed.
    pub fn write(&mut self, text: &str, style: Style) {
        let line_height = style.size * 1.35;
        for line in wrap(text, style.size, style.bold, CONTENT_W - style.indent) {
            self.ensure_space(line_height + style.spacing);
            let top = self.y + style.size;
            self.text_at(MARGIN + style.indent, top, style.size, style.bold, style.color, &line);
            self.y += line_height;
        }
        self.y += style.spacing;
    }

    pub fn finish(mut self) -> Vec<Vec<Operation>> {
        self.finished.push(self.current);
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_breaks_pages() {
        let mut canvas = Canvas::new("footer".into());
        for i in 0..200 {
            canvas.write(&format!("Line {i}"), Style::default());
        }
        let pages = canvas.finish();
        assert!(pages.len() > 2);
        // Every page starts with its footer
        for page in &pages {
            assert_eq!(page[0].operator, "BT");
        }
    }

    #[test]
    fn ensure_space_only_breaks_when_needed() {
        let mut canvas = Canvas::new(String::new());
        canvas.ensure_space(100.0);
        canvas.y = FOOTER_Y - 10.0;
        canvas.ensure_space(20.0);
        assert_eq!(canvas.y, MARGIN);
        assert_eq!(canvas.finish().len(), 2);
    }
}
