//! Font-size heuristics for heading detection
//!
//! Only used to report counts. Nothing is written to the structure tree.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TagClass {
    H1,
    H2,
    H3,
    #[serde(rename = "P")]
    Paragraph,
}

/// Bold text at 18/15/13pt and up is H1/H2/H3; everything else is a paragraph.
pub fn classify(font_size: f64, bold: bool) -> TagClass {
    match (bold, font_size) {
        (true, size) if size >= 18.0 => TagClass::H1,
        (true, size) if size >= 15.0 => TagClass::H2,
        (true, size) if size >= 13.0 => TagClass::H3,
        _ => TagClass::Paragraph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_sizes_map_to_heading_levels() {
        assert_eq!(classify(24.0, true), TagClass::H1);
        assert_eq!(classify(18.0, true), TagClass::H1);
        assert_eq!(classify(16.0, true), TagClass::H2);
        assert_eq!(classify(13.0, true), TagClass::H3);
        assert_eq!(classify(12.9, true), TagClass::Paragraph);
    }

    #[test]
    fn regular_weight_is_always_paragraph() {
        assert_eq!(classify(36.0, false), TagClass::Paragraph);
        assert_eq!(classify(10.0, false), TagClass::Paragraph);
    }
}
