//! Plain data the accessor hands to the checks
//!
//! All geometry is PDF user space of the page (origin bottom-left, points).

use a11y_types::Rect;
use serde::Serialize;

/// An sRGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert device components in `0.0..=1.0` (clamped).
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: unit_to_byte(r),
            g: unit_to_byte(g),
            b: unit_to_byte(b),
        }
    }

    pub fn from_gray(level: f64) -> Self {
        Self::from_unit(level, level, level)
    }

    /// Naive CMYK conversion, good enough for contrast estimates.
    pub fn from_cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::from_unit(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// `#RRGGBB`, uppercase.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

fn unit_to_byte(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A string painted by one text-showing operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub bbox: Rect,
    /// Rendered size in points after text and graphics matrices.
    pub font_size: f64,
    pub font_name: String,
    pub bold: bool,
    pub color: Rgb,
    /// Painted with render mode 3 (no fill, no stroke).
    pub invisible: bool,
}

/// A whitespace-delimited word with its own bounding box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub text: String,
    pub bbox: Rect,
}

/// An image XObject painted on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    /// Object number of the image stream (0 when it is not an indirect object).
    pub object_number: u32,
    pub width: u32,
    pub height: u32,
    pub rect: Rect,
    /// Marked-content id the image was painted under, if any.
    pub mcid: Option<i64>,
}

/// A filled path, reduced to its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillRect {
    pub rect: Rect,
    pub color: Rgb,
}

/// Everything the content interpreter collects for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageContent {
    pub runs: Vec<TextRun>,
    pub words: Vec<Word>,
    pub images: Vec<ImageRef>,
    /// In paint order.
    pub fills: Vec<FillRect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LinkTarget {
    Uri(String),
    /// Zero-based page index inside the same document.
    Page(usize),
    Named(String),
    /// Destination in another file.
    Remote(String),
}

impl LinkTarget {
    /// Short human-readable form used in findings.
    pub fn describe(&self) -> String {
        match self {
            LinkTarget::Uri(uri) => uri.clone(),
            LinkTarget::Page(index) => format!("page {}", index + 1),
            LinkTarget::Named(name) => format!("#{name}"),
            LinkTarget::Remote(file) => file.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub target: LinkTarget,
}

/// A form-field widget annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    /// Fully qualified field name (`/T` joined through parents).
    pub name: Option<String>,
    /// Alternate field name `/TU`, inherited from parent fields.
    pub label: Option<String>,
    /// Annotation `/Contents`.
    pub tooltip: Option<String>,
    /// `/FT` value without the slash, e.g. `Tx`.
    pub field_type: Option<String>,
    pub rect: Rect,
}

impl Widget {
    pub fn has_accessible_name(&self) -> bool {
        [&self.name, &self.label, &self.tooltip]
            .into_iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Human-readable field type for reports.
    pub fn field_type_label(&self) -> &str {
        match self.field_type.as_deref() {
            Some("Tx") => "Text",
            Some("Btn") => "Button",
            Some("Ch") => "Choice",
            Some("Sig") => "Signature",
            Some(other) => other,
            None => "Unknown",
        }
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

/// Result of reading a raw key from the catalog or a page dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Present; the value rendered as text (names keep their leading slash).
    Found(String),
    Absent,
    /// Present but unreadable, e.g. a dangling reference.
    Malformed(String),
}

impl Lookup {
    /// The value, if present and not blank.
    pub fn present(&self) -> Option<&str> {
        match self {
            Lookup::Found(v) if !v.trim().is_empty() => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Lookup::Malformed(_))
    }
}

/// One entry of a structure element's `/K`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentItem {
    /// Marked content on a page; `page` is `None` when no `/Pg` applies.
    MarkedContent { page: Option<usize>, mcid: i64 },
    /// Object reference (`/OBJR`), by object number.
    Object(u32),
    /// Child structure element, by object number.
    Element(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructElement {
    pub object_number: u32,
    /// Structure type after `/RoleMap` resolution, without the slash.
    pub role: String,
    pub alt: Option<String>,
    pub content: Vec<ContentItem>,
    /// `/K` present and non-empty.
    pub has_kids: bool,
}
