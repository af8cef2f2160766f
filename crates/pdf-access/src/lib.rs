//! PDF object model for the accessibility checks
//!
//! Wraps a `lopdf::Document` and exposes what the rule engine needs:
//! positioned text runs, painted images and fills, link and widget
//! annotations, catalog/page key lookups, outline entries and structure
//! elements. Also carries the handful of writes the remediator performs.

pub mod accessor;
pub mod document;
pub mod error;
mod fonts;
mod interpreter;
pub mod model;
mod objects;
pub mod render;
pub mod text;
mod writer;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

pub use accessor::DocumentAccessor;
pub use document::PdfDocument;
pub use error::PdfError;
pub use model::{
    ContentItem, DocumentMetadata, FillRect, ImageRef, LinkAnnotation, LinkTarget, Lookup,
    PageContent, Rgb, StructElement, TextRun, Widget, Word,
};
pub use render::{PageRasterizer, PdfToPpm};
pub use writer::OverlayLayout;
