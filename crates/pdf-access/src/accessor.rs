use crate::model::{
    DocumentMetadata, FillRect, ImageRef, LinkAnnotation, Lookup, StructElement, TextRun, Widget,
    Word,
};

/// Read-only view of a PDF used by the accessibility checks.
///
/// Page indices are zero-based. Out-of-range pages yield empty results;
/// readers never fail, they degrade to "nothing found".
pub trait DocumentAccessor {
    fn page_count(&self) -> usize;

    /// Page width and height in points.
    fn page_size(&self, page: usize) -> (f64, f64);

    fn text_runs(&self, page: usize) -> &[TextRun];

    fn words(&self, page: usize) -> &[Word];

    fn images(&self, page: usize) -> &[ImageRef];

    /// Filled areas in paint order.
    fn fills(&self, page: usize) -> &[FillRect];

    fn links(&self, page: usize) -> Vec<LinkAnnotation>;

    fn widgets(&self, page: usize) -> Vec<Widget>;

    fn metadata(&self) -> DocumentMetadata;

    /// Raw key from the document catalog.
    fn catalog_value(&self, key: &str) -> Lookup;

    /// Raw key from a page dictionary (not inherited).
    fn page_value(&self, page: usize, key: &str) -> Lookup;

    /// Number of outline (bookmark) entries at any depth.
    fn outline_count(&self) -> usize;

    fn struct_elements(&self) -> Vec<StructElement>;
}
