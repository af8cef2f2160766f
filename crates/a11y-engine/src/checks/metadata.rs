use a11y_types::{rules, Finding, Severity};
use pdf_access::DocumentAccessor;

use super::present;
use crate::draft::Draft;

/// 2.4.2: the document title shown by viewers and screen readers.
pub fn check_document_title(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let title = doc.metadata().title.unwrap_or_default();
    if !title.trim().is_empty() {
        return Vec::new();
    }

    vec![Draft::new(rules::PAGE_TITLED, Severity::Serious, "Missing Document Title")
        .describe(
            "The document properties carry no title. Screen readers announce the title \
             when the file opens and fall back to the file name without one.",
        )
        .remedy(
            "Set a descriptive title under File > Properties > Description > Title, \
             or apply the automatic title fix.",
        )
        .auto_fixable()
        .info("type", "metadata")
        .info("field", "title")
        .build()]
}

/// 3.1.1: catalog `/Lang`.
pub fn check_document_language(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    if present(doc.catalog_value("Lang"), "Lang").is_some() {
        return Vec::new();
    }

    vec![Draft::new(rules::LANGUAGE_OF_PAGE, Severity::Serious, "Missing Document Language")
        .describe(
            "No default language is declared in the document catalog, so screen readers \
             cannot pick the right pronunciation rules.",
        )
        .remedy(
            "Set the language under File > Properties > Advanced > Language (for example \
             'en-US'), or apply the automatic language fix.",
        )
        .auto_fixable()
        .info("type", "metadata")
        .info("field", "language")
        .build()]
}
