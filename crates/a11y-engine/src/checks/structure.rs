use a11y_types::{rules, Finding, Severity};
use pdf_access::DocumentAccessor;

use super::{is_tagged, present};
use crate::draft::Draft;
use crate::patterns::is_heading_role;

/// 1.3.1: the document has a tag tree at all.
pub fn check_tagged_structure(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    if is_tagged(doc) {
        return Vec::new();
    }

    vec![Draft::new(rules::INFO_AND_RELATIONSHIPS, Severity::Critical, "PDF is Not Tagged")
        .describe(
            "The document has no structure tree. Assistive technology cannot tell headings, \
             lists and tables apart from body text or work out the reading order.",
        )
        .remedy(
            "Add tags with Accessibility > Autotag Document in Acrobat, or export again \
             from the authoring tool with tagging enabled.",
        )
        .info("type", "document_structure")
        .info("has_tags", false)
        .build()]
}

/// 2.4.6: tagged multi-page documents should carry heading tags.
pub fn check_heading_structure(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let pages = doc.page_count();
    if pages < 2 || !is_tagged(doc) {
        return Vec::new();
    }
    if doc
        .struct_elements()
        .iter()
        .any(|element| is_heading_role(&element.role))
    {
        return Vec::new();
    }

    vec![Draft::new(rules::HEADINGS_AND_LABELS, Severity::Moderate, "No Heading Structure Detected")
        .describe(format!(
            "This tagged document has {pages} pages but no heading tags (H1-H6). Screen \
             reader users move through long documents by jumping between headings."
        ))
        .remedy("Tag section titles as H1-H6 headings, nested to match the document outline.")
        .build()]
}

/// 1.3.2: tab order should follow the structure tree (`/Tabs /S`).
pub fn check_tab_order(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    if !is_tagged(doc) {
        return Vec::new();
    }

    let mut findings = Vec::new();
    for page in 0..doc.page_count() {
        let Some(tabs) = present(doc.page_value(page, "Tabs"), "Tabs") else {
            continue;
        };
        if tabs == "/S" {
            continue;
        }
        findings.push(
            Draft::new(rules::MEANINGFUL_SEQUENCE, Severity::Moderate, "Tab Order Does Not Follow Structure")
                .page(page)
                .describe(format!(
                    "Page {} sets its tab order to {tabs} instead of following the document structure.",
                    page + 1
                ))
                .remedy("Set the page tab order to 'Use Document Structure' (/Tabs /S) in the page properties.")
                .info("type", "tab_order")
                .info("tab_order", tabs)
                .info("page", page + 1)
                .build(),
        );
    }
    findings
}
