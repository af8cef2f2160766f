use a11y_types::{rules, Finding, Severity};
use pdf_access::DocumentAccessor;

use crate::draft::Draft;
use crate::patterns::is_generic_link_text;

/// Words within this distance of a link's rect count as its text.
const LINK_TEXT_SLOP: f64 = 3.0;

/// 2.4.5: multi-page documents need bookmarks.
pub fn check_bookmarks(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let pages = doc.page_count();
    if pages <= 1 || doc.outline_count() > 0 {
        return Vec::new();
    }

    vec![Draft::new(rules::MULTIPLE_WAYS, Severity::Moderate, "No Bookmarks / Navigation")
        .describe(format!(
            "The document has {pages} pages but no bookmarks, leaving no quick way to move \
             between sections."
        ))
        .remedy("Add a bookmark for each major section, for example generated from the headings.")
        .info("type", "navigation")
        .info("page_count", pages)
        .build()]
}

/// 2.4.4: the visible text of each link should describe where it goes.
pub fn check_link_purpose(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let mut findings = Vec::new();
    for page in 0..doc.page_count() {
        let words = doc.words(page);
        for link in doc.links(page) {
            let area = link.rect.expand(LINK_TEXT_SLOP);
            let text = words
                .iter()
                .filter(|w| w.bbox.intersects(&area))
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let text = text.trim().to_string();
            if !is_generic_link_text(&text) {
                continue;
            }

            let description = if text.is_empty() {
                format!(
                    "A link on page {} has no visible text, so its purpose cannot be determined.",
                    page + 1
                )
            } else {
                format!("The link text '{text}' does not say where the link goes.")
            };
            findings.push(
                Draft::new(rules::LINK_PURPOSE, Severity::Moderate, "Non-descriptive Link Text")
                    .page(page)
                    .describe(description)
                    .remedy(
                        "Rewrite the link text to name its destination, e.g. 'Download the \
                         2024 annual report' instead of 'click here'.",
                    )
                    .rect(link.rect)
                    .info("type", "link")
                    .info("text", text)
                    .info("uri", link.target.describe())
                    .info("page", page + 1)
                    .build(),
            );
        }
    }
    findings
}
