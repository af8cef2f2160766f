use a11y_types::{rules, Finding, Severity};
use pdf_access::DocumentAccessor;

use crate::draft::Draft;

/// 4.1.2: every form field needs a name, label or tooltip.
pub fn check_form_field_names(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let mut findings = Vec::new();
    for page in 0..doc.page_count() {
        for widget in doc.widgets(page) {
            if widget.has_accessible_name() {
                continue;
            }
            let field_type = widget.field_type_label().to_string();
            findings.push(
                Draft::new(rules::NAME_ROLE_VALUE, Severity::Critical, "Form Field Missing Accessible Name")
                    .page(page)
                    .describe(format!(
                        "A {} field on page {} has no accessible name, so screen readers \
                         announce it without any context.",
                        field_type.to_lowercase(),
                        page + 1
                    ))
                    .remedy(
                        "Give the field a tooltip (alternate name) that says what to enter, \
                         e.g. 'Email address'.",
                    )
                    .rect(widget.rect)
                    .info("type", "form_field")
                    .info("field_type", field_type)
                    .info("page", page + 1)
                    .build(),
            );
        }
    }
    findings
}
