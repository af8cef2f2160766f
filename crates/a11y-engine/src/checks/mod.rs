//! The ten document checks
//!
//! Each check is a free function from a [`DocumentAccessor`] to findings. They
//! read the document only and never fail; missing or unreadable data means
//! "nothing found" (or "feature absent", which may itself be the finding).

mod color;
mod forms;
mod images;
mod metadata;
mod navigation;
mod structure;

pub use color::check_text_contrast;
pub use forms::check_form_field_names;
pub use images::check_image_alt_text;
pub use metadata::{check_document_language, check_document_title};
pub use navigation::{check_bookmarks, check_link_purpose};
pub use structure::{check_heading_structure, check_tab_order, check_tagged_structure};

use a11y_types::{rules, Finding};
use pdf_access::{DocumentAccessor, Lookup};
use tracing::warn;

/// A single check, in the order the engine runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    DocumentTitle,
    DocumentLanguage,
    TaggedStructure,
    Bookmarks,
    ImageAltText,
    TextContrast,
    FormFieldNames,
    LinkPurpose,
    HeadingStructure,
    TabOrder,
}

impl Check {
    pub const ALL: [Check; 10] = [
        Check::DocumentTitle,
        Check::DocumentLanguage,
        Check::TaggedStructure,
        Check::Bookmarks,
        Check::ImageAltText,
        Check::TextContrast,
        Check::FormFieldNames,
        Check::LinkPurpose,
        Check::HeadingStructure,
        Check::TabOrder,
    ];

    /// WCAG criterion this check reports under.
    pub fn criterion(self) -> &'static str {
        match self {
            Check::DocumentTitle => rules::PAGE_TITLED,
            Check::DocumentLanguage => rules::LANGUAGE_OF_PAGE,
            Check::TaggedStructure => rules::INFO_AND_RELATIONSHIPS,
            Check::Bookmarks => rules::MULTIPLE_WAYS,
            Check::ImageAltText => rules::NON_TEXT_CONTENT,
            Check::TextContrast => rules::CONTRAST_MINIMUM,
            Check::FormFieldNames => rules::NAME_ROLE_VALUE,
            Check::LinkPurpose => rules::LINK_PURPOSE,
            Check::HeadingStructure => rules::HEADINGS_AND_LABELS,
            Check::TabOrder => rules::MEANINGFUL_SEQUENCE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Check::DocumentTitle => "document_title",
            Check::DocumentLanguage => "document_language",
            Check::TaggedStructure => "tagged_structure",
            Check::Bookmarks => "bookmarks",
            Check::ImageAltText => "image_alt_text",
            Check::TextContrast => "text_contrast",
            Check::FormFieldNames => "form_field_names",
            Check::LinkPurpose => "link_purpose",
            Check::HeadingStructure => "heading_structure",
            Check::TabOrder => "tab_order",
        }
    }

    pub fn run(self, doc: &dyn DocumentAccessor) -> Vec<Finding> {
        match self {
            Check::DocumentTitle => check_document_title(doc),
            Check::DocumentLanguage => check_document_language(doc),
            Check::TaggedStructure => check_tagged_structure(doc),
            Check::Bookmarks => check_bookmarks(doc),
            Check::ImageAltText => check_image_alt_text(doc),
            Check::TextContrast => check_text_contrast(doc),
            Check::FormFieldNames => check_form_field_names(doc),
            Check::LinkPurpose => check_link_purpose(doc),
            Check::HeadingStructure => check_heading_structure(doc),
            Check::TabOrder => check_tab_order(doc),
        }
    }
}

/// Value of a lookup if present and non-blank. Malformed values count as
/// absent but are logged.
pub(crate) fn present(lookup: Lookup, what: &str) -> Option<String> {
    match lookup {
        Lookup::Found(value) if !value.trim().is_empty() => Some(value),
        Lookup::Malformed(reason) => {
            warn!(key = what, %reason, "malformed value treated as absent");
            None
        }
        _ => None,
    }
}

/// A document is tagged when the catalog carries a structure tree root or
/// mark-info dictionary.
pub(crate) fn is_tagged(doc: &dyn DocumentAccessor) -> bool {
    present(doc.catalog_value("StructTreeRoot"), "StructTreeRoot").is_some()
        || present(doc.catalog_value("MarkInfo"), "MarkInfo")
            .is_some_and(|v| v != "<<>>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_check_has_a_known_rule() {
        for check in Check::ALL {
            assert!(
                a11y_types::rule(check.criterion()).is_some(),
                "{} has no rule",
                check.name()
            );
        }
    }

    #[test]
    fn criteria_are_distinct() {
        let criteria: HashSet<&str> = Check::ALL.iter().map(|c| c.criterion()).collect();
        assert_eq!(criteria.len(), Check::ALL.len());
    }

    #[test]
    fn malformed_lookup_is_absent() {
        assert_eq!(present(Lookup::Malformed("dangling".into()), "Lang"), None);
        assert_eq!(present(Lookup::Found(" ".into()), "Lang"), None);
        assert_eq!(
            present(Lookup::Found("en".into()), "Lang"),
            Some("en".to_string())
        );
    }
}
