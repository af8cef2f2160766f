//! WCAG 2.1 success criteria covered by the PDF checks
//!
//! The table is static and shared by every analysis run. Findings copy the
//! criterion title and conformance level from here.

use serde::Serialize;

use crate::types::ConformanceLevel;

/// WCAG principle a criterion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Perceivable,
    Navigable,
    Understandable,
    Robust,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleDefinition {
    pub criterion: &'static str,
    pub title: &'static str,
    pub level: ConformanceLevel,
    pub category: Category,
    pub description: &'static str,
    pub pdf_guidance: &'static str,
    pub help_url: &'static str,
}

pub const NON_TEXT_CONTENT: &str = "1.1.1";
pub const INFO_AND_RELATIONSHIPS: &str = "1.3.1";
pub const MEANINGFUL_SEQUENCE: &str = "1.3.2";
pub const CONTRAST_MINIMUM: &str = "1.4.3";
pub const PAGE_TITLED: &str = "2.4.2";
pub const LINK_PURPOSE: &str = "2.4.4";
pub const MULTIPLE_WAYS: &str = "2.4.5";
pub const HEADINGS_AND_LABELS: &str = "2.4.6";
pub const LANGUAGE_OF_PAGE: &str = "3.1.1";
pub const NAME_ROLE_VALUE: &str = "4.1.2";

pub static WCAG_RULES: &[RuleDefinition] = &[
    RuleDefinition {
        criterion: NON_TEXT_CONTENT,
        title: "Non-text Content",
        level: ConformanceLevel::A,
        category: Category::Perceivable,
        description: "All non-text content presented to the user has a text alternative \
                      that serves the equivalent purpose.",
        pdf_guidance: "Images must have Alt text set in the PDF structure tree. \
                       Purely decorative images should be marked as artifacts.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/non-text-content",
    },
    RuleDefinition {
        criterion: INFO_AND_RELATIONSHIPS,
        title: "Info and Relationships",
        level: ConformanceLevel::A,
        category: Category::Perceivable,
        description: "Information, structure, and relationships conveyed through presentation \
                      can be programmatically determined or are available in text.",
        pdf_guidance: "The PDF must be tagged. Headings, lists, tables, and other structural \
                       elements must use the correct PDF tag types (H1-H6, L, Table, etc.).",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/info-and-relationships",
    },
    RuleDefinition {
        criterion: MEANINGFUL_SEQUENCE,
        title: "Meaningful Sequence",
        level: ConformanceLevel::A,
        category: Category::Perceivable,
        description: "If the sequence in which content is presented affects its meaning, \
                      a correct reading sequence can be programmatically determined.",
        pdf_guidance: "The tag reading order in the structure tree must match the logical \
                       reading order of the document.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/meaningful-sequence",
    },
    RuleDefinition {
        criterion: CONTRAST_MINIMUM,
        title: "Contrast (Minimum)",
        level: ConformanceLevel::AA,
        category: Category::Perceivable,
        description: "The visual presentation of text has a contrast ratio of at least 4.5:1. \
                      Large text (18 pt or 14 pt bold) requires at least 3:1.",
        pdf_guidance: "Ensure text colours have sufficient contrast against their background. \
                       Use tools such as the Colour Contrast Analyser to verify.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/contrast-minimum",
    },
    RuleDefinition {
        criterion: PAGE_TITLED,
        title: "Page Titled",
        level: ConformanceLevel::A,
        category: Category::Navigable,
        description: "Web pages and documents have titles that describe topic or purpose.",
        pdf_guidance: "Set a descriptive title in File > Properties > Description > Title.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/page-titled",
    },
    RuleDefinition {
        criterion: LINK_PURPOSE,
        title: "Link Purpose (In Context)",
        level: ConformanceLevel::A,
        category: Category::Navigable,
        description: "The purpose of each link can be determined from the link text alone, \
                      or from the link text together with its programmatically determined context.",
        pdf_guidance: "Avoid generic link text such as 'click here', 'here', or bare URLs. \
                       Use descriptive text that explains the link destination.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/link-purpose-in-context",
    },
    RuleDefinition {
        criterion: MULTIPLE_WAYS,
        title: "Multiple Ways",
        level: ConformanceLevel::AA,
        category: Category::Navigable,
        description: "More than one way is available to locate content within a set of pages.",
        pdf_guidance: "Multi-page PDFs should have a bookmarks panel (table of contents) \
                       so users can navigate directly to sections.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/multiple-ways",
    },
    RuleDefinition {
        criterion: HEADINGS_AND_LABELS,
        title: "Headings and Labels",
        level: ConformanceLevel::AA,
        category: Category::Navigable,
        description: "Headings and labels describe topic or purpose.",
        pdf_guidance: "Use H1-H6 tags in the structure tree for headings, and TH tags for \
                       table header cells.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/headings-and-labels",
    },
    RuleDefinition {
        criterion: LANGUAGE_OF_PAGE,
        title: "Language of Page",
        level: ConformanceLevel::A,
        category: Category::Understandable,
        description: "The default human language of each page can be programmatically determined.",
        pdf_guidance: "Set the document language in File > Properties > Advanced > Language, \
                       or via the PDF catalog /Lang entry (e.g. 'en-US').",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/language-of-page",
    },
    RuleDefinition {
        criterion: NAME_ROLE_VALUE,
        title: "Name, Role, Value",
        level: ConformanceLevel::A,
        category: Category::Robust,
        description: "For all user interface components, the name and role can be programmatically \
                      determined; states, properties, and values that can be set by the user can be \
                      programmatically set; and notification of changes is available to user agents.",
        pdf_guidance: "All interactive form fields must have an accessible name (tooltip or label). \
                       Use the field's tooltip/alternate description property.",
        help_url: "https://www.w3.org/WAI/WCAG21/Understanding/name-role-value",
    },
];

/// Look up a rule by criterion code (e.g. "2.4.2")
pub fn rule(criterion: &str) -> Option<&'static RuleDefinition> {
    WCAG_RULES.iter().find(|r| r.criterion == criterion)
}
