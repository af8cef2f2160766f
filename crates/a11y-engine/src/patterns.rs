//! Phrase lists used by the text heuristics

/// Link texts that say nothing about the destination.
pub const GENERIC_LINK_TEXTS: &[&str] = &[
    "click here",
    "here",
    "read more",
    "more",
    "link",
    "click",
    "this",
    "see here",
    "go",
    "see more",
    "find out more",
    "learn more",
    "details",
    "info",
    "information",
    "view",
    "open",
    "download",
];

/// Structure roles counted as headings.
pub const HEADING_ROLES: &[&str] = &["H", "H1", "H2", "H3", "H4", "H5", "H6"];

/// True when the (already normalized) link text is empty or generic.
pub fn is_generic_link_text(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    text.is_empty() || GENERIC_LINK_TEXTS.contains(&text.as_str())
}

pub fn is_heading_role(role: &str) -> bool {
    HEADING_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_phrases_match_case_insensitively() {
        assert!(is_generic_link_text("Click Here"));
        assert!(is_generic_link_text("  read more "));
        assert!(is_generic_link_text(""));
        assert!(!is_generic_link_text("Annual report 2024"));
        assert!(!is_generic_link_text("click here for the annual report"));
    }

    #[test]
    fn heading_roles() {
        assert!(is_heading_role("H"));
        assert!(is_heading_role("H3"));
        assert!(!is_heading_role("H7"));
        assert!(!is_heading_role("P"));
    }
}
