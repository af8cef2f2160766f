use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Free-form metadata attached to a finding (colors, xrefs, field names...).
pub type ElementInfo = serde_json::Map<String, serde_json::Value>;

/// A single accessibility problem found in a document.
///
/// Field names match the flat JSON record consumers already rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub issue_id: String,
    pub wcag_criterion: String, // e.g., "2.4.2"
    pub wcag_title: String,
    pub level: ConformanceLevel,
    pub severity: Severity,
    pub page: u32, // 0 = document-level
    pub title: String,
    pub description: String,
    pub remediation: String,
    pub auto_fixable: bool,
    pub rect: Option<Rect>,
    #[serde(default)]
    pub element_info: ElementInfo,
}

impl Finding {
    pub fn is_document_level(&self) -> bool {
        self.page == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConformanceLevel {
    A,
    AA,
}

impl fmt::Display for ConformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConformanceLevel::A => f.write_str("A"),
            ConformanceLevel::AA => f.write_str("AA"),
        }
    }
}

/// Finding severity, ordered from least to most severe.
///
/// `Unrecognized` only appears when findings are read back from external
/// JSON carrying a severity this crate does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
    #[serde(other)]
    Unrecognized,
}

impl Severity {
    /// Known severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::Serious => 3,
            Severity::Moderate => 2,
            Severity::Minor => 1,
            Severity::Unrecognized => 0,
        }
    }

    /// Points removed from the score when this is a criterion's worst severity.
    pub fn deduction(self) -> u32 {
        match self {
            Severity::Critical => 20,
            Severity::Serious => 12,
            Severity::Moderate => 6,
            Severity::Minor => 2,
            Severity::Unrecognized => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
            Severity::Unrecognized => "unrecognized",
        }
    }

    /// Capitalized label for human-facing output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Serious => "Serious",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
            Severity::Unrecognized => "Unrecognized",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
