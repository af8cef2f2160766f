//! 0-100 accessibility score

use std::collections::BTreeMap;

use a11y_types::{Finding, Severity};
use serde::Serialize;

/// Score out of 100.
///
/// Each criterion with findings costs the deduction of its worst severity
/// once, however many findings it has.
pub fn score(findings: &[Finding]) -> u8 {
    let mut worst: BTreeMap<&str, Severity> = BTreeMap::new();
    for finding in findings {
        worst
            .entry(finding.wcag_criterion.as_str())
            .and_modify(|s| {
                if finding.severity.rank() > s.rank() {
                    *s = finding.severity;
                }
            })
            .or_insert(finding.severity);
    }
    let total: u32 = worst.values().map(|s| s.deduction()).sum();
    100u32.saturating_sub(total) as u8
}

/// Number of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    pub unrecognized: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Serious => self.serious,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
            Severity::Unrecognized => self.unrecognized,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.serious + self.moderate + self.minor + self.unrecognized
    }
}

pub fn severity_counts(findings: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for finding in findings {
        match finding.severity {
            Severity::Critical => counts.critical += 1,
            Severity::Serious => counts.serious += 1,
            Severity::Moderate => counts.moderate += 1,
            Severity::Minor => counts.minor += 1,
            Severity::Unrecognized => counts.unrecognized += 1,
        }
    }
    counts
}
