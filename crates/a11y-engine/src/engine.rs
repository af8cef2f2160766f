use std::path::Path;

use a11y_types::Finding;
use pdf_access::{DocumentAccessor, PdfDocument, PdfError};
use tracing::{debug, info};

use crate::checks::Check;

/// Runs every [`Check`] in order and numbers the findings.
#[derive(Debug, Clone)]
pub struct AccessibilityEngine {
    checks: Vec<Check>,
}

impl AccessibilityEngine {
    pub fn new() -> Self {
        Self {
            checks: Check::ALL.to_vec(),
        }
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Findings in check order, then document order within a check.
    ///
    /// Ids are `issue-0001`, `issue-0002`, ... per call, so analysing an
    /// unchanged document twice gives identical output.
    pub fn analyze(&self, doc: &dyn DocumentAccessor) -> Vec<Finding> {
        let mut findings = Vec::new();
        for check in &self.checks {
            let found = check.run(doc);
            debug!(
                check = check.name(),
                criterion = check.criterion(),
                findings = found.len(),
                "check complete"
            );
            findings.extend(found);
        }

        for (index, finding) in findings.iter_mut().enumerate() {
            finding.issue_id = format!("issue-{:04}", index + 1);
        }
        info!(
            pages = doc.page_count(),
            findings = findings.len(),
            "analysis complete"
        );
        findings
    }

    /// Open `path` and analyse it.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<Vec<Finding>, PdfError> {
        let doc = PdfDocument::open(path)?;
        Ok(self.analyze(&doc))
    }
}

impl Default for AccessibilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_access::testing::FixtureBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_sequential() {
        let bytes = FixtureBuilder::new().pages(3).build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        let findings = AccessibilityEngine::new().analyze(&doc);
        assert!(findings.len() >= 4);
        for (i, finding) in findings.iter().enumerate() {
            assert_eq!(finding.issue_id, format!("issue-{:04}", i + 1));
        }
    }

    #[test]
    fn findings_follow_check_order() {
        let bytes = FixtureBuilder::new().pages(2).build();
        let doc = PdfDocument::load_mem(&bytes).unwrap();
        let criteria: Vec<String> = AccessibilityEngine::new()
            .analyze(&doc)
            .into_iter()
            .map(|f| f.wcag_criterion)
            .collect();
        assert_eq!(criteria, vec!["2.4.2", "3.1.1", "1.3.1", "2.4.5"]);
    }
}
