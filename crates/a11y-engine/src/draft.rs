use a11y_types::{rule, ConformanceLevel, ElementInfo, Finding, Rect, Severity};
use serde_json::Value;

/// Builder for a finding before the engine assigns its id.
pub(crate) struct Draft {
    finding: Finding,
}

impl Draft {
    pub fn new(criterion: &'static str, severity: Severity, title: &str) -> Self {
        let rule = rule(criterion);
        Self {
            finding: Finding {
                issue_id: String::new(),
                wcag_criterion: criterion.to_string(),
                wcag_title: rule.map(|r| r.title).unwrap_or_default().to_string(),
                level: rule.map_or(ConformanceLevel::A, |r| r.level),
                severity,
                page: 0,
                title: title.to_string(),
                description: String::new(),
                remediation: String::new(),
                auto_fixable: false,
                rect: None,
                element_info: ElementInfo::new(),
            },
        }
    }

    /// Zero-based page index; stored one-based.
    pub fn page(mut self, index: usize) -> Self {
        self.finding.page = index as u32 + 1;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.finding.description = description.into();
        self
    }

    pub fn remedy(mut self, remediation: impl Into<String>) -> Self {
        self.finding.remediation = remediation.into();
        self
    }

    pub fn auto_fixable(mut self) -> Self {
        self.finding.auto_fixable = true;
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.finding.rect = Some(rect);
        self
    }

    pub fn info(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.finding.element_info.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Finding {
        self.finding
    }
}
