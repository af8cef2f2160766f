pub mod geometry;
pub mod rules;
pub mod types;

pub use geometry::Rect;
pub use rules::{rule, Category, RuleDefinition, WCAG_RULES};
pub use types::{ConformanceLevel, ElementInfo, Finding, Severity};
