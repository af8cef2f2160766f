//! Accessibility checks for PDF documents
//!
//! Runs a fixed set of WCAG 2.1 AA heuristics over a [`DocumentAccessor`]
//! and scores the result.
//!
//! [`DocumentAccessor`]: pdf_access::DocumentAccessor

pub mod checks;
pub mod contrast;
mod draft;
pub mod engine;
pub mod patterns;
pub mod score;

pub use checks::Check;
pub use engine::AccessibilityEngine;
pub use score::{score, severity_counts, SeverityCounts};
