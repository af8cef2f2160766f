//! Printable PDF summary of an accessibility audit

mod canvas;
pub mod error;
mod metrics;
mod report;

pub use error::ReportError;
pub use report::{render_report, ReportInput};
