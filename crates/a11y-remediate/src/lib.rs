//! In-place fixes for common PDF accessibility problems
//!
//! Every operation re-opens the file, changes it in memory and replaces the
//! original through a sibling temp file, so a failed run leaves the input
//! untouched.

pub mod error;
pub mod ocr;
pub mod remediator;
pub mod tagging;

pub use error::RemediationError;
pub use ocr::{tesseract_language, OcrEngine, TesseractOcr};
pub use remediator::{OcrOutcome, OcrSettings, Remediator};
pub use tagging::{classify, TagClass};
