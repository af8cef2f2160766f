use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Page {page} does not exist (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("Malformed document structure: {0}")]
    Malformed(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Page rendering failed: {0}")]
    RenderError(String),
}
