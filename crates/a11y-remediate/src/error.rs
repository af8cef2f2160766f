use pdf_access::PdfError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemediationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("OCR failed: {0}")]
    Ocr(String),
}
