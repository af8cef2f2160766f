//! Text recognition through the `tesseract` command

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::RemediationError;

/// Recognizes text in a rendered page image.
pub trait OcrEngine {
    fn is_available(&self) -> bool;

    /// Plain text of a PNG image, lines separated by newlines.
    fn recognize(&self, png: &[u8], language: &str) -> Result<String, RemediationError>;
}

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    work_dir: Option<PathBuf>,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractOcr {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_dir: None,
        }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }
}

impl OcrEngine for TesseractOcr {
    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, png: &[u8], language: &str) -> Result<String, RemediationError> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("ocr-").suffix(".png");
            b
        };
        let mut image = match &self.work_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| RemediationError::Ocr(format!("temp image: {e}")))?;
        image
            .write_all(png)
            .and_then(|_| image.flush())
            .map_err(|e| RemediationError::Ocr(format!("temp image: {e}")))?;

        debug!(language, bytes = png.len(), "running tesseract");
        let output = Command::new(&self.binary)
            .arg(image.path())
            .arg("stdout")
            .args(["-l", language])
            .output()
            .map_err(|e| {
                RemediationError::Ocr(format!("failed to run {}: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RemediationError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Tesseract traineddata name for a BCP-47 tag. Unknown languages fall back
/// to English.
pub fn tesseract_language(code: &str) -> &'static str {
    let primary = code
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match primary.as_str() {
        "en" => "eng",
        "fr" => "fra",
        "de" => "deu",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "nl" => "nld",
        _ => "eng",
    }
}
