//! Page rasterization through poppler's `pdftoppm`

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::PdfError;

/// Renders a single page of a PDF file to PNG bytes.
pub trait PageRasterizer {
    /// Whether the backend can run on this machine.
    fn is_available(&self) -> bool;

    /// Render zero-based `page` at `scale` (1.0 = 72 dpi).
    fn render_png(&self, pdf: &Path, page: usize, scale: f64) -> Result<Vec<u8>, PdfError>;
}

/// Calls `pdftoppm -png -singlefile` and reads the result back.
#[derive(Debug, Clone)]
pub struct PdfToPpm {
    binary: PathBuf,
    work_dir: Option<PathBuf>,
}

impl Default for PdfToPpm {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PdfToPpm {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_dir: None,
        }
    }

    /// Directory for intermediate images (system temp dir otherwise).
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }
}

impl PageRasterizer for PdfToPpm {
    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|_| true)
            .unwrap_or(false)
    }

    fn render_png(&self, pdf: &Path, page: usize, scale: f64) -> Result<Vec<u8>, PdfError> {
        let scratch = match &self.work_dir {
            Some(dir) => tempfile::Builder::new().prefix("render-").tempdir_in(dir),
            None => tempfile::Builder::new().prefix("render-").tempdir(),
        }
        .map_err(|e| PdfError::RenderError(format!("scratch directory: {e}")))?;

        let prefix = scratch.path().join("page");
        let page_number = (page + 1).to_string();
        let dpi = ((72.0 * scale).round() as u32).max(1).to_string();
        debug!(page = page + 1, dpi = %dpi, "rendering page");

        let output = Command::new(&self.binary)
            .args(["-png", "-singlefile", "-r", &dpi, "-f", &page_number, "-l", &page_number])
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| PdfError::RenderError(format!("failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::RenderError(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let png = prefix.with_extension("png");
        std::fs::read(&png).map_err(|source| PdfError::Io { path: png, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let raster = PdfToPpm::new("/nonexistent/bin/pdftoppm-missing");
        assert!(!raster.is_available());
    }

    #[test]
    fn missing_binary_render_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let raster = PdfToPpm::new("/nonexistent/bin/pdftoppm-missing").with_work_dir(dir.path());
        let result = raster.render_png(Path::new("in.pdf"), 0, 2.0);
        assert!(matches!(result, Err(PdfError::RenderError(_))));
        // Scratch directory is cleaned up on failure.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
