use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use pdf_access::{DocumentAccessor, OverlayLayout, PageRasterizer, PdfDocument, PdfToPpm};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::RemediationError;
use crate::ocr::{tesseract_language, OcrEngine, TesseractOcr};
use crate::tagging::{classify, TagClass};

lazy_static! {
    /// Language tag shape: primary subtag plus optional subtags.
    static ref LANGUAGE_TAG: Regex = Regex::new(r"^[A-Za-z]{2,8}(-[A-Za-z0-9]{1,8})*$").unwrap();
}

/// OCR backend configuration, readable from the `[ocr]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub enabled: bool,
    pub tesseract_bin: PathBuf,
    pub pdftoppm_bin: PathBuf,
    /// Render scale, 1.0 = 72 dpi.
    pub scale: f64,
    pub work_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract_bin: PathBuf::from("tesseract"),
            pdftoppm_bin: PathBuf::from("pdftoppm"),
            scale: 2.0,
            work_dir: None,
        }
    }
}

/// Counts reported by [`Remediator::ocr_and_tag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OcrOutcome {
    pub pages_processed: usize,
    pub tags_classified: usize,
    /// H1, H2, H3.
    pub headings: [usize; 3],
    pub paragraphs: usize,
}

impl OcrOutcome {
    fn count(&mut self, class: TagClass) {
        self.tags_classified += 1;
        match class {
            TagClass::H1 => self.headings[0] += 1,
            TagClass::H2 => self.headings[1] += 1,
            TagClass::H3 => self.headings[2] += 1,
            TagClass::Paragraph => self.paragraphs += 1,
        }
    }
}

pub struct Remediator {
    ocr: Box<dyn OcrEngine>,
    rasterizer: Box<dyn PageRasterizer>,
    settings: OcrSettings,
    layout: OverlayLayout,
}

impl Default for Remediator {
    fn default() -> Self {
        Self::new(OcrSettings::default())
    }
}

impl Remediator {
    /// Remediator backed by `tesseract` and `pdftoppm`.
    pub fn new(settings: OcrSettings) -> Self {
        let mut ocr = TesseractOcr::new(&settings.tesseract_bin);
        let mut rasterizer = PdfToPpm::new(&settings.pdftoppm_bin);
        if let Some(dir) = &settings.work_dir {
            ocr = ocr.with_work_dir(dir);
            rasterizer = rasterizer.with_work_dir(dir);
        }
        Self::with_backends(ocr, rasterizer, settings)
    }

    pub fn with_backends(
        ocr: impl OcrEngine + 'static,
        rasterizer: impl PageRasterizer + 'static,
        settings: OcrSettings,
    ) -> Self {
        Self {
            ocr: Box::new(ocr),
            rasterizer: Box::new(rasterizer),
            settings,
            layout: OverlayLayout::default(),
        }
    }

    /// Set `/Info /Title` and ask viewers to display it.
    pub fn fix_title(&self, path: &Path, title: &str) -> Result<(), RemediationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RemediationError::InvalidInput("title must not be empty".into()));
        }

        let mut doc = PdfDocument::open(path)?;
        doc.set_title(title)?;
        doc.set_display_doc_title()?;
        doc.save_atomic(path)?;
        info!(path = %path.display(), title, "document title set");
        Ok(())
    }

    /// Set the catalog `/Lang` to a BCP-47 tag such as `en-US`.
    pub fn fix_language(&self, path: &Path, code: &str) -> Result<(), RemediationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RemediationError::InvalidInput(
                "language code must not be empty".into(),
            ));
        }
        if !LANGUAGE_TAG.is_match(code) {
            return Err(RemediationError::InvalidInput(format!(
                "'{code}' is not a valid language tag"
            )));
        }

        let mut doc = PdfDocument::open(path)?;
        doc.set_language(code)?;
        doc.save_atomic(path)?;
        info!(path = %path.display(), language = code, "document language set");
        Ok(())
    }

    /// Add an invisible OCR text layer to scanned pages and count heading
    /// candidates.
    ///
    /// Pages that already carry text, or have no images, are left alone.
    /// When OCR is disabled or its tools are missing, nothing is changed and
    /// all counts are zero.
    pub fn ocr_and_tag(
        &self,
        path: &Path,
        language_code: &str,
    ) -> Result<OcrOutcome, RemediationError> {
        if !self.settings.enabled {
            info!("OCR disabled by configuration");
            return Ok(OcrOutcome::default());
        }
        if !self.ocr.is_available() || !self.rasterizer.is_available() {
            info!("OCR backend unavailable, skipping");
            return Ok(OcrOutcome::default());
        }

        let mut doc = PdfDocument::open(path)?;
        let language = tesseract_language(language_code);
        let mut outcome = OcrOutcome::default();

        for page in 0..doc.page_count() {
            let has_text = doc
                .text_runs(page)
                .iter()
                .any(|run| !run.text.trim().is_empty());
            if has_text || doc.images(page).is_empty() {
                continue;
            }
            match self.ocr_page(&mut doc, path, page, language) {
                Ok(written) => {
                    debug!(page = page + 1, lines = written, "text layer added");
                    outcome.pages_processed += 1;
                }
                Err(e) => warn!(page = page + 1, error = %e, "OCR failed for page"),
            }
        }

        for page in 0..doc.page_count() {
            for run in doc.text_runs(page) {
                if !run.text.trim().is_empty() {
                    outcome.count(classify(run.font_size, run.bold));
                }
            }
        }

        if outcome.pages_processed > 0 {
            doc.save_atomic(path)?;
        }
        info!(
            path = %path.display(),
            pages = outcome.pages_processed,
            tags = outcome.tags_classified,
            "OCR complete"
        );
        Ok(outcome)
    }

    /// Lines written to the page.
    fn ocr_page(
        &self,
        doc: &mut PdfDocument,
        path: &Path,
        page: usize,
        language: &str,
    ) -> Result<usize, RemediationError> {
        let png = self.rasterizer.render_png(path, page, self.settings.scale)?;
        let text = self.ocr.recognize(&png, language)?;
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            return Err(RemediationError::Ocr("no text recognized".into()));
        }
        Ok(doc.append_invisible_text(page, &lines, self.layout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tag_shape() {
        for ok in ["en", "en-US", "zh-Hant-TW", "sr-Latn", "de-CH-1996"] {
            assert!(LANGUAGE_TAG.is_match(ok), "{ok}");
        }
        for bad in ["e", "en_US", "en-", "english language", "123", "en-toolongsubtag"] {
            assert!(!LANGUAGE_TAG.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn outcome_counts_classes() {
        let mut outcome = OcrOutcome::default();
        outcome.count(TagClass::H1);
        outcome.count(TagClass::H3);
        outcome.count(TagClass::Paragraph);
        outcome.count(TagClass::Paragraph);
        assert_eq!(outcome.tags_classified, 4);
        assert_eq!(outcome.headings, [1, 0, 1]);
        assert_eq!(outcome.paragraphs, 2);
    }

    #[test]
    fn settings_default_to_system_tools() {
        let settings = OcrSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.scale, 2.0);
        assert_eq!(settings.tesseract_bin, PathBuf::from("tesseract"));
    }
}
