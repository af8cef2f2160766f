//! TOML configuration
//!
//! Every section is optional:
//!
//! ```toml
//! [ocr]
//! enabled = true
//! tesseract_bin = "tesseract"
//! pdftoppm_bin = "pdftoppm"
//! scale = 2.0
//! work_dir = "/tmp/pdf-a11y"
//!
//! [report]
//! output_dir = "."
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use a11y_remediate::OcrSettings;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where `report` writes when no `-o` is given
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}
