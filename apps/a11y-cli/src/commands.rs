//! Subcommand implementations
//!
//! Each command writes its user-facing output to `out`; logs go to stderr.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use a11y_engine::{score, severity_counts, AccessibilityEngine};
use a11y_remediate::Remediator;
use a11y_report::{render_report, ReportInput};
use a11y_types::{Finding, Severity, WCAG_RULES};
use anyhow::{bail, Context};
use clap::ValueEnum;
use pdf_access::{DocumentAccessor, PdfDocument};
use serde::Serialize;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    file: String,
    page_count: usize,
    score: u8,
    summary: a11y_engine::SeverityCounts,
    findings: &'a [Finding],
}

fn open(path: &Path) -> anyhow::Result<PdfDocument> {
    PdfDocument::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn remediator(config: &Config) -> anyhow::Result<Remediator> {
    if let Some(dir) = &config.ocr.work_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create work dir {}", dir.display()))?;
    }
    Ok(Remediator::new(config.ocr.clone()))
}

pub fn analyze(path: &Path, format: Format, out: &mut impl Write) -> anyhow::Result<()> {
    let doc = open(path)?;
    let findings = AccessibilityEngine::new().analyze(&doc);
    let score = score(&findings);

    match format {
        Format::Json => {
            let output = AnalysisOutput {
                file: display_name(path),
                page_count: doc.page_count(),
                score,
                summary: severity_counts(&findings),
                findings: &findings,
            };
            serde_json::to_writer_pretty(&mut *out, &output)?;
            writeln!(out)?;
        }
        Format::Text => {
            writeln!(
                out,
                "{}: {} issue(s), score {score}/100",
                display_name(path),
                findings.len()
            )?;
            for finding in &findings {
                let location = if finding.is_document_level() {
                    "document".to_string()
                } else {
                    format!("page {}", finding.page)
                };
                writeln!(
                    out,
                    "  {} [{}] {} {} ({location})",
                    finding.issue_id, finding.severity, finding.wcag_criterion, finding.title
                )?;
            }
        }
    }
    Ok(())
}

/// Score of a PDF, or of findings previously saved with `analyze --format json`.
pub fn score_command(
    file: Option<&Path>,
    findings_json: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let findings = match (file, findings_json) {
        (_, Some(json)) => read_findings(json)?,
        (Some(file), None) => AccessibilityEngine::new().analyze(&open(file)?),
        (None, None) => bail!("Pass a PDF file or --findings <json>"),
    };
    writeln!(out, "{}", score(&findings))?;
    Ok(())
}

/// Accepts either a bare array of findings or the `analyze --format json` object.
fn read_findings(path: &Path) -> anyhow::Result<Vec<Finding>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("Findings file is not valid JSON")?;
    let list = match value {
        serde_json::Value::Object(mut object) => object
            .remove("findings")
            .context("JSON object has no \"findings\" field")?,
        other => other,
    };
    serde_json::from_value(list).context("Failed to parse findings")
}

pub fn fix_title(path: &Path, title: &str, out: &mut impl Write) -> anyhow::Result<()> {
    Remediator::default()
        .fix_title(path, title)
        .with_context(|| format!("Failed to set title on {}", path.display()))?;
    writeln!(out, "Title set to \"{}\"", title.trim())?;
    Ok(())
}

pub fn fix_language(path: &Path, code: &str, out: &mut impl Write) -> anyhow::Result<()> {
    Remediator::default()
        .fix_language(path, code)
        .with_context(|| format!("Failed to set language on {}", path.display()))?;
    writeln!(out, "Language set to {}", code.trim())?;
    Ok(())
}

pub fn ocr(path: &Path, lang: &str, config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let outcome = remediator(config)?
        .ocr_and_tag(path, lang)
        .with_context(|| format!("OCR failed for {}", path.display()))?;
    writeln!(out, "Pages processed: {}", outcome.pages_processed)?;
    writeln!(
        out,
        "Text blocks classified: {} (H1 {}, H2 {}, H3 {}, paragraphs {})",
        outcome.tags_classified,
        outcome.headings[0],
        outcome.headings[1],
        outcome.headings[2],
        outcome.paragraphs
    )?;
    Ok(())
}

pub struct RemediateOptions<'a> {
    pub title: Option<&'a str>,
    pub lang: Option<&'a str>,
    pub ocr: bool,
}

/// Apply the requested fixes and report the score before and after.
pub fn remediate(
    path: &Path,
    options: RemediateOptions<'_>,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let engine = AccessibilityEngine::new();
    let before = engine.analyze(&open(path)?);
    let remediator = remediator(config)?;

    if let Some(title) = options.title {
        remediator.fix_title(path, title)?;
        writeln!(out, "Title set to \"{}\"", title.trim())?;
    }
    if let Some(lang) = options.lang {
        remediator.fix_language(path, lang)?;
        writeln!(out, "Language set to {}", lang.trim())?;
    }
    if options.ocr {
        let outcome = remediator.ocr_and_tag(path, options.lang.unwrap_or("en"))?;
        writeln!(out, "OCR pages processed: {}", outcome.pages_processed)?;
    }

    let after = engine.analyze(&open(path)?);
    info!(before = before.len(), after = after.len(), "remediation complete");
    writeln!(
        out,
        "Score: {} -> {} ({} -> {} issues)",
        score(&before),
        score(&after),
        before.len(),
        after.len()
    )?;
    Ok(())
}

/// Default report location: `<output_dir>/<stem>-accessibility-report.pdf`.
fn default_report_path(path: &Path, config: &Config) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    config
        .report
        .output_dir
        .join(format!("{stem}-accessibility-report.pdf"))
}

pub fn report(
    path: &Path,
    output: Option<&Path>,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<PathBuf> {
    let doc = open(path)?;
    let findings = AccessibilityEngine::new().analyze(&doc);
    let metadata = doc.metadata();
    let name = display_name(path);
    let input = ReportInput::new(&name, &findings, score(&findings), &metadata, doc.page_count());
    let bytes = render_report(&input).context("Failed to render report")?;

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_report_path(path, config));
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&target, bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    info!(path = %target.display(), findings = findings.len(), "report written");
    writeln!(out, "Report written to {}", target.display())?;
    Ok(target)
}

pub fn rules(out: &mut impl Write) -> anyhow::Result<()> {
    for rule in WCAG_RULES {
        writeln!(
            out,
            "{:<6} {:<2} {:<24} {}",
            rule.criterion,
            rule.level.to_string(),
            rule.title,
            rule.help_url
        )?;
    }
    writeln!(
        out,
        "\nSeverities: {}",
        Severity::ALL.map(|s| s.as_str()).join(", ")
    )?;
    Ok(())
}
