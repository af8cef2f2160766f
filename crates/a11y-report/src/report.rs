use a11y_engine::severity_counts;
use a11y_types::{Finding, Severity};
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use pdf_access::text::encode_text_string;
use pdf_access::DocumentMetadata;
use tracing::debug;

use crate::canvas::{Canvas, Color, Style, CONTENT_W, MARGIN, MUTED, PAGE_H, PAGE_W};
use crate::error::ReportError;

const HEADER_BG: Color = (0.16, 0.30, 0.46);
const HEADER_FG: Color = (1.0, 1.0, 1.0);
const PASS: Color = (0.13, 0.55, 0.13);

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => (0.80, 0.13, 0.13),
        Severity::Serious => (0.90, 0.49, 0.13),
        Severity::Moderate => (0.85, 0.65, 0.13),
        Severity::Minor => (0.40, 0.40, 0.40),
        Severity::Unrecognized => (0.20, 0.20, 0.20),
    }
}

fn score_color(score: u8) -> Color {
    match score {
        80.. => PASS,
        50..=79 => severity_color(Severity::Moderate),
        _ => severity_color(Severity::Critical),
    }
}

/// Everything the report shows.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    /// Name of the audited file as shown to the reader.
    pub filename: &'a str,
    pub findings: &'a [Finding],
    pub score: u8,
    pub metadata: &'a DocumentMetadata,
    pub page_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl<'a> ReportInput<'a> {
    /// Input stamped with the current time.
    pub fn new(
        filename: &'a str,
        findings: &'a [Finding],
        score: u8,
        metadata: &'a DocumentMetadata,
        page_count: usize,
    ) -> Self {
        Self {
            filename,
            findings,
            score,
            metadata,
            page_count,
            generated_at: Utc::now(),
        }
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }
}

/// Render the audit summary as PDF bytes.
///
/// Output depends only on the input, timestamp included.
pub fn render_report(input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError> {
    let footer = format!(
        "PDF Accessibility Report - generated {}",
        input.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let mut canvas = Canvas::new(footer);

    draw_header(&mut canvas, input);
    draw_score(&mut canvas, input.score);
    draw_summary(&mut canvas, input.findings);
    draw_findings(&mut canvas, input.findings);

    let pages = canvas.finish();
    debug!(pages = pages.len(), findings = input.findings.len(), "report laid out");
    assemble(
        pages,
        &format!("Accessibility Report - {}", input.filename),
        input.generated_at,
    )
}

fn draw_header(canvas: &mut Canvas, input: &ReportInput<'_>) {
    let top = canvas.y;
    canvas.fill_rect(MARGIN, top, CONTENT_W, 48.0, HEADER_BG);
    canvas.text_at(MARGIN + 12.0, top + 30.0, 20.0, true, HEADER_FG, "PDF Accessibility Report");
    canvas.y += 60.0;

    let bold = Style {
        size: 11.0,
        bold: true,
        ..Style::default()
    };
    canvas.write(&format!("File: {}", input.filename), bold);
    canvas.write(&format!("Pages: {}", input.page_count), Style::default());
    let title = input
        .metadata
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("(none)");
    canvas.write(&format!("Document Title: {title}"), Style::default());
    canvas.y += 4.0;
}

fn draw_score(canvas: &mut Canvas, score: u8) {
    canvas.rule();
    canvas.write(
        &format!("Accessibility Score: {score} / 100"),
        Style {
            size: 14.0,
            bold: true,
            color: score_color(score),
            ..Style::default()
        },
    );
    canvas.y += 4.0;
}

fn draw_summary(canvas: &mut Canvas, findings: &[Finding]) {
    canvas.rule();
    canvas.write(
        "Issue Summary",
        Style {
            size: 12.0,
            bold: true,
            ..Style::default()
        },
    );
    canvas.y += 2.0;

    let counts = severity_counts(findings);
    for severity in Severity::ALL {
        canvas.write(
            &format!("{}: {}", severity.label(), counts.get(severity)),
            Style {
                color: severity_color(severity),
                indent: 8.0,
                ..Style::default()
            },
        );
    }
    canvas.write(
        &format!("Total: {}", findings.len()),
        Style {
            bold: true,
            indent: 8.0,
            ..Style::default()
        },
    );
    canvas.y += 6.0;
}

fn draw_findings(canvas: &mut Canvas, findings: &[Finding]) {
    canvas.rule();
    canvas.write(
        "Detailed Issues",
        Style {
            size: 13.0,
            bold: true,
            ..Style::default()
        },
    );
    canvas.y += 4.0;

    if findings.is_empty() {
        canvas.write(
            "No accessibility issues were detected. This PDF appears to meet WCAG 2.1 AA \
             requirements for the checks performed.",
            Style {
                color: PASS,
                ..Style::default()
            },
        );
        return;
    }

    let detail = Style {
        size: 9.0,
        indent: 12.0,
        ..Style::default()
    };
    for (index, finding) in findings.iter().enumerate() {
        // Keep the heading with at least one line of detail.
        canvas.ensure_space(50.0);
        canvas.write(
            &format!("{}. [{}] {}", index + 1, finding.severity.label(), finding.title),
            Style {
                bold: true,
                color: severity_color(finding.severity),
                ..Style::default()
            },
        );

        let location = if finding.is_document_level() {
            "Document-level".to_string()
        } else {
            format!("Page {}", finding.page)
        };
        canvas.write(
            &format!(
                "WCAG {} - {}  |  {location}",
                finding.wcag_criterion, finding.wcag_title
            ),
            Style {
                size: 8.0,
                color: MUTED,
                ..detail
            },
        );
        if !finding.description.is_empty() {
            canvas.write(&finding.description, detail);
        }
        if !finding.remediation.is_empty() {
            canvas.write(
                &format!("How to fix: {}", finding.remediation),
                Style {
                    color: MUTED,
                    ..detail
                },
            );
        }
        canvas.y += 4.0;
    }
}

fn assemble(
    pages: Vec<Vec<Operation>>,
    title: &str,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| ReportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (PAGE_W as i64).into(), (PAGE_H as i64).into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Lang" => Object::string_literal("en"),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => encode_text_string(title),
        "Producer" => Object::string_literal("pdf-a11y"),
        "CreationDate" => Object::string_literal(
            generated_at.format("D:%Y%m%d%H%M%SZ").to_string()
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ReportError::Save(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bands() {
        assert_eq!(score_color(100), PASS);
        assert_eq!(score_color(80), PASS);
        assert_eq!(score_color(79), severity_color(Severity::Moderate));
        assert_eq!(score_color(50), severity_color(Severity::Moderate));
        assert_eq!(score_color(49), severity_color(Severity::Critical));
    }
}
