use std::collections::HashSet;

use a11y_types::{rules, Finding, Severity};
use pdf_access::{DocumentAccessor, FillRect, Rgb, TextRun};

use crate::contrast;
use crate::draft::Draft;

/// Runs below this size are skipped (footnote markers, hidden text).
const MIN_TEXT_SIZE: f64 = 8.0;
const SNIPPET_CHARS: usize = 100;

/// Colour of the last fill drawn under the run, white when none.
fn background_of(run: &TextRun, fills: &[FillRect]) -> Rgb {
    fills
        .iter()
        .rev()
        .find(|fill| fill.rect.contains(&run.bbox) || fill.rect.intersects(&run.bbox))
        .map_or(Rgb::WHITE, |fill| fill.color)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// 1.4.3: text against the fill beneath it.
///
/// Each (page, text colour, background colour) is judged once, by the
/// first run that uses it.
/// Invisible text (render mode 3) is not drawn and is skipped.
pub fn check_text_contrast(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut seen: HashSet<(usize, Rgb, Rgb)> = HashSet::new();

    for page in 0..doc.page_count() {
        let fills = doc.fills(page);
        for run in doc.text_runs(page) {
            if run.invisible || run.text.trim().is_empty() || run.font_size < MIN_TEXT_SIZE {
                continue;
            }
            let background = background_of(run, fills);
            let verdict = contrast::evaluate(run.color, background, run.font_size, run.bold);
            if !seen.insert((page, run.color, background)) || verdict.passes() {
                continue;
            }

            let severity = if verdict.ratio < contrast::LARGE_TEXT_RATIO {
                Severity::Serious
            } else {
                Severity::Moderate
            };
            let snippet: String = run.text.trim().chars().take(SNIPPET_CHARS).collect();
            findings.push(
                Draft::new(rules::CONTRAST_MINIMUM, severity, "Insufficient Colour Contrast")
                    .page(page)
                    .describe(format!(
                        "Text \"{}\" on page {} has a contrast ratio of {:.2}:1 against its \
                         background; at least {}:1 is required.",
                        snippet.chars().take(40).collect::<String>(),
                        page + 1,
                        verdict.ratio,
                        verdict.required
                    ))
                    .remedy(format!(
                        "Darken the text or lighten the background until the ratio reaches \
                         {}:1. A contrast analyser can check colour pairs.",
                        verdict.required
                    ))
                    .rect(run.bbox)
                    .info("type", "text")
                    .info("text", snippet)
                    .info("text_color", run.color.to_hex())
                    .info("bg_color", background.to_hex())
                    .info("contrast_ratio", round_to(verdict.ratio, 2))
                    .info("required_ratio", verdict.required)
                    .info("font_size", round_to(run.font_size, 1))
                    .build(),
            );
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11y_types::Rect;

    fn run(bbox: Rect) -> TextRun {
        TextRun {
            text: "Hello".into(),
            bbox,
            font_size: 12.0,
            font_name: "Helvetica".into(),
            bold: false,
            color: Rgb::BLACK,
            invisible: false,
        }
    }

    #[test]
    fn last_overlapping_fill_wins() {
        let text = run(Rect::new(72.0, 700.0, 120.0, 712.0));
        let fills = [
            FillRect {
                rect: Rect::new(0.0, 0.0, 612.0, 792.0),
                color: Rgb::new(10, 10, 10),
            },
            FillRect {
                rect: Rect::new(60.0, 690.0, 200.0, 720.0),
                color: Rgb::new(200, 0, 0),
            },
            FillRect {
                rect: Rect::new(300.0, 300.0, 400.0, 400.0),
                color: Rgb::new(0, 0, 200),
            },
        ];
        assert_eq!(background_of(&text, &fills), Rgb::new(200, 0, 0));
    }

    #[test]
    fn no_fill_means_white() {
        let text = run(Rect::new(72.0, 700.0, 120.0, 712.0));
        assert_eq!(background_of(&text, &[]), Rgb::WHITE);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(1.4349, 2), 1.43);
        assert_eq!(round_to(11.96, 1), 12.0);
    }
}
