use a11y_engine::{score, AccessibilityEngine};
use a11y_types::{Finding, Rect, Severity};
use pdf_access::testing::FixtureBuilder;
use pdf_access::{PdfDocument, Rgb};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn analyze(builder: &FixtureBuilder) -> Vec<Finding> {
    let doc = PdfDocument::load_mem(&builder.build()).expect("fixture loads");
    AccessibilityEngine::new().analyze(&doc)
}

fn only(findings: &[Finding], criterion: &str) -> Vec<Finding> {
    findings
        .iter()
        .filter(|f| f.wcag_criterion == criterion)
        .cloned()
        .collect()
}

/// A document that passes every check.
fn clean() -> FixtureBuilder {
    FixtureBuilder::new()
        .title("Quarterly Report")
        .language("en-US")
        .tagged()
}

#[test]
fn clean_document_scores_full_marks() {
    let findings = analyze(&clean());
    assert_eq!(findings, Vec::<Finding>::new());
    assert_eq!(score(&findings), 100);
}

#[test]
fn missing_title_is_one_auto_fixable_finding() {
    let findings = only(&analyze(&FixtureBuilder::new()), "2.4.2");
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.title, "Missing Document Title");
    assert_eq!(finding.wcag_title, "Page Titled");
    assert_eq!(finding.severity, Severity::Serious);
    assert_eq!(finding.page, 0);
    assert!(finding.auto_fixable);

    assert!(only(&analyze(&FixtureBuilder::new().title("Report")), "2.4.2").is_empty());
    assert_eq!(only(&analyze(&FixtureBuilder::new().title("   ")), "2.4.2").len(), 1);
}

#[test]
fn missing_language() {
    let findings = only(&analyze(&FixtureBuilder::new()), "3.1.1");
    assert_eq!(findings.len(), 1);
    assert!(findings[0].auto_fixable);
    assert!(only(&analyze(&FixtureBuilder::new().language("fr")), "3.1.1").is_empty());
}

#[test]
fn untagged_document_is_critical() {
    let findings = only(&analyze(&FixtureBuilder::new()), "1.3.1");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].title, "PDF is Not Tagged");
    assert!(only(&analyze(&clean()), "1.3.1").is_empty());
}

#[test]
fn bookmarks_only_matter_for_multi_page_documents() {
    assert!(only(&analyze(&FixtureBuilder::new()), "2.4.5").is_empty());

    let findings = only(&analyze(&FixtureBuilder::new().pages(3)), "2.4.5");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].element_info["page_count"], 3);

    let with_outline = FixtureBuilder::new().pages(3).bookmark("Introduction");
    assert!(only(&analyze(&with_outline), "2.4.5").is_empty());
}

#[test]
fn untagged_image_is_critical() {
    let builder = FixtureBuilder::new().image(0, 200, 100, Rect::new(100.0, 300.0, 300.0, 400.0));
    let findings = only(&analyze(&builder), "1.1.1");
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.severity, Severity::Critical);
    assert_eq!(finding.page, 1);
    assert_eq!(finding.element_info["type"], "image");
    assert_eq!(finding.element_info["width"], 200);
    assert_eq!(finding.element_info["height"], 100);
    assert_eq!(finding.rect, Some(Rect::new(100.0, 300.0, 300.0, 400.0)));
}

#[test]
fn tagged_image_without_alt_is_serious() {
    let builder = clean().image(0, 64, 64, Rect::new(100.0, 300.0, 164.0, 364.0));
    let findings = only(&analyze(&builder), "1.1.1");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Serious);
}

#[test]
fn figure_alt_text_covers_the_image() {
    let builder = clean().image_with_alt(
        0,
        64,
        64,
        Rect::new(100.0, 300.0, 164.0, 364.0),
        "Company logo",
    );
    assert!(only(&analyze(&builder), "1.1.1").is_empty());
}

#[test]
fn thin_image_is_still_checked() {
    // Only images small in both directions are skipped.
    let builder = FixtureBuilder::new().image(0, 8, 40, Rect::new(10.0, 10.0, 18.0, 50.0));
    assert_eq!(only(&analyze(&builder), "1.1.1").len(), 1);
}

#[test]
fn light_gray_text_fails_contrast() {
    let builder = clean().styled_text(
        0,
        72.0,
        600.0,
        12.0,
        "Faint disclaimer",
        Rgb::new(217, 217, 217),
        false,
    );
    let findings = only(&analyze(&builder), "1.4.3");
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.severity, Severity::Serious);
    assert_eq!(finding.title, "Insufficient Colour Contrast");
    assert_eq!(finding.element_info["text"], "Faint disclaimer");
    assert_eq!(finding.element_info["text_color"], "#D9D9D9");
    assert_eq!(finding.element_info["bg_color"], "#FFFFFF");
    assert_eq!(finding.element_info["required_ratio"], 4.5);
    assert_eq!(finding.element_info["font_size"], 12.0);
    let ratio = finding.element_info["contrast_ratio"].as_f64().unwrap();
    assert!(ratio < 4.5);
}

#[test]
fn black_text_passes_contrast() {
    let builder = clean().styled_text(0, 72.0, 600.0, 12.0, "Body", Rgb::BLACK, false);
    assert!(only(&analyze(&builder), "1.4.3").is_empty());
}

#[test]
fn contrast_findings_dedupe_by_colour_pair() {
    let gray = Rgb::new(200, 200, 200);
    let builder = clean()
        .styled_text(0, 72.0, 600.0, 12.0, "First", gray, false)
        .styled_text(0, 72.0, 580.0, 12.0, "Second", gray, false)
        .pages(2)
        .heading("H1")
        .bookmark("Start")
        .styled_text(1, 72.0, 600.0, 12.0, "Third", gray, false);
    let findings = only(&analyze(&builder), "1.4.3");
    let pages: Vec<u32> = findings.iter().map(|f| f.page).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[test]
fn tiny_text_is_ignored() {
    let builder = clean().styled_text(0, 72.0, 600.0, 6.0, "fine print", Rgb::new(230, 230, 230), false);
    assert!(only(&analyze(&builder), "1.4.3").is_empty());
}

#[test]
fn text_on_dark_fill_uses_fill_as_background() {
    let builder = clean()
        .fill(0, Rect::new(50.0, 550.0, 400.0, 650.0), Rgb::BLACK)
        .styled_text(0, 72.0, 600.0, 12.0, "Inverted", Rgb::WHITE, false)
        .styled_text(0, 72.0, 570.0, 12.0, "Dim", Rgb::new(40, 40, 40), false);
    let findings = only(&analyze(&builder), "1.4.3");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].element_info["text"], "Dim");
    assert_eq!(findings[0].element_info["bg_color"], "#000000");
}

#[test]
fn large_mid_gray_text_is_moderate_or_passes() {
    let gray = Rgb::new(0x94, 0x94, 0x94);
    let passes = clean().styled_text(0, 72.0, 600.0, 20.0, "Big heading", gray, false);
    assert!(only(&analyze(&passes), "1.4.3").is_empty());

    let fails = clean().styled_text(0, 72.0, 600.0, 12.0, "Small print", gray, false);
    let findings = only(&analyze(&fails), "1.4.3");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Moderate);
}

#[test]
fn first_run_of_a_colour_pair_decides_the_page() {
    let gray = Rgb::new(0x94, 0x94, 0x94);
    let heading_first = clean()
        .styled_text(0, 72.0, 640.0, 20.0, "Quarterly results", gray, false)
        .styled_text(0, 72.0, 600.0, 12.0, "Revenue grew in every region.", gray, false);
    assert!(only(&analyze(&heading_first), "1.4.3").is_empty());

    let body_first = clean()
        .styled_text(0, 72.0, 640.0, 12.0, "Revenue grew in every region.", gray, false)
        .styled_text(0, 72.0, 600.0, 20.0, "Quarterly results", gray, false);
    let findings = only(&analyze(&body_first), "1.4.3");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].element_info["text"], "Revenue grew in every region.");
}

#[test]
fn unnamed_form_field_is_critical() {
    let builder = clean()
        .widget(0, Rect::new(100.0, 100.0, 250.0, 120.0), None, None)
        .widget(0, Rect::new(100.0, 140.0, 250.0, 160.0), None, Some("Email address"))
        .widget(0, Rect::new(100.0, 180.0, 250.0, 200.0), Some("phone"), None);
    let findings = only(&analyze(&builder), "4.1.2");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].element_info["type"], "form_field");
    assert_eq!(findings[0].element_info["field_type"], "Text");
    assert_eq!(findings[0].element_info["page"], 1);
}

#[test]
fn generic_link_text_is_flagged() {
    let builder = clean()
        .text(0, 72.0, 600.0, 12.0, "click here")
        .link(0, Rect::new(70.0, 596.0, 135.0, 610.0), "https://example.com/a")
        .text(0, 72.0, 500.0, 12.0, "Annual report")
        .link(0, Rect::new(70.0, 496.0, 150.0, 510.0), "https://example.com/b");
    let findings = only(&analyze(&builder), "2.4.4");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].element_info["text"], "click here");
    assert_eq!(findings[0].element_info["uri"], "https://example.com/a");
}

#[test]
fn link_without_text_is_flagged() {
    let builder = clean().link(0, Rect::new(300.0, 100.0, 400.0, 120.0), "https://example.com");
    let findings = only(&analyze(&builder), "2.4.4");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].element_info["text"], "");
}

#[test]
fn tagged_multi_page_needs_headings() {
    let base = clean().pages(2).bookmark("Start");
    assert_eq!(only(&analyze(&base), "2.4.6").len(), 1);
    assert!(only(&analyze(&base.clone().heading("H1")), "2.4.6").is_empty());
    assert!(only(&analyze(&base.heading_with_role("Title1", "H2")), "2.4.6").is_empty());

    // Untagged or single-page documents are not checked.
    assert!(only(&analyze(&FixtureBuilder::new().pages(2)), "2.4.6").is_empty());
    assert!(only(&analyze(&clean()), "2.4.6").is_empty());
}

#[test]
fn row_tab_order_is_flagged_per_page() {
    let builder = clean().pages(2).bookmark("Start").heading("H1").tabs("R");
    let findings = only(&analyze(&builder), "1.3.2");
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].page, 1);
    assert_eq!(findings[1].page, 2);
    assert_eq!(findings[0].element_info["tab_order"], "/R");

    assert!(only(&analyze(&clean().tabs("S")), "1.3.2").is_empty());
    assert!(only(&analyze(&FixtureBuilder::new().tabs("R")), "1.3.2").is_empty());
}

#[test]
fn analysis_is_deterministic() {
    let builder = FixtureBuilder::new()
        .pages(2)
        .image(1, 50, 50, Rect::new(0.0, 0.0, 50.0, 50.0))
        .styled_text(0, 72.0, 600.0, 12.0, "Pale", Rgb::new(220, 220, 220), false)
        .widget(1, Rect::new(10.0, 10.0, 60.0, 30.0), None, None);
    let doc = PdfDocument::load_mem(&builder.build()).unwrap();
    let engine = AccessibilityEngine::new();
    assert_eq!(engine.analyze(&doc), engine.analyze(&doc));
}

#[test]
fn findings_serialize_flat() {
    let findings = analyze(&FixtureBuilder::new());
    let json = serde_json::to_value(&findings[0]).unwrap();
    assert_eq!(json["issue_id"], "issue-0001");
    assert_eq!(json["wcag_criterion"], "2.4.2");
    assert_eq!(json["severity"], "serious");
    assert_eq!(json["level"], "A");
    assert_eq!(json["rect"], serde_json::Value::Null);
}

#[test]
fn analyze_path_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.pdf");
    clean().write_to(&path).unwrap();
    let findings = AccessibilityEngine::new().analyze_path(&path).unwrap();
    assert!(findings.is_empty());

    assert!(AccessibilityEngine::new()
        .analyze_path(dir.path().join("missing.pdf"))
        .is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn small_images_never_need_alt_text(width in 1u32..16, height in 1u32..16) {
        let builder = FixtureBuilder::new().image(
            0,
            width,
            height,
            Rect::new(10.0, 10.0, 10.0 + f64::from(width), 10.0 + f64::from(height)),
        );
        prop_assert!(only(&analyze(&builder), "1.1.1").is_empty());
    }
}
