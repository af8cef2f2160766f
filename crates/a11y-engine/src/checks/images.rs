use std::collections::HashSet;

use a11y_types::{rules, Finding, Severity};
use pdf_access::{ContentItem, DocumentAccessor, ImageRef, StructElement};

use super::is_tagged;
use crate::draft::Draft;

/// Images under this size in both dimensions are treated as decorative.
const MIN_IMAGE_SIDE: u32 = 16;

/// Content that some `Figure` with alternative text points at.
#[derive(Debug, Default)]
struct AltCoverage {
    objects: HashSet<u32>,
    marked: HashSet<(usize, i64)>,
    /// MCIDs whose page could not be resolved; they match on any page.
    unplaced: HashSet<i64>,
}

impl AltCoverage {
    fn collect(elements: &[StructElement]) -> Self {
        let mut coverage = Self::default();
        let figures = elements.iter().filter(|e| {
            e.role == "Figure"
                && e.has_kids
                && e.alt.as_deref().is_some_and(|alt| !alt.trim().is_empty())
        });
        for figure in figures {
            for item in &figure.content {
                match *item {
                    ContentItem::Object(number) => {
                        coverage.objects.insert(number);
                    }
                    ContentItem::MarkedContent { page: Some(page), mcid } => {
                        coverage.marked.insert((page, mcid));
                    }
                    ContentItem::MarkedContent { page: None, mcid } => {
                        coverage.unplaced.insert(mcid);
                    }
                    ContentItem::Element(_) => {}
                }
            }
        }
        coverage
    }

    fn covers(&self, page: usize, image: &ImageRef) -> bool {
        self.objects.contains(&image.object_number)
            || image.mcid.is_some_and(|mcid| {
                self.marked.contains(&(page, mcid)) || self.unplaced.contains(&mcid)
            })
    }
}

/// 1.1.1: images need alternative text through a tagged `Figure`.
pub fn check_image_alt_text(doc: &dyn DocumentAccessor) -> Vec<Finding> {
    let tagged = is_tagged(doc);
    let coverage = if tagged {
        AltCoverage::collect(&doc.struct_elements())
    } else {
        AltCoverage::default()
    };
    let severity = if tagged {
        Severity::Serious
    } else {
        Severity::Critical
    };

    let mut findings = Vec::new();
    for page in 0..doc.page_count() {
        for image in doc.images(page) {
            if image.width < MIN_IMAGE_SIDE && image.height < MIN_IMAGE_SIDE {
                continue;
            }
            if tagged && coverage.covers(page, image) {
                continue;
            }

            let description = if tagged {
                format!(
                    "An image on page {} is not covered by a Figure tag with alternative text.",
                    page + 1
                )
            } else {
                format!(
                    "An image on page {} has no alternative text. The document is untagged, \
                     so it cannot carry any.",
                    page + 1
                )
            };
            findings.push(
                Draft::new(rules::NON_TEXT_CONTENT, severity, "Image Missing Alternative Text")
                    .page(page)
                    .describe(description)
                    .remedy(
                        "Tag the image as a Figure with Alt text describing its content, or \
                         mark it as an artifact if it is purely decorative.",
                    )
                    .rect(image.rect)
                    .info("type", "image")
                    .info("page", page + 1)
                    .info("xref", image.object_number)
                    .info("width", image.width)
                    .info("height", image.height)
                    .build(),
            );
        }
    }
    findings
}
