//! WCAG relative luminance and contrast ratio

use pdf_access::Rgb;

/// Minimum ratio for body text (1.4.3).
pub const NORMAL_TEXT_RATIO: f64 = 4.5;
/// Minimum ratio for large text (1.4.3).
pub const LARGE_TEXT_RATIO: f64 = 3.0;

/// Relative luminance of an sRGB colour, 0.0 (black) to 1.0 (white).
pub fn relative_luminance(color: Rgb) -> f64 {
    let (r, g, b) = color.to_unit();
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

fn linearize(channel: f64) -> f64 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Contrast ratio between two colours, 1.0 to 21.0, symmetric.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// 18pt and up, or 14pt and up when bold.
pub fn is_large_text(font_size: f64, bold: bool) -> bool {
    font_size >= 18.0 || (font_size >= 14.0 && bold)
}

pub fn required_ratio(font_size: f64, bold: bool) -> f64 {
    if is_large_text(font_size, bold) {
        LARGE_TEXT_RATIO
    } else {
        NORMAL_TEXT_RATIO
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastVerdict {
    pub ratio: f64,
    pub required: f64,
}

impl ContrastVerdict {
    pub fn passes(&self) -> bool {
        self.ratio >= self.required
    }
}

pub fn evaluate(text: Rgb, background: Rgb, font_size: f64, bold: bool) -> ContrastVerdict {
    ContrastVerdict {
        ratio: contrast_ratio(text, background),
        required: required_ratio(font_size, bold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn black_on_white_is_maximal() {
        assert!(close(contrast_ratio(Rgb::BLACK, Rgb::WHITE), 21.0));
        assert!(close(relative_luminance(Rgb::WHITE), 1.0));
        assert!(close(relative_luminance(Rgb::BLACK), 0.0));
    }

    #[test]
    fn light_gray_on_white_fails_body_text() {
        let verdict = evaluate(Rgb::new(217, 217, 217), Rgb::WHITE, 12.0, false);
        assert!(verdict.ratio < 1.5);
        assert!(!verdict.passes());
    }

    #[test]
    fn mid_gray_passes_only_as_large_text() {
        // #767676 is the classic 4.54:1 gray; #949494 sits near 3:1
        let gray = Rgb::new(0x94, 0x94, 0x94);
        let ratio = contrast_ratio(gray, Rgb::WHITE);
        assert!(ratio > 3.0 && ratio < 4.5, "ratio {ratio}");
        assert!(!evaluate(gray, Rgb::WHITE, 12.0, false).passes());
        assert!(evaluate(gray, Rgb::WHITE, 18.0, false).passes());
        assert!(evaluate(gray, Rgb::WHITE, 14.0, true).passes());
        assert!(!evaluate(gray, Rgb::WHITE, 14.0, false).passes());
    }

    #[test]
    fn large_text_thresholds() {
        assert!(is_large_text(18.0, false));
        assert!(!is_large_text(17.9, false));
        assert!(is_large_text(14.0, true));
        assert!(!is_large_text(13.9, true));
        assert_eq!(required_ratio(12.0, false), NORMAL_TEXT_RATIO);
        assert_eq!(required_ratio(24.0, false), LARGE_TEXT_RATIO);
    }

    fn any_rgb() -> impl Strategy<Value = Rgb> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
    }

    proptest! {
        #[test]
        fn ratio_is_symmetric_and_bounded(a in any_rgb(), b in any_rgb()) {
            let ab = contrast_ratio(a, b);
            prop_assert!(close(ab, contrast_ratio(b, a)));
            prop_assert!(ab >= 1.0 - 1e-9);
            prop_assert!(ab <= 21.0 + 1e-9);
        }

        #[test]
        fn same_colour_has_ratio_one(a in any_rgb()) {
            prop_assert!(close(contrast_ratio(a, a), 1.0));
        }
    }
}
