//! Approximate Helvetica advance widths for line wrapping

/// Widths of ASCII 32..=126 in 1/1000 em, from the Helvetica AFM.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const DEFAULT_WIDTH: u16 = 556;
/// Helvetica-Bold runs roughly this much wider.
const BOLD_FACTOR: f64 = 1.06;

fn char_width(c: char) -> u16 {
    match c as u32 {
        code @ 32..=126 => HELVETICA[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in points.
pub(crate) fn text_width(text: &str, size: f64, bold: bool) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let width = f64::from(units) * size / 1000.0;
    if bold {
        width * BOLD_FACTOR
    } else {
        width
    }
}

/// Greedy word wrap. Always returns at least one (possibly empty) line.
pub(crate) fn wrap(text: &str, size: f64, bold: bool, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size, bold) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_widths() {
        assert_eq!(text_width(" ", 1000.0, false), 278.0);
        assert_eq!(text_width("W", 10.0, false), 9.44);
        assert!(text_width("Bold", 10.0, true) > text_width("Bold", 10.0, false));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("aaaa bbbb cccc", 10.0, false, 60.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap("a supercalifragilistic b", 10.0, false, 30.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap("   ", 10.0, false, 100.0), vec![String::new()]);
    }
}
