//! Font dictionaries: glyph widths, bold detection and code to Unicode mapping

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};
use tracing::debug;

use crate::objects::{as_dict, get, get_array, get_dict, get_int, get_name, get_number, number, resolve};
use crate::text::decode_win_ansi_byte;

/// Width used when a font carries no metrics (em fraction).
const DEFAULT_WIDTH: f64 = 0.5;
const MONOSPACE_WIDTH: f64 = 0.6;
const FORCE_BOLD_FLAG: i64 = 1 << 18;
const MAX_RANGE: u32 = 0xFFFF;

#[derive(Debug, Clone)]
pub(crate) struct Glyph {
    pub text: String,
    /// Advance in em units (1.0 = font size).
    pub width: f64,
    /// Single-byte code 32, which receives word spacing.
    pub is_space_code: bool,
}

#[derive(Debug, Clone)]
enum Widths {
    Uniform(f64),
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Cid {
        default: f64,
        widths: HashMap<u32, f64>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct FontInfo {
    pub name: String,
    pub bold: bool,
    code_bytes: usize,
    widths: Widths,
    to_unicode: Option<HashMap<u32, String>>,
}

impl FontInfo {
    /// Used when `Tf` names a font that cannot be found.
    pub fn fallback() -> Self {
        Self {
            name: "Unknown".to_string(),
            bold: false,
            code_bytes: 1,
            widths: Widths::Uniform(DEFAULT_WIDTH),
            to_unicode: None,
        }
    }

    pub fn from_dict(doc: &Document, font: &Dictionary) -> Self {
        let raw_name = get_name(doc, font, b"BaseFont").unwrap_or_else(|| "Unknown".to_string());
        // Subset fonts carry a six-letter tag: ABCDEF+Helvetica
        let name = match raw_name.split_once('+') {
            Some((tag, rest)) if tag.len() == 6 => rest.to_string(),
            _ => raw_name,
        };
        let is_type0 = get_name(doc, font, b"Subtype").as_deref() == Some("Type0");

        let descendant = if is_type0 {
            get_array(doc, font, b"DescendantFonts")
                .and_then(|kids| kids.first())
                .and_then(|kid| resolve(doc, kid))
                .and_then(as_dict)
        } else {
            None
        };
        let metrics_dict = descendant.unwrap_or(font);
        let descriptor = get_dict(doc, metrics_dict, b"FontDescriptor");

        let bold = name_looks_bold(&name)
            || descriptor.is_some_and(|d| {
                get_number(doc, d, b"FontWeight").is_some_and(|w| w >= 700.0)
                    || get_int(doc, d, b"Flags").is_some_and(|f| f & FORCE_BOLD_FLAG != 0)
            });

        let widths = if is_type0 {
            cid_widths(doc, metrics_dict)
        } else {
            simple_widths(doc, font, descriptor, &name)
        };

        let to_unicode = get(doc, font, b"ToUnicode").and_then(|obj| match obj {
            Object::Stream(stream) => {
                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                Some(parse_cmap(&data))
            }
            _ => None,
        });

        Self {
            name,
            bold,
            code_bytes: if is_type0 { 2 } else { 1 },
            widths,
            to_unicode,
        }
    }

    /// Split a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        bytes
            .chunks(self.code_bytes)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                let text = match self.to_unicode.as_ref().and_then(|map| map.get(&code)) {
                    Some(mapped) => mapped.clone(),
                    None if self.code_bytes == 1 => decode_win_ansi_byte(chunk[0]).to_string(),
                    None => char::from_u32(code).unwrap_or('\u{FFFD}').to_string(),
                };
                Glyph {
                    text,
                    width: self.width_of(code),
                    is_space_code: self.code_bytes == 1 && code == 32,
                }
            })
            .collect()
    }

    fn width_of(&self, code: u32) -> f64 {
        match &self.widths {
            Widths::Uniform(w) => *w,
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid { default, widths } => widths.get(&code).copied().unwrap_or(*default),
        }
    }
}

fn name_looks_bold(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["bold", "black", "heavy"].iter().any(|w| lower.contains(w))
}

fn simple_widths(
    doc: &Document,
    font: &Dictionary,
    descriptor: Option<&Dictionary>,
    name: &str,
) -> Widths {
    let fallback = if name.to_ascii_lowercase().contains("courier") {
        MONOSPACE_WIDTH
    } else {
        DEFAULT_WIDTH
    };
    let Some(widths) = get_array(doc, font, b"Widths") else {
        return Widths::Uniform(fallback);
    };
    let first_char = get_int(doc, font, b"FirstChar").unwrap_or(0).max(0) as u32;
    let missing = descriptor
        .and_then(|d| get_number(doc, d, b"MissingWidth"))
        .filter(|w| *w > 0.0)
        .map(|w| w / 1000.0)
        .unwrap_or(fallback);
    Widths::Simple {
        first_char,
        widths: widths
            .iter()
            .map(|w| {
                resolve(doc, w)
                    .and_then(number)
                    .map(|v| v / 1000.0)
                    .unwrap_or(missing)
            })
            .collect(),
        missing,
    }
}

/// Parse a CIDFont `/W` array: `c [w1 w2 ...]` and `c_first c_last w` forms.
fn cid_widths(doc: &Document, cid_font: &Dictionary) -> Widths {
    let default = get_number(doc, cid_font, b"DW").unwrap_or(1000.0) / 1000.0;
    let mut widths = HashMap::new();
    if let Some(items) = get_array(doc, cid_font, b"W") {
        let mut i = 0;
        while i < items.len() {
            let Some(start) = resolve(doc, &items[i]).and_then(number).and_then(cid_of) else {
                break;
            };
            match items.get(i + 1).and_then(|o| resolve(doc, o)) {
                Some(Object::Array(list)) => {
                    for (offset, w) in list.iter().enumerate() {
                        let Some(cid) =
                            u32::try_from(offset).ok().and_then(|o| start.checked_add(o))
                        else {
                            break;
                        };
                        if let Some(w) = resolve(doc, w).and_then(number) {
                            widths.insert(cid, w / 1000.0);
                        }
                    }
                    i += 2;
                }
                Some(end) => {
                    let (Some(end), Some(w)) = (
                        number(end),
                        items.get(i + 2).and_then(|o| resolve(doc, o)).and_then(number),
                    ) else {
                        break;
                    };
                    let Some(end) = cid_of(end) else {
                        break;
                    };
                    let end = end.min(start.saturating_add(MAX_RANGE));
                    for cid in start..=end {
                        widths.insert(cid, w / 1000.0);
                    }
                    i += 3;
                }
                None => break,
            }
        }
    }
    Widths::Cid { default, widths }
}

/// A CID from a `/W` entry, `None` when it does not fit in `u32`.
fn cid_of(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}

#[derive(Debug, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    Open,
    Close,
    Word(String),
}

fn tokenize(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let c = data[i];
        match c {
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if data.get(i + 1) == Some(&b'<') => {
                tokens.push(Token::Word("<<".into()));
                i += 2;
            }
            b'>' if data.get(i + 1) == Some(&b'>') => {
                tokens.push(Token::Word(">>".into()));
                i += 2;
            }
            b'<' => {
                let start = i + 1;
                let end = data[start..]
                    .iter()
                    .position(|&b| b == b'>')
                    .map_or(data.len(), |p| start + p);
                let digits: Vec<u8> = data[start..end]
                    .iter()
                    .copied()
                    .filter(u8::is_ascii_hexdigit)
                    .collect();
                tokens.push(Token::Hex(hex_bytes(&digits)));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b']' => {
                tokens.push(Token::Close);
                i += 1;
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < data.len()
                    && !data[i].is_ascii_whitespace()
                    && !matches!(data[i], b'<' | b'>' | b'[' | b']' | b'%')
                {
                    i += 1;
                }
                if i == start {
                    i += 1;
                    continue;
                }
                tokens.push(Token::Word(String::from_utf8_lossy(&data[start..i]).into_owned()));
            }
        }
    }
    tokens
}

fn hex_bytes(digits: &[u8]) -> Vec<u8> {
    let value = |d: u8| match d {
        b'0'..=b'9' => d - b'0',
        b'a'..=b'f' => d - b'a' + 10,
        _ => d - b'A' + 10,
    };
    digits
        .chunks(2)
        .map(|pair| {
            let hi = value(pair[0]);
            let lo = pair.get(1).map_or(0, |&d| value(d));
            (hi << 4) | lo
        })
        .collect()
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn utf16_text(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
        .collect();
    char::decode_utf16(units)
        .map(|r| r.unwrap_or('\u{FFFD}'))
        .collect()
}

/// Destination string offset from its base by `offset` in the last unit.
fn offset_text(base: &[u8], offset: u32) -> String {
    let mut bytes = base.to_vec();
    if bytes.len() >= 2 {
        let n = bytes.len();
        let last = u16::from_be_bytes([bytes[n - 2], bytes[n - 1]]).wrapping_add(offset as u16);
        bytes[n - 2..].copy_from_slice(&last.to_be_bytes());
    }
    utf16_text(&bytes)
}

/// Parse the `bfchar`/`bfrange` sections of a ToUnicode CMap.
pub(crate) fn parse_cmap(data: &[u8]) -> HashMap<u32, String> {
    let tokens = tokenize(data);
    let mut map = HashMap::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(w) if w == "beginbfchar" => {
                i += 1;
                while let (Some(Token::Hex(src)), Some(Token::Hex(dst))) =
                    (tokens.get(i), tokens.get(i + 1))
                {
                    map.insert(code_of(src), utf16_text(dst));
                    i += 2;
                }
            }
            Token::Word(w) if w == "beginbfrange" => {
                i += 1;
                while let (Some(Token::Hex(lo)), Some(Token::Hex(hi))) =
                    (tokens.get(i), tokens.get(i + 1))
                {
                    let (lo, hi) = (code_of(lo), code_of(hi));
                    if hi < lo || hi - lo > MAX_RANGE {
                        debug!(lo, hi, "skipping implausible bfrange");
                    }
                    match tokens.get(i + 2) {
                        Some(Token::Hex(dst)) => {
                            if hi >= lo && hi - lo <= MAX_RANGE {
                                for code in lo..=hi {
                                    map.insert(code, offset_text(dst, code - lo));
                                }
                            }
                            i += 3;
                        }
                        Some(Token::Open) => {
                            let mut j = i + 3;
                            let mut code = lo;
                            while let Some(Token::Hex(dst)) = tokens.get(j) {
                                if code <= hi {
                                    map.insert(code, utf16_text(dst));
                                }
                                code = code.saturating_add(1);
                                j += 1;
                            }
                            // skip the closing bracket
                            i = j + 1;
                        }
                        _ => break,
                    }
                }
            }
            _ => i += 1,
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_bold_font_is_bold() {
        let doc = Document::with_version("1.7");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        };
        let info = FontInfo::from_dict(&doc, &font);
        assert!(info.bold);
        assert_eq!(info.name, "Helvetica-Bold");
        assert_eq!(info.decode(b"Hi").len(), 2);
        assert_eq!(info.decode(b"H")[0].width, DEFAULT_WIDTH);
    }

    #[test]
    fn subset_prefix_is_stripped_and_widths_read() {
        let doc = Document::with_version("1.7");
        let font = dictionary! {
            "Subtype" => "TrueType",
            "BaseFont" => "ABCDEF+Arial",
            "FirstChar" => 65,
            "Widths" => vec![600.into(), 700.into()],
        };
        let info = FontInfo::from_dict(&doc, &font);
        assert_eq!(info.name, "Arial");
        assert!(!info.bold);
        let glyphs = info.decode(b"AB ");
        assert_eq!(glyphs[0].width, 0.6);
        assert_eq!(glyphs[1].width, 0.7);
        assert_eq!(glyphs[2].width, DEFAULT_WIDTH);
        assert!(glyphs[2].is_space_code);
    }

    #[test]
    fn cmap_bfchar_and_bfrange() {
        let cmap = b"/CIDInit /ProcSet findresource begin
            1 begincodespacerange <0000> <FFFF> endcodespacerange
            2 beginbfchar
            <0003> <0020>
            <0024> <0041>
            endbfchar
            2 beginbfrange
            <0044> <0046> <0061>
            <0050> <0051> [<00E9> <00E8>]
            endbfrange
            endcmap";
        let map = parse_cmap(cmap);
        assert_eq!(map.get(&0x03).map(String::as_str), Some(" "));
        assert_eq!(map.get(&0x24).map(String::as_str), Some("A"));
        assert_eq!(map.get(&0x45).map(String::as_str), Some("b"));
        assert_eq!(map.get(&0x46).map(String::as_str), Some("c"));
        assert_eq!(map.get(&0x51).map(String::as_str), Some("è"));
    }

    #[test]
    fn cid_width_forms() {
        let doc = Document::with_version("1.7");
        let cid = dictionary! {
            "DW" => 500,
            "W" => vec![
                10.into(),
                vec![Object::Integer(250), Object::Integer(300)].into(),
                20.into(), 22.into(), 800.into(),
            ],
        };
        let Widths::Cid { default, widths } = cid_widths(&doc, &cid) else {
            panic!("expected CID widths");
        };
        assert_eq!(default, 0.5);
        assert_eq!(widths.get(&11), Some(&0.3));
        assert_eq!(widths.get(&21), Some(&0.8));
        assert_eq!(widths.get(&23), None);
    }

    #[test]
    fn cid_widths_near_u32_max_stop_instead_of_wrapping() {
        let doc = Document::with_version("1.7");
        let descendant = dictionary! {
            "Subtype" => "CIDFontType2",
            "W" => vec![
                Object::Integer(i64::from(u32::MAX)),
                vec![Object::Integer(500), Object::Integer(500)].into(),
            ],
        };
        let font = dictionary! {
            "Subtype" => "Type0",
            "BaseFont" => "NotoSans",
            "DescendantFonts" => vec![descendant.into()],
        };
        let info = FontInfo::from_dict(&doc, &font);
        let Widths::Cid { widths, .. } = &info.widths else {
            panic!("expected CID widths");
        };
        assert_eq!(widths.len(), 1);
        assert_eq!(widths.get(&u32::MAX), Some(&0.5));
    }

    #[test]
    fn out_of_range_cid_starts_are_ignored() {
        let doc = Document::with_version("1.7");
        let cid = dictionary! {
            "W" => vec![
                Object::Integer(-5),
                vec![Object::Integer(250)].into(),
            ],
        };
        let Widths::Cid { widths, .. } = cid_widths(&doc, &cid) else {
            panic!("expected CID widths");
        };
        assert!(widths.is_empty());

        let cid = dictionary! {
            "W" => vec![
                Object::Integer(i64::from(u32::MAX) + 10),
                Object::Integer(i64::from(u32::MAX) + 20),
                Object::Integer(600),
            ],
        };
        let Widths::Cid { widths, .. } = cid_widths(&doc, &cid) else {
            panic!("expected CID widths");
        };
        assert!(widths.is_empty());
    }
}
