//! PDF string encodings
//!
//! Text strings (metadata, `/Alt`, field names) use PDFDocEncoding or
//! UTF-16BE with a byte-order mark. Content written with the standard
//! Helvetica font uses WinAnsiEncoding.

use lazy_static::lazy_static;
use lopdf::{Document, Object, StringFormat};

const UNDEFINED: char = '\u{FFFD}';
const WIN_ANSI: &str = "WinAnsiEncoding";

lazy_static! {
    /// lopdf's WinAnsiEncoding, one entry per byte; control codes are unmapped.
    static ref WIN_ANSI_TABLE: Vec<Option<char>> = (0..=u8::MAX)
        .map(|byte| Document::decode_text(Some(WIN_ANSI), &[byte]).chars().next())
        .collect();
}

pub fn decode_win_ansi_byte(byte: u8) -> char {
    WIN_ANSI_TABLE[usize::from(byte)].unwrap_or_else(|| char::from(byte))
}

/// Encode for a WinAnsi simple font; unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut buf = [0u8; 4];
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            c => Document::encode_text(Some(WIN_ANSI), c.encode_utf8(&mut buf))
                .first()
                .copied()
                .unwrap_or(b'?'),
        })
        .collect()
}

/// Decode a PDF text string.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return char::decode_utf16(units)
            .map(|r| r.unwrap_or(UNDEFINED))
            .collect();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Encode a text string: plain ASCII stays a literal, anything else is
/// written as UTF-16BE with a byte-order mark.
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
