//! Decoding and field-splitting helpers shared by the text parsers.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Windows, Unix or classic Mac line ending
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("valid regex"));

/// Comma, tab or semicolon, possibly mixed
static DATA_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\t]+").expect("valid regex"));

/// `key: value` or `key = value`, key starting with a letter
static METADATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][^:=]*?)\s*[:=]\s*(.+)$").expect("valid regex"));

/// Decode file content as UTF-8 (dropping a byte-order mark), falling back to Latin-1.
///
/// Latin-1 maps every byte to a char, so decoding never fails.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Split on `\r\n`, `\n` or a bare `\r`
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    LINE_BREAK.split(text).collect()
}

/// Parse a trimmed numeric token
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok()
}

/// Split a data line on commas/tabs/semicolons, falling back to whitespace
pub(crate) fn split_data_fields(line: &str) -> Vec<&str> {
    let fields: Vec<&str> = DATA_DELIMITERS
        .split(line.trim())
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect();

    match fields.as_slice() {
        [single] if single.contains(char::is_whitespace) => single.split_whitespace().collect(),
        _ => fields,
    }
}

/// First field of the line parses as a number
pub(crate) fn is_data_line(line: &str) -> bool {
    split_data_fields(line)
        .first()
        .is_some_and(|field| parse_number(field).is_some())
}

/// Extract a `key: value` / `key = value` pair from a header line
pub(crate) fn metadata_pair(line: &str) -> Option<(String, String)> {
    let caps = METADATA_LINE.captures(line.trim())?;
    Some((caps[1].trim().to_string(), caps[2].trim().to_string()))
}

/// Case-insensitive search for any of the brand tokens
pub(crate) fn contains_any_token(text: &str, tokens: &[&str]) -> bool {
    let lower = text.to_lowercase();
    tokens.iter().any(|token| lower.contains(token))
}

/// Content looks like an XML document
pub(crate) fn looks_like_xml(text: &str) -> bool {
    text.trim_start().starts_with('<')
}
