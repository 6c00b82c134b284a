//! Field tokenizer for `Key: value` lines
//!
//! Every non-marker line of an archive is either body text or a field line.
//! Field lines split on the *first* colon only, so values may themselves
//! contain colons (times, URLs):
//!
//! ```rust
//! use boardarchive::field::tokenize;
//!
//! assert_eq!(tokenize("Time: 12:30 PM"), Some(("Time", "12:30 PM")));
//! assert_eq!(tokenize("just some text"), None);
//! ```

use crate::error::{FormatError, FormatErrorKind};

/// Split a line into a trimmed `(key, value)` pair on its first `:`.
///
/// Lines without a colon are not fields and yield `None`.
pub fn tokenize(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Comma-split a list value, trimming each element.
///
/// An empty value is an empty list rather than a list holding one empty
/// string, so that empty lists survive a serialize/parse round trip.
pub fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}

/// Validate a numeric field: must parse as an integer and be `>= 0`.
pub fn parse_non_negative(value: &str, key: &str, line: usize) -> Result<u64, FormatError> {
    let trimmed = value.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(FormatError::new(
            FormatErrorKind::NegativeValue,
            key,
            value,
            line,
        )),
        Ok(n) => Ok(n as u64),
        // Values beyond i64 are still valid IDs as long as they are unsigned
        Err(_) => trimmed
            .strip_prefix('+')
            .unwrap_or(trimmed)
            .parse::<u64>()
            .map_err(|_| FormatError::new(FormatErrorKind::InvalidInteger, key, value, line)),
    }
}

/// Split a `Kind` value (`"Type, Level"`) on its first comma.
pub fn split_kind(kind: &str) -> (String, String) {
    match kind.split_once(',') {
        Some((kind_type, level)) => (kind_type.trim().to_string(), level.trim().to_string()),
        None => (kind.trim().to_string(), String::new()),
    }
}

/// Split text on any line-break sequence (`\r\n`, `\n` or `\r`).
///
/// Unlike [`str::lines`], a trailing break produces a trailing empty
/// element, and an empty string produces one empty element.
pub fn split_line_breaks(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                out.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&text[start..]);
    out
}
