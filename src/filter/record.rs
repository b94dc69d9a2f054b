//! Field extraction for one line of the text file.
//!
//! Lines are handled as raw Latin-1 bytes. Splitting is a plain byte split on
//! `;` with no quoting rules: a `;` inside quotes still separates fields.

pub const FIELD_DELIMITER: u8 = b';';

/// Zero-based index of the field compared against the identifiers.
pub const KEY_FIELD_INDEX: usize = 7;

const QUOTE: u8 = b'"';

/// The line without its trailing `\n` or `\r\n`.
pub fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Remove every leading and trailing `"`, whether or not they pair up.
pub fn strip_quotes(field: &[u8]) -> &[u8] {
    let start = field
        .iter()
        .position(|&b| b != QUOTE)
        .unwrap_or(field.len());
    let end = field
        .iter()
        .rposition(|&b| b != QUOTE)
        .map_or(start, |i| i + 1);
    &field[start..end]
}

/// Quote-stripped key field of `line`, or `None` if the line has 7 fields or fewer.
pub fn key_field(line: &[u8]) -> Option<&[u8]> {
    strip_line_terminator(line)
        .split(|&b| b == FIELD_DELIMITER)
        .nth(KEY_FIELD_INDEX)
        .map(strip_quotes)
}
