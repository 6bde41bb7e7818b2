//! Parser for `.properties` text.
//!
//! Supports `key=value`, `key: value` and `key value` lines, `#` and `!`
//! comments, `\uXXXX` escapes, and a trailing backslash to continue a value
//! on the next line. A key that appears more than once yields a
//! [`RawValue::List`] in file order.
//!
//! [`RawValue::List`]: crate::RawValue::List

use crate::value::PropertyBag;

use super::source::append;

/// Parses properties text into a bag, preserving key order.
pub fn parse_properties(contents: &str) -> PropertyBag {
    let mut bag = PropertyBag::new();
    for line in logical_lines(contents, &['#', '!']) {
        let (key, value) = split_entry(&line);
        append(&mut bag, unescape(key), unescape(value.trim_start()));
    }
    bag
}

/// Joins continued lines and drops blank lines and comments.
pub(super) fn logical_lines(contents: &str, comment_markers: &[char]) -> Vec<String> {
    let mut logical_lines = Vec::new();
    let mut lines = contents.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(comment_markers) {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }
        logical_lines.push(logical);
    }

    logical_lines
}

fn ends_with_continuation(line: &str) -> bool {
    let backslashes = line.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 1
}

/// Splits at the first unescaped `=`, `:` or whitespace.
pub(super) fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => return (line[..idx].trim_end(), &line[idx + 1..]),
            c if c.is_whitespace() => {
                let rest = line[idx..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..idx], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

/// Resolves backslash escapes. A malformed `\u` escape is kept as written.
pub(super) fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find('\\') {
        result.push_str(&rest[..idx]);
        rest = &rest[idx + 1..];
        match rest.chars().next() {
            Some('u') => match decode_unicode(rest) {
                Some((ch, consumed)) => {
                    result.push(ch);
                    rest = &rest[consumed..];
                }
                None => {
                    result.push_str("\\u");
                    rest = &rest[1..];
                }
            },
            Some(escaped) => {
                result.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
                rest = &rest[escaped.len_utf8()..];
            }
            None => {}
        }
    }

    result.push_str(rest);
    result
}

/// Decodes `rest`, which starts at the `u` of a `\u` escape, into a char and
/// the number of bytes consumed. Surrogate pairs span two escapes.
fn decode_unicode(rest: &str) -> Option<(char, usize)> {
    let unit = hex_unit(rest.get(1..5)?)?;
    if !(0xD800..=0xDBFF).contains(&unit) {
        return char::from_u32(unit).map(|ch| (ch, 5));
    }

    if rest.get(5..7)? != "\\u" {
        return None;
    }
    let low = hex_unit(rest.get(7..11)?)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    let code_point = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code_point).map(|ch| (ch, 11))
}

fn hex_unit(digits: &str) -> Option<u32> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
