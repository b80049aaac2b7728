//! Shared text utilities for diagram processing
//!
//! This module contains common text helpers used across passes.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate `line` to at most `max_width` display columns.
///
/// Truncated lines end with `…`, which counts towards the width.
/// A `max_width` of 0 disables truncation.
///
/// # Example
/// ```
/// use mermaid_mend::core::truncate_to_width;
///
/// assert_eq!(truncate_to_width("A[Start] --> B[End]", 9), "A[Start]…");
/// assert_eq!(truncate_to_width("short", 20), "short");
/// ```
pub fn truncate_to_width(line: &str, max_width: usize) -> String {
    if max_width == 0 || UnicodeWidthStr::width(line) <= max_width {
        return line.to_string();
    }

    let budget = max_width - 1;
    let mut out = String::new();
    let mut width = 0;

    for ch in line.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        out.push(ch);
        width += ch_width;
    }

    out.push('…');
    out
}

/// The full line of `text` containing byte offset `at`, without its newline
pub fn line_at(text: &str, at: usize) -> &str {
    let at = at.min(text.len());
    let start = text[..at].rfind('\n').map_or(0, |pos| pos + 1);
    let end = text[at..].find('\n').map_or(text.len(), |pos| at + pos);
    text[start..end].trim_end_matches('\r')
}

/// 1-based line number of byte offset `at`
pub fn line_number(text: &str, at: usize) -> usize {
    text[..at.min(text.len())].matches('\n').count() + 1
}

/// Returns true if the char at byte offset `at` is escaped
///
/// Escaped means preceded by an odd run of backslashes; `\\"` is an
/// escaped backslash followed by a live quote.
pub fn is_escaped(text: &str, at: usize) -> bool {
    trailing_backslashes(&text[..at]) % 2 == 1
}

/// Length of the backslash run at the end of `text`
pub fn trailing_backslashes(text: &str) -> usize {
    text.bytes().rev().take_while(|b| *b == b'\\').count()
}
