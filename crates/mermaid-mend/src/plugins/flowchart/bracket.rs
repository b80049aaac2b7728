//! Bracket matcher
//!
//! Finds the closing delimiter of a node label while honoring quotes, so
//! `A["Call f(x)]"]` closes at the final `]` and not inside the string.

use crate::core::is_escaped;

/// Quote tracking state for a single scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteState {
    #[default]
    Unquoted,
    InQuote(char),
}

impl QuoteState {
    /// State after reading `ch` at byte offset `at` of `text`
    ///
    /// An escaped quote (preceded by a backslash) never toggles the state.
    pub fn advance(self, text: &str, at: usize, ch: char) -> Self {
        match self {
            QuoteState::InQuote(open) if ch == open && !is_escaped(text, at) => {
                QuoteState::Unquoted
            }
            QuoteState::Unquoted if is_quote(ch) && !is_escaped(text, at) => {
                QuoteState::InQuote(ch)
            }
            state => state,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, QuoteState::InQuote(_))
    }
}

/// Returns true for the quote characters labels may use
pub fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

/// Find the end of a label that starts at `content_start`
///
/// Returns the offset just past `close_delim`, or `None` when the label is
/// not closed: a newline or the end of `text` is reached first. A label may
/// only continue onto the next line inside a quote that opens the label.
/// Unquoted brackets of the dialect's inner kind nest, so `A(f(x))` and
/// `E((f(x)))` both close at the last parenthesis.
///
/// # Example
/// ```
/// use mermaid_mend::plugins::flowchart::find_matching_close;
///
/// let text = r#"A["Call f(x)"] --> B"#;
/// assert_eq!(find_matching_close(text, 2, "[", "]"), Some(14));
/// assert_eq!(find_matching_close("A[oops", 2, "[", "]"), None);
/// ```
pub fn find_matching_close(
    text: &str,
    content_start: usize,
    open_delim: &str,
    close_delim: &str,
) -> Option<usize> {
    // Escapes are judged inside the label only: the backslash of a `[\`
    // opener does not escape a leading quote.
    let body = &text[content_start..];
    let (inner_open, inner_close) = inner_brackets(open_delim, close_delim);
    let mut state = QuoteState::Unquoted;
    let mut leading_quote = false;
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];
        let ch = rest.chars().next()?;

        if ch == '\n' && !(state.is_quoted() && leading_quote) {
            return None;
        }

        if !state.is_quoted() {
            if depth == 0 && rest.starts_with(close_delim) {
                return Some(content_start + pos + close_delim.len());
            }
            if Some(ch) == inner_open {
                depth += 1;
            } else if Some(ch) == inner_close {
                depth = depth.saturating_sub(1);
            }
        }

        let next = state.advance(body, pos, ch);
        if !state.is_quoted() && next.is_quoted() {
            leading_quote = body[..pos].trim().is_empty();
        }
        state = next;
        pos += ch.len_utf8();
    }

    None
}

/// The bracket characters that nest inside a dialect's label
///
/// For `((`, `[(` or `[/` this is the innermost bracket of the opener and
/// the outermost bracket of the closer: `(`/`)`, `(`/`)` and `[`/`]`.
fn inner_brackets(open_delim: &str, close_delim: &str) -> (Option<char>, Option<char>) {
    let inner_open = open_delim.chars().rev().find(|ch| "([{".contains(*ch));
    let inner_close = close_delim.chars().find(|ch| ")]}".contains(*ch));
    (inner_open, inner_close)
}

/// Returns true if `needle` occurs in `text` outside any quoted region
pub fn contains_unquoted(text: &str, needle: char) -> bool {
    let mut state = QuoteState::Unquoted;
    for (at, ch) in text.char_indices() {
        if ch == needle && !state.is_quoted() {
            return true;
        }
        state = state.advance(text, at, ch);
    }
    false
}
