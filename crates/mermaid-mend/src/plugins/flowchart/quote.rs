//! Quote policy for node labels
//!
//! The renderer needs quotes around labels with non-ASCII text or `@`
//! (which newer Mermaid reads as an annotation), and rejects quoting an
//! already quoted label. The policy is idempotent: quoted output
//! classifies as [`QuoteVerdict::AlreadyQuoted`].

use std::borrow::Cow;
use std::fmt;

use crate::core::{is_escaped, trailing_backslashes};

/// Reserved marker that forces quoting
pub const RESERVED_MARKER: char = '@';

/// Which quote character is unbalanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    Double,
    Single,
}

impl QuoteKind {
    pub fn as_char(&self) -> char {
        match self {
            QuoteKind::Double => '"',
            QuoteKind::Single => '\'',
        }
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteKind::Double => write!(f, "double"),
            QuoteKind::Single => write!(f, "single"),
        }
    }
}

/// Decision for one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteVerdict {
    /// Wrapped in matching quotes; left untouched
    AlreadyQuoted,
    /// Contains non-ASCII or the reserved marker; must be wrapped
    NeedsQuoting,
    /// Plain ASCII; left untouched
    PassThrough,
    /// Odd number of unescaped quotes of this kind; never guessed at
    Malformed(QuoteKind),
}

/// Classify raw label content
///
/// # Example
/// ```
/// use mermaid_mend::plugins::flowchart::{classify, QuoteVerdict};
///
/// assert_eq!(classify("Привет мир"), QuoteVerdict::NeedsQuoting);
/// assert_eq!(classify("\"Вызов f(x)\""), QuoteVerdict::AlreadyQuoted);
/// assert_eq!(classify("Start process"), QuoteVerdict::PassThrough);
/// ```
pub fn classify(content: &str) -> QuoteVerdict {
    if is_fully_quoted(content) {
        return QuoteVerdict::AlreadyQuoted;
    }
    if let Some(kind) = unbalanced_quote(content) {
        return QuoteVerdict::Malformed(kind);
    }
    if !content.is_ascii() || content.contains(RESERVED_MARKER) {
        return QuoteVerdict::NeedsQuoting;
    }
    QuoteVerdict::PassThrough
}

/// Returns true if the trimmed content starts and ends with the same quote
pub fn is_fully_quoted(content: &str) -> bool {
    let trimmed = content.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => (first == '"' || first == '\'') && first == last,
        _ => false,
    }
}

/// The quote kind with an odd count of unescaped occurrences, if any
///
/// Double quotes are checked first since they are the ones the renderer
/// reads as string delimiters.
pub fn unbalanced_quote(content: &str) -> Option<QuoteKind> {
    let count = |quote: char| {
        content
            .char_indices()
            .filter(|&(at, ch)| ch == quote && !is_escaped(content, at))
            .count()
    };

    if count('"') % 2 == 1 {
        Some(QuoteKind::Double)
    } else if count('\'') % 2 == 1 {
        Some(QuoteKind::Single)
    } else {
        None
    }
}

/// Wrap content in double quotes, escaping unescaped inner double quotes
///
/// A dangling backslash at the end is doubled so it cannot escape the
/// closing quote.
pub fn quote(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 3);
    out.push('"');
    for (at, ch) in content.char_indices() {
        if ch == '"' && !is_escaped(content, at) {
            out.push('\\');
        }
        out.push(ch);
    }
    if trailing_backslashes(content) % 2 == 1 {
        out.push('\\');
    }
    out.push('"');
    out
}

/// Apply the policy: the label to emit, or the unbalanced quote kind
pub fn requote(content: &str) -> Result<Cow<'_, str>, QuoteKind> {
    match classify(content) {
        QuoteVerdict::AlreadyQuoted | QuoteVerdict::PassThrough => Ok(Cow::Borrowed(content)),
        QuoteVerdict::NeedsQuoting => Ok(Cow::Owned(quote(content))),
        QuoteVerdict::Malformed(kind) => Err(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_quoted() {
        assert_eq!(classify("\"Вызов withdraw(сумма)\""), QuoteVerdict::AlreadyQuoted);
        assert_eq!(classify("'single'"), QuoteVerdict::AlreadyQuoted);
        assert_eq!(classify("  \"padded\"  "), QuoteVerdict::AlreadyQuoted);
        assert_eq!(classify("\"@value.setter\""), QuoteVerdict::AlreadyQuoted);
    }

    #[test]
    fn test_mismatched_outer_quotes_are_not_quoted() {
        assert_ne!(classify("\"mixed'"), QuoteVerdict::AlreadyQuoted);
        assert_eq!(classify("\""), QuoteVerdict::Malformed(QuoteKind::Double));
    }

    #[test]
    fn test_needs_quoting() {
        assert_eq!(classify("Привет мир"), QuoteVerdict::NeedsQuoting);
        assert_eq!(classify("Готово ✅"), QuoteVerdict::NeedsQuoting);
        assert_eq!(classify("@property"), QuoteVerdict::NeedsQuoting);
        assert_eq!(classify("user@example"), QuoteVerdict::NeedsQuoting);
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(classify("Start process"), QuoteVerdict::PassThrough);
        assert_eq!(classify("Line one<br/>Line two"), QuoteVerdict::PassThrough);
        assert_eq!(classify(""), QuoteVerdict::PassThrough);
        assert_eq!(classify("f(x) = \"y\""), QuoteVerdict::PassThrough);
    }

    #[test]
    fn test_malformed_reports_kind() {
        assert_eq!(
            classify("Текст с \"незакрытой кавычкой"),
            QuoteVerdict::Malformed(QuoteKind::Double)
        );
        assert_eq!(classify("it's"), QuoteVerdict::Malformed(QuoteKind::Single));
    }

    #[test]
    fn test_escaped_quotes_are_not_counted() {
        assert_eq!(unbalanced_quote(r#"say \"hi"#), None);
        assert_eq!(classify(r#"Ответ \""#), QuoteVerdict::NeedsQuoting);
    }

    #[test]
    fn test_quote_escapes_inner_quotes() {
        assert_eq!(quote("Привет"), "\"Привет\"");
        assert_eq!(
            quote("Текст с \"кавычками\" внутри"),
            r#""Текст с \"кавычками\" внутри""#
        );
        // Already escaped quotes are kept as they are
        assert_eq!(quote(r#"a \"b\""#), r#""a \"b\"""#);
    }

    #[test]
    fn test_quote_trailing_backslash() {
        assert_eq!(quote(r"Путь\"), r#""Путь\\""#);
        assert_eq!(classify(&quote(r"Путь\")), QuoteVerdict::AlreadyQuoted);
    }

    #[test]
    fn test_requote_is_idempotent() {
        let once = requote("Текст с \"кавычками\"").unwrap().into_owned();
        let twice = requote(&once).unwrap().into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_requote_malformed() {
        assert_eq!(requote("a \"b"), Err(QuoteKind::Double));
    }
}
