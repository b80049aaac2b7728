//! Shared chumsky parser utilities for line recognizers
//!
//! The autofix passes are line oriented; these combinators recognize the
//! few line shapes they care about without a full diagram grammar.

use chumsky::prelude::*;

/// Parse inline whitespace only (spaces and tabs, no newlines), as a slice.
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    one_of(" \t").repeated().to_slice()
}

/// Parse at least one space or tab, as a slice.
pub fn inline_whitespace_required<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    one_of(" \t").repeated().at_least(1).to_slice()
}

/// Parse a Mermaid-style comment (%% to end of line).
pub fn mermaid_comment<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    just("%%").ignore_then(none_of('\n').repeated()).ignored()
}

/// Parse a participant/stereotype name: letters, digits and underscores.
pub fn word<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
}

/// Consume the remainder of the line, as a slice.
pub fn rest_of_line<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    any().repeated().to_slice()
}

/// End of a line split from a CRLF or LF document: an optional `\r`, then end of input.
pub fn line_end<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    just('\r').or_not().ignored().then_ignore(end())
}

/// Returns true if `line` is a `%%` comment, ignoring indentation.
pub fn is_comment_line(line: &str) -> bool {
    inline_whitespace()
        .ignore_then(mermaid_comment())
        .then_ignore(end())
        .parse(line)
        .into_result()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_whitespace() {
        let parser = inline_whitespace().then_ignore(just("test")).then_ignore(end());
        assert_eq!(parser.parse("test").into_result().ok(), Some(""));
        assert_eq!(parser.parse(" \ttest").into_result().ok(), Some(" \t"));
        // Should NOT consume newlines
        assert!(parser.parse("\ntest").into_result().is_err());
    }

    #[test]
    fn test_inline_whitespace_required() {
        let parser = just("a")
            .ignore_then(inline_whitespace_required())
            .then_ignore(just("b"))
            .then_ignore(end());
        assert!(parser.parse("a b").into_result().is_ok());
        assert!(parser.parse("a\t b").into_result().is_ok());
        assert!(parser.parse("ab").into_result().is_err());
    }

    #[test]
    fn test_word() {
        let parser = word().then_ignore(end());
        assert_eq!(parser.parse("Repo_2").into_result().ok(), Some("Repo_2"));
        assert_eq!(parser.parse("Заказ").into_result().ok(), Some("Заказ"));
        assert!(parser.parse("a-b").into_result().is_err());
        assert!(parser.parse("").into_result().is_err());
    }

    #[test]
    fn test_comment_lines() {
        assert!(is_comment_line("%% this is a comment"));
        assert!(is_comment_line("    %%{init: {}}%%"));
        assert!(!is_comment_line("% not a comment"));
        assert!(!is_comment_line("A --> B %% trailing"));
    }
}
