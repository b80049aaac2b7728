//! Node scanner for flowchart blocks
//!
//! A single left-to-right pass over the block. Everything that is not a
//! node declaration (arrows, keywords, edge labels, comments, free-standing
//! strings) is copied through byte for byte; node labels go through the
//! quote policy.

use tracing::{debug, span, trace, Level};

use super::bracket::{contains_unquoted, find_matching_close, QuoteState};
use super::quote::{requote, unbalanced_quote, QuoteKind};
use crate::core::chumsky_utils::is_comment_line;
use crate::core::{
    line_at, line_number, BracketKind, DiagnosticKind, DiagnosticReporter, NodeOccurrence,
    RepairDiagnostic,
};

/// A piece of the block produced by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    /// Text copied through untouched
    Verbatim(&'a str),
    Node(NodeOccurrence<'a>),
}

/// Scans flowchart text for node declarations and requotes their labels
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeScanner {
    reporter: DiagnosticReporter,
}

impl NodeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner whose diagnostics use `reporter`'s preview settings
    pub fn with_reporter(reporter: DiagnosticReporter) -> Self {
        Self { reporter }
    }

    /// Rewrite every node label that needs quoting
    ///
    /// Either the whole block is rewritten or a diagnostic is returned;
    /// partial output never escapes.
    pub fn rewrite(&self, text: &str) -> Result<String, RepairDiagnostic> {
        let rewrite_span = span!(Level::DEBUG, "rewrite_nodes", input_len = text.len());
        let _enter = rewrite_span.enter();

        let mut out = String::with_capacity(text.len() + 16);
        let mut quoted = 0usize;

        self.walk(text, |segment| {
            match segment {
                Segment::Verbatim(chunk) => out.push_str(chunk),
                Segment::Node(node) => match requote(node.raw_content) {
                    Ok(label) => {
                        if label.as_ref() != node.raw_content {
                            debug!(node = node.identifier, shape = %node.bracket_kind, "Quoted node label");
                            quoted += 1;
                        }
                        let (open, close) = node.bracket_kind.delimiters();
                        out.push_str(node.identifier);
                        out.push_str(open);
                        out.push_str(&label);
                        out.push_str(close);
                    }
                    Err(kind) => return Err(self.malformed(text, &node, kind)),
                },
            }
            Ok(())
        })?;

        debug!(quoted, "Node rewrite completed");
        Ok(out)
    }

    /// List every node declaration without rewriting anything
    pub fn scan<'a>(&self, text: &'a str) -> Result<Vec<NodeOccurrence<'a>>, RepairDiagnostic> {
        let mut nodes = Vec::new();
        self.walk(text, |segment| {
            if let Segment::Node(node) = segment {
                nodes.push(node);
            }
            Ok(())
        })?;
        Ok(nodes)
    }

    fn walk<'a, F>(&self, text: &'a str, mut sink: F) -> Result<(), RepairDiagnostic>
    where
        F: FnMut(Segment<'a>) -> Result<(), RepairDiagnostic>,
    {
        let mut quote = QuoteState::Unquoted;
        let mut pos = 0;
        let mut verbatim_from = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some(ch) = rest.chars().next() else {
                break;
            };

            if quote.is_quoted() {
                quote = quote.advance(text, pos, ch);
                pos += ch.len_utf8();
                continue;
            }

            if pos == 0 || text.as_bytes()[pos - 1] == b'\n' {
                let line_end = rest.find('\n').map_or(text.len(), |i| pos + i);
                if is_comment_line(&text[pos..line_end]) {
                    pos = line_end;
                    continue;
                }
            }

            // Only double quotes delimit free-standing strings at this level;
            // an apostrophe in edge text must not swallow the rest of the block.
            if ch == '"' {
                quote = quote.advance(text, pos, ch);
                pos += 1;
                continue;
            }

            if is_ident_start(ch) {
                let ident_end = pos + ident_len(rest);
                match self.match_node(text, pos, ident_end)? {
                    Some(node) => {
                        let end = node.span.end;
                        trace!(node = node.identifier, shape = %node.bracket_kind, "Found node");
                        if verbatim_from < pos {
                            sink(Segment::Verbatim(&text[verbatim_from..pos]))?;
                        }
                        sink(Segment::Node(node))?;
                        pos = end;
                        verbatim_from = end;
                    }
                    None => pos = ident_end,
                }
                continue;
            }

            pos += ch.len_utf8();
        }

        if verbatim_from < text.len() {
            sink(Segment::Verbatim(&text[verbatim_from..]))?;
        }
        Ok(())
    }

    /// Probe bracket dialects after the identifier `text[start..ident_end]`
    ///
    /// Compound openers are tried first; when one finds no closer the next
    /// candidate sharing the prefix gets its turn (`A[(note) x]` is a
    /// rectangle). Only when every candidate fails is this an error.
    fn match_node<'a>(
        &self,
        text: &'a str,
        start: usize,
        ident_end: usize,
    ) -> Result<Option<NodeOccurrence<'a>>, RepairDiagnostic> {
        let mut first_failure: Option<BracketKind> = None;

        for kind in BracketKind::candidates(&text[ident_end..]) {
            let (open, close) = kind.delimiters();
            let content_start = ident_end + open.len();
            let found = find_matching_close(text, content_start, open, close)
                .map(|end| (end, &text[content_start..end - close.len()]))
                .filter(|(_, content)| !borrows_sibling_close(kind, content));
            match found {
                Some((end, raw_content)) => {
                    return Ok(Some(NodeOccurrence {
                        identifier: &text[start..ident_end],
                        bracket_kind: kind,
                        raw_content,
                        span: start..end,
                    }));
                }
                None => {
                    first_failure.get_or_insert(kind);
                }
            }
        }

        match first_failure {
            Some(kind) => Err(self.unterminated(text, start, ident_end, kind)),
            None => Ok(None),
        }
    }

    fn unterminated(
        &self,
        text: &str,
        start: usize,
        ident_end: usize,
        kind: BracketKind,
    ) -> RepairDiagnostic {
        let identifier = &text[start..ident_end];
        let line = line_at(text, start);
        let content_start = ident_end + kind.open().len();
        let line_end = text[content_start..]
            .find('\n')
            .map_or(text.len(), |i| content_start + i);
        let label = &text[content_start..line_end];

        let (diagnostic_kind, message) = match unbalanced_quote(label) {
            Some(quote) => (
                DiagnosticKind::UnbalancedQuote,
                format!(
                    "Unclosed {quote} quote in {kind} node `{identifier}`: the label never reaches its closing `{}`",
                    kind.close()
                ),
            ),
            None => (
                DiagnosticKind::UnterminatedBracket,
                format!(
                    "Unterminated {kind} node `{identifier}`: missing closing `{}`",
                    kind.close()
                ),
            ),
        };

        self.reporter
            .build(diagnostic_kind, message, text, line)
            .at_line(line_number(text, start))
    }

    fn malformed(&self, text: &str, node: &NodeOccurrence<'_>, quote: QuoteKind) -> RepairDiagnostic {
        let message = format!(
            "Unbalanced {quote} quote in {} node `{}`: quote the whole label or escape the `{}`",
            node.bracket_kind,
            node.identifier,
            quote.as_char()
        );
        self.reporter
            .build(
                DiagnosticKind::UnbalancedQuote,
                message,
                text,
                line_at(text, node.span.start),
            )
            .at_line(line_number(text, node.span.start))
    }
}

/// The slanted shapes share the `[/` and `[\` openers but not their
/// closers, so `A[\x/] --> B[/y\]` must not read as one lean-left node.
fn borrows_sibling_close(kind: BracketKind, content: &str) -> bool {
    let slanted = matches!(
        kind,
        BracketKind::LeanRight
            | BracketKind::LeanLeft
            | BracketKind::Trapezoid
            | BracketKind::InvTrapezoid
    );
    slanted && contains_unquoted(content, ']')
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn ident_len(text: &str) -> usize {
    text.char_indices()
        .find(|&(_, ch)| !(ch.is_alphanumeric() || ch == '_'))
        .map_or(text.len(), |(at, _)| at)
}

/// Rewrite node labels in a flowchart block with default diagnostics
///
/// # Example
/// ```
/// use mermaid_mend::plugins::flowchart::rewrite_nodes;
///
/// assert_eq!(rewrite_nodes("A[Привет мир]").unwrap(), "A[\"Привет мир\"]");
/// assert_eq!(rewrite_nodes("E((Готово))").unwrap(), "E((\"Готово\"))");
/// ```
pub fn rewrite_nodes(block_text: &str) -> Result<String, RepairDiagnostic> {
    NodeScanner::new().rewrite(block_text)
}

/// List node declarations in a flowchart block
pub fn scan_nodes(block_text: &str) -> Result<Vec<NodeOccurrence<'_>>, RepairDiagnostic> {
    NodeScanner::new().scan(block_text)
}
