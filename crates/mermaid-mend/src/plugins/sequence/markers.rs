//! Reserved-marker rewriter
//!
//! The renderer reserves `<<...>>` for stereotypes, so a message like
//! `Service->>Ord: <<create>>` fails to render. Inside message text the
//! pair is rewritten to guillemets: `Service->>Ord: «create»`.

use tracing::debug;

use super::message::MessageLine;
use crate::core::{Autofix, FixNote, FixOutcome};

const OPEN_MARKER: &str = "<<";
const CLOSE_MARKER: &str = ">>";

/// Rewrites `<<...>>` in sequence message text to `«...»`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservedMarkerRewriter;

impl ReservedMarkerRewriter {
    pub const NAME: &'static str = "reserved-markers";

    pub fn new() -> Self {
        Self
    }

    /// Rewrite one line; `None` when nothing changed
    pub fn rewrite_line(&self, line: &str) -> Option<String> {
        let message = MessageLine::parse(line)?;
        let (head, text) = line.split_at(message.text_start);
        let (rewritten, count) = replace_markers(text);
        if count == 0 {
            return None;
        }
        Some(format!("{head}{rewritten}"))
    }
}

impl Autofix for ReservedMarkerRewriter {
    fn apply(&self, input: &str) -> FixOutcome {
        let mut notes = Vec::new();
        let lines: Vec<String> = input
            .split('\n')
            .enumerate()
            .map(|(idx, line)| match self.rewrite_line(line) {
                Some(fixed) => {
                    debug!(line = idx + 1, "Rewrote reserved markers");
                    notes.push(FixNote::fixed(
                        Self::NAME,
                        Some(idx + 1),
                        format!("<<...>> -> «...» in `{}`", fixed.trim()),
                    ));
                    fixed
                }
                None => line.to_string(),
            })
            .collect();

        FixOutcome {
            text: lines.join("\n"),
            notes,
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Replace each complete `<<...>>` pair in `text`, returning the count
fn replace_markers(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;

    while let Some(open) = rest.find(OPEN_MARKER) {
        let inner_start = open + OPEN_MARKER.len();
        let Some(close) = rest[inner_start..].find(CLOSE_MARKER) else {
            break;
        };
        let inner_end = inner_start + close;
        out.push_str(&rest[..open]);
        out.push('«');
        out.push_str(&rest[inner_start..inner_end]);
        out.push('»');
        rest = &rest[inner_end + CLOSE_MARKER.len()..];
        count += 1;
    }

    out.push_str(rest);
    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_message_marker() {
        let rule = ReservedMarkerRewriter::new();
        assert_eq!(
            rule.rewrite_line("Service->>Ord: <<create>>").as_deref(),
            Some("Service->>Ord: «create»")
        );
        assert_eq!(
            rule.rewrite_line("    A-->>B: <<a>> and <<b>>").as_deref(),
            Some("    A-->>B: «a» and «b»")
        );
    }

    #[test]
    fn test_lines_without_arrow_are_untouched() {
        let rule = ReservedMarkerRewriter::new();
        assert_eq!(rule.rewrite_line("participant Svc <<service>>"), None);
        assert_eq!(rule.rewrite_line("Note over A: <<x>>"), None);
    }

    #[test]
    fn test_arrow_tokens_survive() {
        let rule = ReservedMarkerRewriter::new();
        assert_eq!(rule.rewrite_line("A->>B: plain"), None);
        assert_eq!(rule.rewrite_line("A<<->>B: plain"), None);
        assert_eq!(
            rule.rewrite_line("A<<->>B: <<sync>>").as_deref(),
            Some("A<<->>B: «sync»")
        );
    }

    #[test]
    fn test_unclosed_marker_is_left_alone() {
        let rule = ReservedMarkerRewriter::new();
        assert_eq!(rule.rewrite_line("A->>B: a << b"), None);
        assert_eq!(
            rule.rewrite_line("A->>B: <<x>> then <<y").as_deref(),
            Some("A->>B: «x» then <<y")
        );
    }

    #[test]
    fn test_apply_records_notes() {
        let input = "sequenceDiagram\n    Service->>Ord: <<create>>\n    Ord-->>Service: ok";
        let outcome = ReservedMarkerRewriter::new().apply(input);
        assert_eq!(
            outcome.text,
            "sequenceDiagram\n    Service->>Ord: «create»\n    Ord-->>Service: ok"
        );
        assert_eq!(outcome.notes.len(), 1);
        assert_eq!(outcome.notes[0].line, Some(2));
        assert_eq!(outcome.notes[0].rule, "reserved-markers");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let rule = ReservedMarkerRewriter::new();
        let once = rule.apply("A->>B: <<create>>").text;
        let twice = rule.apply(&once);
        assert_eq!(twice.text, once);
        assert!(twice.notes.is_empty());
    }
}
