//! Activation-stack corrector
//!
//! Activations nest, so `deactivate` must name the most recently
//! activated participant. A mismatched `deactivate Y` is rewritten to
//! name the top of the stack instead.

use chumsky::prelude::*;
use tracing::{debug, span, warn, Level};

use super::message::{ActivationShorthand, MessageLine};
use crate::core::chumsky_utils::{inline_whitespace, inline_whitespace_required, rest_of_line, word};
use crate::core::{Autofix, FixNote, FixOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Activate,
    Deactivate,
}

/// An `activate X` or `deactivate X` line, split into slices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub indent: &'a str,
    pub kind: DirectiveKind,
    pub gap: &'a str,
    pub participant: &'a str,
    pub rest: &'a str,
}

impl<'a> Directive<'a> {
    /// Recognize a directive line
    pub fn parse(line: &'a str) -> Option<Self> {
        directive_parser().parse(line).into_result().ok()
    }

    /// The same line naming `participant` instead
    pub fn with_participant(&self, participant: &str) -> String {
        let keyword = match self.kind {
            DirectiveKind::Activate => "activate",
            DirectiveKind::Deactivate => "deactivate",
        };
        format!(
            "{}{}{}{}{}",
            self.indent, keyword, self.gap, participant, self.rest
        )
    }
}

fn directive_parser<'src>() -> impl Parser<'src, &'src str, Directive<'src>> + Clone {
    let keyword = choice((
        just("deactivate").to(DirectiveKind::Deactivate),
        just("activate").to(DirectiveKind::Activate),
    ));

    inline_whitespace()
        .then(keyword)
        .then(inline_whitespace_required())
        .then(word())
        .then(rest_of_line())
        .map(|((((indent, kind), gap), participant), rest)| Directive {
            indent,
            kind,
            gap,
            participant,
            rest,
        })
}

/// Ordered participant identifiers, scoped to one diagram
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationStack {
    active: Vec<String>,
}

impl ActivationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, participant: &str) {
        self.active.push(participant.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.active.pop()
    }

    pub fn top(&self) -> Option<&str> {
        self.active.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }
}

/// Rewrites `deactivate` directives that close the wrong activation
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationStackCorrector;

impl ActivationStackCorrector {
    pub const NAME: &'static str = "activation-stack";

    pub fn new() -> Self {
        Self
    }

    fn correct_line(
        &self,
        line: &str,
        line_no: usize,
        stack: &mut ActivationStack,
        notes: &mut Vec<FixNote>,
    ) -> Option<String> {
        if let Some(directive) = Directive::parse(line) {
            return match directive.kind {
                DirectiveKind::Activate => {
                    stack.push(directive.participant);
                    None
                }
                DirectiveKind::Deactivate => {
                    self.deactivate(&directive, line_no, stack, notes)
                }
            };
        }

        if let Some((shorthand, participant)) =
            MessageLine::parse(line).and_then(|msg| msg.shorthand_participant())
        {
            match shorthand {
                ActivationShorthand::Activate => stack.push(participant),
                ActivationShorthand::Deactivate => {
                    if stack.top() == Some(participant) {
                        stack.pop();
                    }
                }
            }
        }
        None
    }

    fn deactivate(
        &self,
        directive: &Directive<'_>,
        line_no: usize,
        stack: &mut ActivationStack,
        notes: &mut Vec<FixNote>,
    ) -> Option<String> {
        let Some(top) = stack.pop() else {
            warn!(
                line = line_no,
                participant = directive.participant,
                "deactivate with no active participant"
            );
            notes.push(FixNote::warning(
                Self::NAME,
                Some(line_no),
                format!(
                    "deactivate {} with no active participant; left unchanged",
                    directive.participant
                ),
            ));
            return None;
        };

        if top == directive.participant {
            return None;
        }

        debug!(
            line = line_no,
            from = directive.participant,
            to = %top,
            "Corrected deactivate target"
        );
        notes.push(FixNote::fixed(
            Self::NAME,
            Some(line_no),
            format!("deactivate {} -> {}", directive.participant, top),
        ));
        Some(directive.with_participant(&top))
    }
}

impl Autofix for ActivationStackCorrector {
    fn apply(&self, input: &str) -> FixOutcome {
        let apply_span = span!(Level::DEBUG, "activation_stack");
        let _enter = apply_span.enter();

        let mut stack = ActivationStack::new();
        let mut notes = Vec::new();
        let lines: Vec<String> = input
            .split('\n')
            .enumerate()
            .map(|(idx, line)| {
                self.correct_line(line, idx + 1, &mut stack, &mut notes)
                    .unwrap_or_else(|| line.to_string())
            })
            .collect();

        if !stack.is_empty() {
            debug!(open = stack.len(), "Activations left open at end of diagram");
        }

        FixOutcome {
            text: lines.join("\n"),
            notes,
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NoteLevel;

    #[test]
    fn test_parse_directive() {
        let directive = Directive::parse("    deactivate Ord %% done").unwrap();
        assert_eq!(directive.indent, "    ");
        assert_eq!(directive.kind, DirectiveKind::Deactivate);
        assert_eq!(directive.participant, "Ord");
        assert_eq!(directive.rest, " %% done");
        assert_eq!(
            directive.with_participant("Repo"),
            "    deactivate Repo %% done"
        );

        assert!(Directive::parse("activate").is_none());
        assert!(Directive::parse("activated Repo").is_none());
        assert!(Directive::parse("A->>B: activate Repo").is_none());
    }

    #[test]
    fn test_mismatched_deactivate_is_corrected() {
        let input = "sequenceDiagram\n    activate Repo\n    Repo-->>Service: result_id\n    deactivate Ord";
        let outcome = ActivationStackCorrector::new().apply(input);
        assert_eq!(
            outcome.text,
            "sequenceDiagram\n    activate Repo\n    Repo-->>Service: result_id\n    deactivate Repo"
        );
        assert_eq!(outcome.notes.len(), 1);
        assert_eq!(outcome.notes[0].level, NoteLevel::Fixed);
        assert_eq!(outcome.notes[0].line, Some(4));
        assert_eq!(outcome.notes[0].description, "deactivate Ord -> Repo");
    }

    #[test]
    fn test_matching_deactivate_is_untouched() {
        let input = "activate A\nactivate B\ndeactivate B\ndeactivate A";
        let outcome = ActivationStackCorrector::new().apply(input);
        assert_eq!(outcome.text, input);
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn test_correction_pops_stack() {
        let input = "activate A\nactivate B\ndeactivate A\ndeactivate B";
        let outcome = ActivationStackCorrector::new().apply(input);
        assert_eq!(
            outcome.text,
            "activate A\nactivate B\ndeactivate B\ndeactivate A"
        );
        assert_eq!(outcome.fix_count(), 2);
    }

    #[test]
    fn test_empty_stack_is_passed_through_with_warning() {
        let input = "sequenceDiagram\n  deactivate Ghost";
        let outcome = ActivationStackCorrector::new().apply(input);
        assert_eq!(outcome.text, input);
        assert_eq!(outcome.notes.len(), 1);
        assert_eq!(outcome.notes[0].level, NoteLevel::Warning);
        assert_eq!(outcome.fix_count(), 0);
    }

    #[test]
    fn test_shorthand_activation_counts() {
        let input = "A->>+B: call\nactivate C\ndeactivate B\ndeactivate B";
        let outcome = ActivationStackCorrector::new().apply(input);
        assert_eq!(
            outcome.text,
            "A->>+B: call\nactivate C\ndeactivate C\ndeactivate B"
        );

        let input = "A->>+B: call\nB-->>-A: done\ndeactivate B";
        let outcome = ActivationStackCorrector::new().apply(input);
        assert_eq!(outcome.text, input);
        assert_eq!(outcome.notes[0].level, NoteLevel::Warning);
    }

    #[test]
    fn test_stack_operations() {
        let mut stack = ActivationStack::new();
        assert!(stack.is_empty());
        stack.push("A");
        stack.push("B");
        assert_eq!(stack.top(), Some("B"));
        assert_eq!(stack.pop().as_deref(), Some("B"));
        assert_eq!(stack.len(), 1);
    }
}
