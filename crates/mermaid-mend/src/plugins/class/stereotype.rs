//! Stereotype stripper
//!
//! The renderer rejects `<<interface>>` written as its own line inside a
//! class body. Such lines are removed; the stereotype names are reported
//! once each.

use chumsky::prelude::*;
use tracing::debug;

use crate::core::chumsky_utils::{inline_whitespace, line_end, word};
use crate::core::{Autofix, FixNote, FixOutcome};

/// Name of the stereotype if `line` is nothing but `<<name>>`
pub fn stereotype_line(line: &str) -> Option<&str> {
    stereotype_parser().parse(line).into_result().ok()
}

fn stereotype_parser<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    inline_whitespace()
        .ignore_then(word().delimited_by(just("<<"), just(">>")))
        .then_ignore(inline_whitespace())
        .then_ignore(line_end())
}

/// Removes stand-alone `<<name>>` lines from class diagrams
#[derive(Debug, Clone, Copy, Default)]
pub struct StereotypeStripper;

impl StereotypeStripper {
    pub const NAME: &'static str = "stereotypes";

    pub fn new() -> Self {
        Self
    }
}

impl Autofix for StereotypeStripper {
    fn apply(&self, input: &str) -> FixOutcome {
        let mut removed: Vec<&str> = Vec::new();
        let mut kept: Vec<&str> = Vec::new();
        let mut first_line = None;

        for (idx, line) in input.split('\n').enumerate() {
            match stereotype_line(line) {
                Some(name) => {
                    debug!(line = idx + 1, stereotype = name, "Removed stereotype line");
                    first_line.get_or_insert(idx + 1);
                    if !removed.contains(&name) {
                        removed.push(name);
                    }
                }
                None => kept.push(line),
            }
        }

        if removed.is_empty() {
            return FixOutcome::unchanged(input);
        }

        let listed = removed
            .iter()
            .map(|name| format!("<<{name}>>"))
            .collect::<Vec<_>>()
            .join(", ");

        FixOutcome {
            text: kept.join("\n"),
            notes: vec![FixNote::fixed(
                Self::NAME,
                first_line,
                format!("removed stereotypes {listed}"),
            )],
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
