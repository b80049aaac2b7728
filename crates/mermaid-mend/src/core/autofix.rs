//! Autofix trait shared by the line-oriented repair rules
//!
//! A rule never fails: it rewrites what it recognizes and reports what it
//! did through [`FixNote`]s, which are for logging and reporting only.

use serde::Serialize;
use std::fmt;

/// Severity of a [`FixNote`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteLevel {
    /// The rule changed the text
    Fixed,
    /// The rule saw something suspicious and left it alone
    Warning,
}

/// One human-readable record of what a rule did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixNote {
    /// Name of the rule that produced the note
    pub rule: &'static str,
    /// 1-based line inside the block, if the note is about one line
    pub line: Option<usize>,
    pub level: NoteLevel,
    pub description: String,
}

impl FixNote {
    pub fn fixed(rule: &'static str, line: Option<usize>, description: impl Into<String>) -> Self {
        Self {
            rule,
            line,
            level: NoteLevel::Fixed,
            description: description.into(),
        }
    }

    pub fn warning(rule: &'static str, line: Option<usize>, description: impl Into<String>) -> Self {
        Self {
            rule,
            line,
            level: NoteLevel::Warning,
            description: description.into(),
        }
    }
}

impl fmt::Display for FixNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NoteLevel::Fixed => "fixed",
            NoteLevel::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(f, "[{}] {} (line {}): {}", self.rule, level, line, self.description),
            None => write!(f, "[{}] {}: {}", self.rule, level, self.description),
        }
    }
}

/// Rewritten text plus the notes describing the rewrite
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixOutcome {
    pub text: String,
    pub notes: Vec<FixNote>,
}

impl FixOutcome {
    /// Outcome that leaves `text` unchanged
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            notes: Vec::new(),
        }
    }

    /// Number of notes that record an actual change
    pub fn fix_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|note| note.level == NoteLevel::Fixed)
            .count()
    }
}

/// A line-oriented repair rule for one diagram dialect
pub trait Autofix: Send + Sync {
    /// Rewrite `input`, reporting every change
    fn apply(&self, input: &str) -> FixOutcome;

    /// Short rule name used in notes and logs
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_display() {
        let note = FixNote::fixed("activation-stack", Some(4), "deactivate Ord -> Repo");
        assert_eq!(
            note.to_string(),
            "[activation-stack] fixed (line 4): deactivate Ord -> Repo"
        );

        let note = FixNote::warning("stereotypes", None, "nothing to do");
        assert_eq!(note.to_string(), "[stereotypes] warning: nothing to do");
    }

    #[test]
    fn test_fix_count_ignores_warnings() {
        let outcome = FixOutcome {
            text: String::new(),
            notes: vec![
                FixNote::fixed("a", None, "x"),
                FixNote::warning("a", None, "y"),
                FixNote::fixed("b", Some(1), "z"),
            ],
        };
        assert_eq!(outcome.fix_count(), 2);
        assert_eq!(FixOutcome::unchanged("abc").text, "abc");
    }
}
