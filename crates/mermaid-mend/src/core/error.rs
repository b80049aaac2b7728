//! Core error types for diagram normalization
//!
//! A block that cannot be repaired safely produces a [`RepairDiagnostic`];
//! document-level processing wraps it in [`NormalizeError`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// What went wrong in a block that could not be repaired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An unescaped quote inside node content is never closed
    UnbalancedQuote,
    /// No closing delimiter before the end of the line or block
    UnterminatedBracket,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnbalancedQuote => write!(f, "unbalanced quote"),
            DiagnosticKind::UnterminatedBracket => write!(f, "unterminated bracket"),
        }
    }
}

/// Actionable report for a block the normalizer refused to rewrite
///
/// Built by [`DiagnosticReporter`](crate::core::DiagnosticReporter) at the
/// failure point and never mutated afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error(
    "{message}\n  Problematic fragment: {problematic_fragment}\n  Diagram preview:\n{}",
    indent_preview(.diagram_preview)
)]
pub struct RepairDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// First few non-empty lines of the diagram
    pub diagram_preview: String,
    pub problematic_fragment: String,
    /// 1-based line inside the block, when known
    pub line: Option<usize>,
}

impl RepairDiagnostic {
    /// Attach the block line the fragment came from
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

fn indent_preview(preview: &str) -> String {
    preview
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors raised while normalizing a whole document
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Mermaid block #{index} (line {line}) could not be normalized: {source}")]
    Block {
        /// 1-based position of the block in the document
        index: usize,
        /// Document line of the opening fence
        line: usize,
        #[source]
        source: RepairDiagnostic,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl NormalizeError {
    /// Create a new block error
    pub fn block(index: usize, line: usize, source: RepairDiagnostic) -> Self {
        Self::Block {
            index,
            line,
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The underlying diagnostic, for block errors
    pub fn diagnostic(&self) -> Option<&RepairDiagnostic> {
        match self {
            NormalizeError::Block { source, .. } => Some(source),
            NormalizeError::Config { .. } => None,
        }
    }
}
