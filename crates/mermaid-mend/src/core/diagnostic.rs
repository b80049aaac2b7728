//! Diagnostic reporter
//!
//! Builds [`RepairDiagnostic`] values with a bounded preview of the
//! diagram, so a failed block can be located without dumping the
//! whole source into the log.

use super::error::{DiagnosticKind, RepairDiagnostic};
use super::text::truncate_to_width;

/// Default number of non-empty lines shown in a preview
pub const DEFAULT_PREVIEW_LINES: usize = 5;

/// Default preview width in display columns
pub const DEFAULT_PREVIEW_WIDTH: usize = 100;

/// Builds diagnostics with a fixed preview size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticReporter {
    preview_lines: usize,
    preview_width: usize,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            preview_lines: DEFAULT_PREVIEW_LINES,
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }

    /// Reporter with a custom preview size (`width` 0 disables truncation)
    pub fn with_preview(lines: usize, width: usize) -> Self {
        Self {
            preview_lines: lines,
            preview_width: width,
        }
    }

    /// Build a diagnostic for `fragment` inside `full_diagram_text`
    pub fn build(
        &self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        full_diagram_text: &str,
        problematic_fragment: impl Into<String>,
    ) -> RepairDiagnostic {
        RepairDiagnostic {
            kind,
            message: message.into(),
            diagram_preview: self.preview(full_diagram_text),
            problematic_fragment: problematic_fragment.into(),
            line: None,
        }
    }

    /// First `preview_lines` non-empty lines, each width-limited
    pub fn preview(&self, text: &str) -> String {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .take(self.preview_lines)
            .map(|line| truncate_to_width(line.trim_end(), self.preview_width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
