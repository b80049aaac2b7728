//! Message line recognition
//!
//! Sequence messages look like `From->>To: text`. The autofix rules only
//! need to know where the arrow is, where the message text starts and
//! whether the arrow carries an activation shorthand (`->>+`, `-->>-`).

use std::ops::Range;

/// Message arrow tokens, longest first at each length
pub const MESSAGE_ARROWS: [&str; 8] = ["-->>", "--x", "--)", "-->", "->>", "-x", "-)", "->"];

/// Activation shorthand attached to the arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationShorthand {
    /// `A->>+B` activates the target
    Activate,
    /// `B-->>-A` deactivates the source
    Deactivate,
}

/// A recognized message line, as offsets and slices into the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine<'a> {
    pub source: &'a str,
    pub arrow: Range<usize>,
    pub shorthand: Option<ActivationShorthand>,
    pub target: &'a str,
    /// Offset where the message text starts (after `:`, or after the arrow)
    pub text_start: usize,
}

impl<'a> MessageLine<'a> {
    /// Recognize a message line, or `None` if the line has no arrow
    ///
    /// The arrow is the leftmost token occurrence; at that position the
    /// longest token wins, so `<<->>` finds `->>` and leaves `<<` to the
    /// left of it.
    pub fn parse(line: &'a str) -> Option<Self> {
        let arrow = find_arrow(line)?;
        let after = &line[arrow.end..];
        let (shorthand, after_marker) = match after.chars().next() {
            Some('+') => (Some(ActivationShorthand::Activate), arrow.end + 1),
            Some('-') => (Some(ActivationShorthand::Deactivate), arrow.end + 1),
            _ => (None, arrow.end),
        };

        let (target_end, text_start) = match line[after_marker..].find(':') {
            Some(colon) => (after_marker + colon, after_marker + colon + 1),
            None => (line.len(), arrow.end),
        };

        Some(Self {
            source: line[..arrow.start].trim(),
            arrow,
            shorthand,
            target: line[after_marker..target_end].trim(),
            text_start,
        })
    }

    /// Participant whose activation the shorthand changes
    pub fn shorthand_participant(&self) -> Option<(ActivationShorthand, &'a str)> {
        match self.shorthand? {
            ActivationShorthand::Activate if !self.target.is_empty() => {
                Some((ActivationShorthand::Activate, self.target))
            }
            ActivationShorthand::Deactivate if !self.source.is_empty() => {
                Some((ActivationShorthand::Deactivate, self.source))
            }
            _ => None,
        }
    }
}

/// Span of the leftmost message arrow in `line`
pub fn find_arrow(line: &str) -> Option<Range<usize>> {
    line.match_indices('-').find_map(|(at, _)| {
        MESSAGE_ARROWS
            .iter()
            .find(|token| line[at..].starts_with(*token))
            .map(|token| at..at + token.len())
    })
}
