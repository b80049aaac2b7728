//! Core type definitions for diagram normalization
//!
//! This module contains the fundamental types shared by every pass:
//! diagram dialects, node bracket shapes, extracted blocks and the
//! node occurrences produced while scanning a block.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Diagram dialect of a Mermaid block, taken from its first keyword
///
/// Anything unrecognized is `Other` and passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramType {
    /// `flowchart` / `graph`
    Flowchart,
    /// `sequenceDiagram`
    SequenceDiagram,
    /// `classDiagram`
    ClassDiagram,
    /// Any other (or missing) keyword
    #[default]
    Other,
}

/// Keyword table used by [`DiagramType::classify`]
const KEYWORDS: [(&str, DiagramType); 6] = [
    ("flowchart", DiagramType::Flowchart),
    ("graph", DiagramType::Flowchart),
    ("flowchart-elk", DiagramType::Flowchart),
    ("sequenceDiagram", DiagramType::SequenceDiagram),
    ("classDiagram", DiagramType::ClassDiagram),
    ("classDiagram-v2", DiagramType::ClassDiagram),
];

impl DiagramType {
    /// Classify a block by its first non-blank token
    ///
    /// Leading `%%` comment/directive lines and a `---` front-matter
    /// block are skipped first. The keyword comparison is exact, the
    /// same way the renderer reads it.
    ///
    /// # Example
    /// ```
    /// use mermaid_mend::DiagramType;
    ///
    /// assert_eq!(DiagramType::classify("graph TD\n  A-->B"), DiagramType::Flowchart);
    /// assert_eq!(DiagramType::classify("pie\n  \"a\": 1"), DiagramType::Other);
    /// ```
    pub fn classify(text: &str) -> Self {
        let Some(token) = first_token(text) else {
            return DiagramType::Other;
        };

        // `graph;` and `flowchart;` are legal one-line headers
        let token = token.trim_end_matches(';');

        KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == token)
            .map(|(_, kind)| *kind)
            .unwrap_or(DiagramType::Other)
    }

    /// Returns true for dialects whose nodes use bracket label syntax
    pub fn has_bracket_nodes(&self) -> bool {
        matches!(self, DiagramType::Flowchart)
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramType::Flowchart => write!(f, "flowchart"),
            DiagramType::SequenceDiagram => write!(f, "sequenceDiagram"),
            DiagramType::ClassDiagram => write!(f, "classDiagram"),
            DiagramType::Other => write!(f, "other"),
        }
    }
}

fn first_token(text: &str) -> Option<&str> {
    let mut lines = text.lines().map(str::trim).peekable();

    if lines.peek() == Some(&"---") {
        lines.next();
        for line in lines.by_ref() {
            if line == "---" {
                break;
            }
        }
    }

    lines
        .filter(|line| !line.is_empty() && !line.starts_with("%%"))
        .find_map(|line| line.split_whitespace().next())
}

/// Node bracket dialects matching Mermaid.js flowchart syntax
///
/// Several openers share a prefix (`(` is a prefix of `((` and `(((`,
/// `[` of `[[` and `[(`), so matching must walk [`BracketKind::PRIORITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    /// Rectangle: `A[label]`
    Rectangle,
    /// Rounded rectangle: `A(label)`
    Rounded,
    /// Rhombus (decision): `A{label}`
    Rhombus,
    /// Circle: `A((label))`
    Circle,
    /// Double circle: `A(((label)))`
    DoubleCircle,
    /// Subroutine: `A[[label]]`
    Subroutine,
    /// Database (cylinder): `A[(label)]`
    Database,
    /// Stadium: `A([label])`
    Stadium,
    /// Hexagon: `A{{label}}`
    Hexagon,
    /// Parallelogram: `A[/label/]`
    LeanRight,
    /// Alternate parallelogram: `A[\label\]`
    LeanLeft,
    /// Trapezoid: `A[/label\]`
    Trapezoid,
    /// Inverted trapezoid: `A[\label/]`
    InvTrapezoid,
}

impl BracketKind {
    /// Probe order: longest openers first, then single characters
    pub const PRIORITY: [BracketKind; 13] = [
        BracketKind::DoubleCircle,
        BracketKind::Subroutine,
        BracketKind::Database,
        BracketKind::Circle,
        BracketKind::Stadium,
        BracketKind::Hexagon,
        BracketKind::LeanRight,
        BracketKind::Trapezoid,
        BracketKind::LeanLeft,
        BracketKind::InvTrapezoid,
        BracketKind::Rectangle,
        BracketKind::Rounded,
        BracketKind::Rhombus,
    ];

    /// Opening delimiter
    pub fn open(&self) -> &'static str {
        self.delimiters().0
    }

    /// Closing delimiter
    pub fn close(&self) -> &'static str {
        self.delimiters().1
    }

    /// `(open, close)` pair for this dialect
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            BracketKind::Rectangle => ("[", "]"),
            BracketKind::Rounded => ("(", ")"),
            BracketKind::Rhombus => ("{", "}"),
            BracketKind::Circle => ("((", "))"),
            BracketKind::DoubleCircle => ("(((", ")))"),
            BracketKind::Subroutine => ("[[", "]]"),
            BracketKind::Database => ("[(", ")]"),
            BracketKind::Stadium => ("([", "])"),
            BracketKind::Hexagon => ("{{", "}}"),
            BracketKind::LeanRight => ("[/", "/]"),
            BracketKind::LeanLeft => ("[\\", "\\]"),
            BracketKind::Trapezoid => ("[/", "\\]"),
            BracketKind::InvTrapezoid => ("[\\", "/]"),
        }
    }

    /// Returns true if the opener is longer than one character
    pub fn is_compound(&self) -> bool {
        self.open().len() > 1
    }

    /// Dialects whose opener matches at the start of `rest`, in probe order
    pub fn candidates(rest: &str) -> impl Iterator<Item = BracketKind> + '_ {
        Self::PRIORITY
            .into_iter()
            .filter(move |kind| rest.starts_with(kind.open()))
    }
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Rectangle => write!(f, "rectangle"),
            BracketKind::Rounded => write!(f, "rounded"),
            BracketKind::Rhombus => write!(f, "rhombus"),
            BracketKind::Circle => write!(f, "circle"),
            BracketKind::DoubleCircle => write!(f, "double-circle"),
            BracketKind::Subroutine => write!(f, "subroutine"),
            BracketKind::Database => write!(f, "database"),
            BracketKind::Stadium => write!(f, "stadium"),
            BracketKind::Hexagon => write!(f, "hexagon"),
            BracketKind::LeanRight => write!(f, "lean-right"),
            BracketKind::LeanLeft => write!(f, "lean-left"),
            BracketKind::Trapezoid => write!(f, "trapezoid"),
            BracketKind::InvTrapezoid => write!(f, "inverted-trapezoid"),
        }
    }
}

/// A fenced Mermaid block found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramBlock {
    pub diagram_type: DiagramType,
    /// Block body, without the fence lines
    pub raw_text: String,
    /// Byte offset of `raw_text` in the document
    pub start_offset: usize,
    /// Byte offset just past `raw_text`
    pub end_offset: usize,
    /// Byte offset of the opening fence line
    pub fence_start: usize,
    /// 1-based document line of the opening fence
    pub line: usize,
}

impl DiagramBlock {
    /// Document span covered by the block body
    pub fn span(&self) -> Range<usize> {
        self.start_offset..self.end_offset
    }
}

/// A node declaration found by the scanner
///
/// Borrowed from the block text and only alive while the block is scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOccurrence<'a> {
    pub identifier: &'a str,
    pub bracket_kind: BracketKind,
    /// Text between the delimiters, exactly as written
    pub raw_content: &'a str,
    /// Byte span from the identifier to the end of the closing delimiter
    pub span: Range<usize>,
}

impl fmt::Display for NodeOccurrence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = self.bracket_kind.delimiters();
        write!(f, "{}{}{}{}", self.identifier, open, self.raw_content, close)
    }
}
