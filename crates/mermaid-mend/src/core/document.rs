//! Fenced Mermaid block detection
//!
//! Walks a Markdown document line by line with CommonMark fence rules and
//! returns every ` ```mermaid ` block with its byte offsets. Fences of other
//! languages are tracked too, so a Mermaid example quoted inside a longer
//! fence is left alone.

use tracing::{trace, warn};

use super::types::{DiagramBlock, DiagramType};

/// Info-string language that marks a diagram block
pub const MERMAID_INFO: &str = "mermaid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenFence {
    marker: char,
    length: usize,
    is_mermaid: bool,
    fence_start: usize,
    content_start: usize,
    line: usize,
}

/// Find every fenced Mermaid block in `document`
///
/// # Example
/// ```
/// use mermaid_mend::core::extract_blocks;
/// use mermaid_mend::DiagramType;
///
/// let doc = "# Title\n\n```mermaid\ngraph TD\n  A-->B\n```\n";
/// let blocks = extract_blocks(doc);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].raw_text, "graph TD\n  A-->B");
/// assert_eq!(blocks[0].diagram_type, DiagramType::Flowchart);
/// assert_eq!(&doc[blocks[0].span()], "graph TD\n  A-->B");
/// ```
pub fn extract_blocks(document: &str) -> Vec<DiagramBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenFence> = None;
    let mut offset = 0;

    for (index, line) in document.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        match open {
            None => {
                if let Some((marker, length, info)) = fence_opener(content) {
                    let is_mermaid = info.split_whitespace().next() == Some(MERMAID_INFO);
                    trace!(line = index + 1, is_mermaid, "Fence opened");
                    open = Some(OpenFence {
                        marker,
                        length,
                        is_mermaid,
                        fence_start: line_start,
                        content_start: offset,
                        line: index + 1,
                    });
                }
            }
            Some(fence) => {
                if !is_fence_closer(content, fence.marker, fence.length) {
                    continue;
                }
                open = None;
                if !fence.is_mermaid {
                    continue;
                }

                let body_start = fence.content_start.min(line_start);
                let body = strip_final_newline(&document[body_start..line_start]);
                blocks.push(DiagramBlock {
                    diagram_type: DiagramType::classify(body),
                    raw_text: body.to_string(),
                    start_offset: body_start,
                    end_offset: body_start + body.len(),
                    fence_start: fence.fence_start,
                    line: fence.line,
                });
            }
        }
    }

    if let Some(fence) = open {
        if fence.is_mermaid {
            warn!(line = fence.line, "Unterminated mermaid fence, block skipped");
        }
    }

    blocks
}

fn strip_final_newline(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
fn leading_whitespace(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => col += 1,
            b'\t' => col += 4 - (col % 4),
            _ => break,
        }
        bytes += 1;
    }
    (col, bytes)
}

fn marker_run(text: &str) -> Option<(char, usize)> {
    let first = text.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let length = text.chars().take_while(|c| *c == first).count();
    (length >= 3).then_some((first, length))
}

/// Parse an opening fence: (marker, run length, info string)
fn fence_opener(line: &str) -> Option<(char, usize, &str)> {
    let (indent, bytes) = leading_whitespace(line);
    if indent > 3 {
        return None;
    }
    let after_indent = &line[bytes..];
    let (marker, length) = marker_run(after_indent)?;
    let info = after_indent[length..].trim();
    // CommonMark: backtick fences cannot carry backticks in the info string
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some((marker, length, info))
}

fn is_fence_closer(line: &str, marker: char, min_length: usize) -> bool {
    let (indent, bytes) = leading_whitespace(line);
    if indent > 3 {
        return false;
    }
    let after_indent = &line[bytes..];
    match marker_run(after_indent) {
        Some((found, length)) => {
            found == marker && length >= min_length && after_indent[length..].trim().is_empty()
        }
        None => false,
    }
}
