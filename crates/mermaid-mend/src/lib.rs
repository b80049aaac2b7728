//! mermaid-mend - Repair Mermaid diagram sources for strict renderers
//!
//! Scans Mermaid snippets embedded in Markdown and rewrites them so a
//! strict renderer accepts them: node labels with non-ASCII text or `@`
//! are quoted, reserved `<<...>>` markers in sequence messages become
//! `«...»`, mismatched `deactivate` directives are corrected and
//! stand-alone class stereotypes are removed. When a block cannot be
//! repaired safely, a [`RepairDiagnostic`] explains where and why.
//!
//! # Quick Start
//!
//! ```rust
//! use mermaid_mend::normalize;
//!
//! let fixed = normalize("flowchart TD\n    A[Привет мир] --> B((Готово))").unwrap();
//! assert_eq!(fixed, "flowchart TD\n    A[\"Привет мир\"] --> B((\"Готово\"))");
//! ```
//!
//! # Documents
//!
//! ```rust
//! use mermaid_mend::prelude::*;
//!
//! let doc = "# Flow\n\n```mermaid\nsequenceDiagram\n    Service->>Ord: <<create>>\n```\n";
//!
//! let normalizer = Normalizer::with_config(
//!     NormalizerConfig::new().with_failure_policy(FailurePolicy::Annotate),
//! );
//! let outcome = normalizer.normalize_document(doc).unwrap();
//! assert!(outcome.text.contains("Service->>Ord: «create»"));
//! assert_eq!(outcome.blocks[0].diagram_type, DiagramType::SequenceDiagram);
//! ```

pub mod core;
pub mod plugins;

pub use core::*;
pub use plugins::orchestrator::{BlockOutcome, BlockReport, DocumentOutcome, Normalizer, Pass};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Autofix, Capabilities, DiagnosticKind, DiagramType, FailurePolicy, FixNote, FixOutcome,
        NormalizeError, NormalizerConfig, OutputMode, RepairDiagnostic,
    };
    pub use crate::plugins::orchestrator::{BlockOutcome, DocumentOutcome, Normalizer};
}

/// Normalize one Mermaid block with the default configuration
///
/// # Arguments
/// * `block` - The block body, without the fence lines
///
/// # Returns
/// * `Ok(String)` - The rewritten block
/// * `Err` - A [`RepairDiagnostic`] if the block cannot be repaired safely
///
/// # Example
/// ```rust
/// use mermaid_mend::{normalize, RepairDiagnostic};
///
/// let err = normalize("graph TD\n  A[Текст с \"незакрытой кавычкой]").unwrap_err();
/// let diagnostic = err.downcast_ref::<RepairDiagnostic>().unwrap();
/// assert!(diagnostic.problematic_fragment.contains("A[Текст"));
/// ```
pub fn normalize(block: &str) -> anyhow::Result<String> {
    let outcome = Normalizer::new().normalize_block(block)?;
    Ok(outcome.text)
}

/// Normalize every fenced Mermaid block of a Markdown document
///
/// Blocks that cannot be repaired are kept as they are and logged.
///
/// # Example
/// ```rust
/// use mermaid_mend::normalize_document;
///
/// let doc = "Text\n\n```mermaid\ngraph LR\n  A[Старт] --> B[End]\n```\n";
/// let fixed = normalize_document(doc).unwrap();
/// assert_eq!(fixed, "Text\n\n```mermaid\ngraph LR\n  A[\"Старт\"] --> B[End]\n```\n");
/// ```
pub fn normalize_document(document: &str) -> anyhow::Result<String> {
    let outcome = Normalizer::new().normalize_document(document)?;
    Ok(outcome.text)
}

/// Quote the node labels of a flowchart block without other passes
///
/// # Example
/// ```rust
/// use mermaid_mend::rewrite_nodes;
///
/// assert_eq!(rewrite_nodes("A[@property]").unwrap(), "A[\"@property\"]");
/// ```
pub fn rewrite_nodes(block: &str) -> anyhow::Result<String> {
    Ok(plugins::flowchart::rewrite_nodes(block)?)
}
