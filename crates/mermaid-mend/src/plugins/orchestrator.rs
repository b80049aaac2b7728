//! Normalization pipeline
//!
//! The orchestrator picks the passes for a block from its diagram type and
//! the configured capabilities, runs them in order and, for documents,
//! splices the results back between the fences:
//! Fence scan → Classify → Autofix rules → Node quoting → Splice

use serde::Serialize;
use tracing::{debug, info, span, warn, Level};

use crate::core::{
    extract_blocks, Autofix, Capabilities, DiagnosticReporter, DiagramBlock, DiagramType,
    FailurePolicy, FixNote, NormalizeError, NormalizerConfig, RepairDiagnostic,
};
use crate::plugins::class::StereotypeStripper;
use crate::plugins::flowchart::NodeScanner;
use crate::plugins::sequence::{ActivationStackCorrector, ReservedMarkerRewriter};

/// One step of the block pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    ReservedMarkers,
    ActivationStack,
    Stereotypes,
    NodeQuoting,
}

impl Pass {
    /// Passes for a diagram type, in execution order
    ///
    /// Line-oriented autofix rules run before the character-oriented node
    /// scanner.
    pub fn plan(diagram_type: DiagramType, capabilities: Capabilities) -> Vec<Pass> {
        match diagram_type {
            DiagramType::Flowchart if capabilities.node_quoting => vec![Pass::NodeQuoting],
            DiagramType::SequenceDiagram if capabilities.sequence_autofix => {
                vec![Pass::ReservedMarkers, Pass::ActivationStack]
            }
            DiagramType::ClassDiagram if capabilities.class_autofix => vec![Pass::Stereotypes],
            DiagramType::Flowchart
            | DiagramType::SequenceDiagram
            | DiagramType::ClassDiagram
            | DiagramType::Other => Vec::new(),
        }
    }
}

/// Result of normalizing one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOutcome {
    pub diagram_type: DiagramType,
    pub text: String,
    pub notes: Vec<FixNote>,
}

/// What happened to one block of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    /// 1-based position of the block in the document
    pub index: usize,
    /// Document line of the opening fence
    pub line: usize,
    pub diagram_type: DiagramType,
    /// Whether the block text in the output differs from the input
    pub changed: bool,
    pub notes: Vec<FixNote>,
    /// Set when the block was kept as is because it could not be repaired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<RepairDiagnostic>,
}

/// Result of normalizing a whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub text: String,
    pub blocks: Vec<BlockReport>,
}

impl DocumentOutcome {
    /// Blocks that were left unrepaired
    pub fn failed_blocks(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks.iter().filter(|block| block.diagnostic.is_some())
    }

    /// Total number of fixes applied across all blocks
    pub fn fix_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|block| &block.notes)
            .filter(|note| note.level == crate::core::NoteLevel::Fixed)
            .count()
    }

    /// Serialize the block reports and output as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Normalizes Mermaid blocks so a strict renderer accepts them
///
/// Holds no per-block state; one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    reserved_markers: ReservedMarkerRewriter,
    activation_stack: ActivationStackCorrector,
    stereotypes: StereotypeStripper,
    scanner: NodeScanner,
}

impl Normalizer {
    /// Normalizer with the default configuration (all passes, keep original on failure)
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer with an explicit configuration
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self {
            config,
            scanner: NodeScanner::with_reporter(DiagnosticReporter::with_preview(
                config.preview_lines,
                config.preview_width,
            )),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    fn autofix(&self, pass: Pass) -> Option<&dyn Autofix> {
        match pass {
            Pass::ReservedMarkers => Some(&self.reserved_markers),
            Pass::ActivationStack => Some(&self.activation_stack),
            Pass::Stereotypes => Some(&self.stereotypes),
            Pass::NodeQuoting => None,
        }
    }

    /// Normalize the body of one Mermaid block
    ///
    /// Either the fully rewritten block is returned or a diagnostic; the
    /// caller never sees partially rewritten text.
    pub fn normalize_block(&self, text: &str) -> Result<BlockOutcome, RepairDiagnostic> {
        let diagram_type = DiagramType::classify(text);
        let block_span = span!(Level::DEBUG, "normalize_block", %diagram_type, input_len = text.len());
        let _enter = block_span.enter();

        let mut current = text.to_string();
        let mut notes = Vec::new();

        for pass in Pass::plan(diagram_type, self.config.capabilities) {
            match self.autofix(pass) {
                Some(rule) => {
                    let outcome = rule.apply(&current);
                    if !outcome.notes.is_empty() {
                        debug!(rule = rule.name(), fixes = outcome.fix_count(), "Autofix applied");
                    }
                    current = outcome.text;
                    notes.extend(outcome.notes);
                }
                None => {
                    current = self.scanner.rewrite(&current)?;
                }
            }
        }

        Ok(BlockOutcome {
            diagram_type,
            text: current,
            notes,
        })
    }

    /// Normalize every fenced Mermaid block of a Markdown document
    ///
    /// Text outside the blocks is copied through unchanged. A block that
    /// cannot be repaired is handled by the configured [`FailurePolicy`].
    pub fn normalize_document(&self, document: &str) -> Result<DocumentOutcome, NormalizeError> {
        self.config.validate()?;

        let doc_span = span!(Level::INFO, "normalize_document", input_len = document.len());
        let _enter = doc_span.enter();

        let blocks = extract_blocks(document);
        info!(blocks = blocks.len(), "Found mermaid blocks");

        let mut text = String::with_capacity(document.len());
        let mut cursor = 0;
        let mut reports = Vec::with_capacity(blocks.len());

        for (position, block) in blocks.iter().enumerate() {
            let index = position + 1;
            match self.normalize_block(&block.raw_text) {
                Ok(outcome) => {
                    text.push_str(&document[cursor..block.start_offset]);
                    text.push_str(&outcome.text);
                    cursor = block.end_offset;
                    reports.push(BlockReport {
                        index,
                        line: block.line,
                        diagram_type: outcome.diagram_type,
                        changed: outcome.text != block.raw_text,
                        notes: outcome.notes,
                        diagnostic: None,
                    });
                }
                Err(diagnostic) => {
                    if self.config.failure_policy == FailurePolicy::Abort {
                        return Err(NormalizeError::block(index, block.line, diagnostic));
                    }
                    warn!(
                        block = index,
                        line = block.line,
                        policy = %self.config.failure_policy,
                        "{}",
                        diagnostic.message
                    );
                    if self.config.failure_policy == FailurePolicy::Annotate {
                        text.push_str(&document[cursor..block.fence_start]);
                        text.push_str(&annotation(block, &diagnostic));
                        cursor = block.fence_start;
                    }
                    reports.push(BlockReport {
                        index,
                        line: block.line,
                        diagram_type: block.diagram_type,
                        changed: false,
                        notes: Vec::new(),
                        diagnostic: Some(diagnostic),
                    });
                }
            }
        }
        text.push_str(&document[cursor..]);

        let outcome = DocumentOutcome {
            text,
            blocks: reports,
        };
        info!(
            fixes = outcome.fix_count(),
            failed = outcome.failed_blocks().count(),
            "Document normalization completed"
        );
        Ok(outcome)
    }
}

/// Markdown blockquote placed before a block that was kept unrepaired
fn annotation(block: &DiagramBlock, diagnostic: &RepairDiagnostic) -> String {
    let mut note = format!(
        "> **Warning:** Mermaid diagram at line {} was left unchanged: {}\n",
        block.line, diagnostic.message
    );
    let fragment = diagnostic.problematic_fragment.trim();
    if !fragment.is_empty() {
        note.push_str(&format!(">\n> Problematic fragment: `` {fragment} ``\n"));
    }
    note.push('\n');
    note
}
