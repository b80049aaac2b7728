//! Tests for diagnostic and error formatting

use std::error::Error;

use mermaid_mend::plugins::flowchart::rewrite_nodes;
use mermaid_mend::{
    DiagnosticKind, DiagnosticReporter, NormalizeError, Normalizer, NormalizerConfig,
    RepairDiagnostic,
};

fn broken_diagram() -> &'static str {
    "flowchart TD\n    A[Первая строка]\n    B[Вторая \"незакрытая]\n    C[Третья строка]\n    D[Четвёртая строка]\n    E[Пятая]\n    F[Шестая]"
}

#[test]
fn test_repair_diagnostic_display() {
    let err = rewrite_nodes(broken_diagram()).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.starts_with("Unclosed double quote in rectangle node `B`"));
    assert!(rendered.contains("\n  Problematic fragment:     B[Вторая \"незакрытая]\n"));
    assert!(rendered.contains("\n  Diagram preview:\n    flowchart TD\n"));
}

#[test]
fn test_preview_is_bounded() {
    let err = rewrite_nodes(broken_diagram()).unwrap_err();
    assert_eq!(err.diagram_preview.lines().count(), 5);
    assert!(err.diagram_preview.contains("Четвёртая"));
    assert!(!err.diagram_preview.contains("Шестая"));
}

#[test]
fn test_preview_size_follows_config() {
    let config = NormalizerConfig::new().with_preview(2, 0);
    let err = Normalizer::with_config(config)
        .normalize_block(broken_diagram())
        .unwrap_err();
    assert_eq!(err.diagram_preview, "flowchart TD\n    A[Первая строка]");
}

#[test]
fn test_preview_skips_blank_lines() {
    let reporter = DiagnosticReporter::with_preview(2, 0);
    let diagnostic = reporter.build(
        DiagnosticKind::UnterminatedBracket,
        "msg",
        "\n\ngraph TD\n\n   \n  A[x",
        "  A[x",
    );
    assert_eq!(diagnostic.diagram_preview, "graph TD\n  A[x");
}

#[test]
fn test_unterminated_bracket_message() {
    let err = rewrite_nodes("graph TD\n    A{Решение --> B").unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::UnterminatedBracket);
    assert_eq!(
        err.message,
        "Unterminated rhombus node `A`: missing closing `}`"
    );
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_malformed_label_message() {
    let err = rewrite_nodes("graph TD\n    A[Он сказал \"it's\"]").unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::UnbalancedQuote);
    assert!(err.message.starts_with("Unbalanced single quote in rectangle node `A`"));
}

#[test]
fn test_normalize_error_wraps_diagnostic() {
    let diagnostic: RepairDiagnostic = rewrite_nodes(broken_diagram()).unwrap_err();
    let err = NormalizeError::block(2, 17, diagnostic.clone());
    assert!(err
        .to_string()
        .starts_with("Mermaid block #2 (line 17) could not be normalized: Unclosed double quote"));
    assert_eq!(err.diagnostic(), Some(&diagnostic));

    let source = err.source().unwrap();
    assert_eq!(source.to_string(), diagnostic.to_string());
}

#[test]
fn test_config_error() {
    let err = NormalizeError::config("preview_lines must be at least 1");
    assert_eq!(
        err.to_string(),
        "Configuration error: preview_lines must be at least 1"
    );
    assert!(err.diagnostic().is_none());
}

#[test]
fn test_diagnostic_serializes() {
    let err = rewrite_nodes(broken_diagram()).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "unbalanced_quote");
    assert_eq!(json["line"], 3);
}
