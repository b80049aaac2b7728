//! Tests for Display implementations in core types

use mermaid_mend::core::{
    BracketKind, DiagnosticKind, DiagramType, FailurePolicy, FixNote, NodeOccurrence, OutputMode,
};

#[test]
fn test_diagram_type_display() {
    assert_eq!(DiagramType::Flowchart.to_string(), "flowchart");
    assert_eq!(DiagramType::SequenceDiagram.to_string(), "sequenceDiagram");
    assert_eq!(DiagramType::ClassDiagram.to_string(), "classDiagram");
    assert_eq!(DiagramType::Other.to_string(), "other");
}

#[test]
fn test_bracket_kind_display() {
    assert_eq!(BracketKind::Rectangle.to_string(), "rectangle");
    assert_eq!(BracketKind::Rounded.to_string(), "rounded");
    assert_eq!(BracketKind::Rhombus.to_string(), "rhombus");
    assert_eq!(BracketKind::Circle.to_string(), "circle");
    assert_eq!(BracketKind::DoubleCircle.to_string(), "double-circle");
    assert_eq!(BracketKind::Subroutine.to_string(), "subroutine");
    assert_eq!(BracketKind::Database.to_string(), "database");
    assert_eq!(BracketKind::Stadium.to_string(), "stadium");
    assert_eq!(BracketKind::Hexagon.to_string(), "hexagon");
    assert_eq!(BracketKind::LeanRight.to_string(), "lean-right");
    assert_eq!(BracketKind::LeanLeft.to_string(), "lean-left");
    assert_eq!(BracketKind::Trapezoid.to_string(), "trapezoid");
    assert_eq!(BracketKind::InvTrapezoid.to_string(), "inverted-trapezoid");
}

#[test]
fn test_diagnostic_kind_display() {
    assert_eq!(DiagnosticKind::UnbalancedQuote.to_string(), "unbalanced quote");
    assert_eq!(
        DiagnosticKind::UnterminatedBracket.to_string(),
        "unterminated bracket"
    );
}

#[test]
fn test_config_enum_display_round_trips_through_from_str() {
    for mode in [OutputMode::Html, OutputMode::Epub] {
        assert_eq!(mode.to_string().parse::<OutputMode>().unwrap(), mode);
    }
    for policy in [
        FailurePolicy::Abort,
        FailurePolicy::KeepOriginal,
        FailurePolicy::Annotate,
    ] {
        assert_eq!(policy.to_string().parse::<FailurePolicy>().unwrap(), policy);
    }
}

#[test]
fn test_node_occurrence_display() {
    let node = NodeOccurrence {
        identifier: "F",
        bracket_kind: BracketKind::Database,
        raw_content: "Хранилище",
        span: 0..22,
    };
    assert_eq!(node.to_string(), "F[(Хранилище)]");
}

#[test]
fn test_fix_note_display() {
    let note = FixNote::fixed("reserved-markers", Some(2), "<<create>> -> «create»");
    assert_eq!(
        note.to_string(),
        "[reserved-markers] fixed (line 2): <<create>> -> «create»"
    );
}
