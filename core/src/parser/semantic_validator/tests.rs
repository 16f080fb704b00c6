//! Tests for the semantic validation system

use super::*;
use crate::parser::compile_report;

// ============================================================================
// Helper Functions
// ============================================================================

/// Compile source and validate, returning errors
fn validate(source: &str) -> Vec<ValidationError> {
    validate_program(&compile_report(source))
}

/// Check if errors contain a specific rule
fn has_rule(errors: &[ValidationError], rule_id: &str) -> bool {
    errors.iter().any(|e| e.rule_id == rule_id)
}

/// Get errors for a specific rule
fn for_rule<'a>(errors: &'a [ValidationError], rule_id: &str) -> Vec<&'a ValidationError> {
    errors.iter().filter(|e| e.rule_id == rule_id).collect()
}

const CLEAN: &str = r#"
inicio:
mensagem:
"Olá!"
botao 1:
"Planos" -> planos
"Atendente" -> atendimento_humano

fluxo planos:
mensagem:
"Básico ou Premium?"
botao 1:
"Voltar" -> inicio
fim
"#;

#[test]
fn test_clean_program_has_no_errors() {
    let errors = validate(CLEAN);
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
    assert!(!has_errors(&compile_report(CLEAN)));
}

// ============================================================================
// Missing Entry Tests
// ============================================================================

#[test]
fn test_missing_entry() {
    let errors = validate("fluxo ajuda:\nmensagem:\n\"Ajuda\"");

    let missing = for_rule(&errors, "missing-entry");
    assert_eq!(missing.len(), 1);
    assert!(missing[0].is_error());
    assert_eq!(missing[0].line, 0);
}

#[test]
fn test_entry_without_message_counts_as_missing() {
    let errors = validate("inicio:\nmensagem:\nfim");
    assert!(has_rule(&errors, "missing-entry"));
}

#[test]
fn test_empty_source_is_missing_entry() {
    let errors = validate("");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule_id, "missing-entry");
}

// ============================================================================
// Undefined Target Tests
// ============================================================================

#[test]
fn test_undefined_target() {
    let source = r#"
inicio:
mensagem:
"Oi"
botao 1:
"Planos" -> planoss
"#;
    let errors = validate(source);

    let undefined = for_rule(&errors, "undefined-target");
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].line, 2);
    assert!(undefined[0].message.contains("'planoss'"));
    assert!(has_errors(&compile_report(source)));
}

#[test]
fn test_handoff_target_is_always_defined() {
    let source = "inicio:\nmensagem:\n\"Oi\"\nbotao 1:\n\"Humano\" -> atendimento_humano";
    assert!(!has_rule(&validate(source), "undefined-target"));
}

#[test]
fn test_target_dropped_for_empty_message_is_undefined() {
    let source = r#"
inicio:
mensagem:
"Oi"
botao 1:
"Vazio" -> vazio
fluxo vazio:
mensagem:
"#;
    let errors = validate(source);
    assert!(has_rule(&errors, "undefined-target"));
    assert!(has_rule(&errors, "skipped-line"));
}

// ============================================================================
// Unreachable Flow Tests
// ============================================================================

#[test]
fn test_unreachable_flow() {
    let source = r#"
inicio:
mensagem:
"Oi"
fluxo isolado:
mensagem:
"Ninguém chega aqui"
"#;
    let errors = validate(source);

    let unreachable = for_rule(&errors, "unreachable-flow");
    assert_eq!(unreachable.len(), 1);
    assert_eq!(unreachable[0].severity, Severity::Warning);
    assert_eq!(unreachable[0].line, 5);
    assert!(!has_errors(&compile_report(source)));
}

#[test]
fn test_reachability_follows_chains_and_cycles() {
    let source = r#"
inicio:
mensagem:
"1"
botao 1:
"a" -> a
fluxo a:
mensagem:
"2"
botao 1:
"b" -> b
fluxo b:
mensagem:
"3"
botao 1:
"volta" -> a
"#;
    assert!(!has_rule(&validate(source), "unreachable-flow"));
}

#[test]
fn test_unreachable_skipped_without_entry() {
    let errors = validate("fluxo a:\nmensagem:\n\"x\"\nfluxo b:\nmensagem:\n\"y\"");
    assert!(!has_rule(&errors, "unreachable-flow"));
}

// ============================================================================
// Skipped Line Tests
// ============================================================================

#[test]
fn test_skipped_lines_become_warnings() {
    let source = "inicio:\nmensagem:\n\"Oi\"\nbotao 1:\n\"Ir\" -> x y";
    let errors = validate(source);

    let skipped = for_rule(&errors, "skipped-line");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].line, 5);
    assert!(skipped[0].message.contains("unrecognized"));
}

// ============================================================================
// Validator
// ============================================================================

#[test]
fn test_errors_sorted_by_line() {
    let source = "???\nfluxo a:\nmensagem:\n\"a\"\n!!!";
    let lines: Vec<usize> = validate(source).iter().map(|e| e.line).collect();

    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
}

#[test]
fn test_rules_listing() {
    let ids: Vec<&str> = Validator::new().rules().map(|(id, _)| id).collect();
    assert_eq!(
        ids,
        vec![
            "missing-entry",
            "undefined-target",
            "unreachable-flow",
            "skipped-line"
        ]
    );
}

#[test]
fn test_display() {
    let located = ValidationError::warning(3, "algo", "skipped-line");
    let global = ValidationError::error(0, "nada", "missing-entry");

    assert_eq!(located.to_string(), "warning at line 3: algo [skipped-line]");
    assert_eq!(global.to_string(), "error: nada [missing-entry]");
}
