//! Semantic Validation for flow programs
//!
//! Compilation never fails, so authoring mistakes (a button pointing nowhere,
//! a missing `inicio`, a typo the compiler skipped) would otherwise only show
//! up in a live conversation as a fallback message. This module runs a set of
//! rules over a [`Compilation`] and reports them for the design-time preview.
//!
//! # Usage
//!
//! ```ignore
//! use fluxo_core::parser::{compile_report, semantic_validator::validate_program};
//!
//! let compilation = compile_report(source);
//! for error in validate_program(&compilation) {
//!     eprintln!("{}", error);
//! }
//! ```
//!
//! # Adding a New Rule
//!
//! 1. Create a new file in `semantic_validator/rules/`
//! 2. Implement `ValidationRule` for your struct
//! 3. Add it to the `Validator::new()` constructor
//!
//! Validation never changes the compiled program or how it runs.

pub mod rules;

use super::Compilation;

// ============================================================================
// Validation Error Types
// ============================================================================

/// A problem found in a compiled program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// 1-based source line the issue points at (0 when it has no location)
    pub line: usize,
    /// Human-readable message
    pub message: String,
    pub severity: Severity,
    /// Which rule produced this error
    pub rule_id: &'static str,
}

/// Severity levels for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The conversation will misbehave
    Error,
    /// Probably not what the author meant
    Warning,
    /// Suggestion for improvement
    Hint,
}

impl ValidationError {
    pub fn error(line: usize, message: impl Into<String>, rule_id: &'static str) -> Self {
        Self::new(line, message, Severity::Error, rule_id)
    }

    pub fn warning(line: usize, message: impl Into<String>, rule_id: &'static str) -> Self {
        Self::new(line, message, Severity::Warning, rule_id)
    }

    #[allow(dead_code)]
    pub fn hint(line: usize, message: impl Into<String>, rule_id: &'static str) -> Self {
        Self::new(line, message, Severity::Hint, rule_id)
    }

    fn new(
        line: usize,
        message: impl Into<String>,
        severity: Severity,
        rule_id: &'static str,
    ) -> Self {
        Self {
            line,
            message: message.into(),
            severity,
            rule_id,
        }
    }

    /// Check if this is an error (not a warning or hint)
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        };
        if self.line == 0 {
            write!(f, "{}: {} [{}]", severity, self.message, self.rule_id)
        } else {
            write!(
                f,
                "{} at line {}: {} [{}]",
                severity, self.line, self.message, self.rule_id
            )
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait that all validation rules implement.
///
/// Rules are independent of each other and only read the compilation.
pub trait ValidationRule: Send + Sync {
    /// Unique identifier for this rule (e.g., "undefined-target")
    fn id(&self) -> &'static str;

    /// Human-readable description of what this rule checks
    fn description(&self) -> &'static str;

    /// Run the validation and return any errors found
    fn validate(&self, compilation: &Compilation) -> Vec<ValidationError>;
}

// ============================================================================
// Validator - Runs All Rules
// ============================================================================

/// Runs every registered rule and collects the results
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a new validator with all built-in rules.
    pub fn new() -> Self {
        Self {
            rules: vec![
                // Error rules
                Box::new(rules::MissingEntryRule),
                Box::new(rules::UndefinedTargetRule),
                // Warning rules
                Box::new(rules::UnreachableFlowRule),
                Box::new(rules::SkippedLineRule),
            ],
        }
    }

    /// Run all validation rules, ordered by line then severity
    pub fn validate(&self, compilation: &Compilation) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(compilation))
            .collect();
        errors.sort_by_key(|e| (e.line, e.severity));
        errors
    }

    /// Get a list of all registered rules
    pub fn rules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.rules.iter().map(|r| (r.id(), r.description()))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Validate a compilation with the built-in rules
pub fn validate_program(compilation: &Compilation) -> Vec<ValidationError> {
    Validator::new().validate(compilation)
}

/// Check if a compilation has any validation errors (not just warnings)
pub fn has_errors(compilation: &Compilation) -> bool {
    validate_program(compilation).iter().any(|e| e.is_error())
}

#[cfg(test)]
mod tests;
