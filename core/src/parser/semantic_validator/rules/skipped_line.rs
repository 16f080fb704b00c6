//! Rule: Skipped Line
//!
//! Surfaces every construct the compiler ignored as a warning: unrecognized
//! lines, text or buttons outside their block, flows without a message and
//! redefinitions.

use crate::parser::Compilation;

use super::super::{ValidationError, ValidationRule};

pub struct SkippedLineRule;

impl ValidationRule for SkippedLineRule {
    fn id(&self) -> &'static str {
        "skipped-line"
    }

    fn description(&self) -> &'static str {
        "Lines the compiler could not use"
    }

    fn validate(&self, compilation: &Compilation) -> Vec<ValidationError> {
        compilation
            .notes
            .iter()
            .map(|note| ValidationError::warning(note.line, note.kind.to_string(), self.id()))
            .collect()
    }
}
