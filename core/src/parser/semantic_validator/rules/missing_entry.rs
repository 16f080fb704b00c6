//! Rule: Missing Entry
//!
//! Reports an error when the program has no `inicio` flow. Without it a
//! conversation starts with no message at all.

use crate::parser::Compilation;
use crate::types::ENTRY_FLOW;

use super::super::{ValidationError, ValidationRule};

pub struct MissingEntryRule;

impl ValidationRule for MissingEntryRule {
    fn id(&self) -> &'static str {
        "missing-entry"
    }

    fn description(&self) -> &'static str {
        "Programs must define an 'inicio' flow with a message"
    }

    fn validate(&self, compilation: &Compilation) -> Vec<ValidationError> {
        if compilation.program.contains(ENTRY_FLOW) {
            return Vec::new();
        }
        vec![ValidationError::error(
            0,
            format!("no '{}' flow with a message is defined", ENTRY_FLOW),
            self.id(),
        )]
    }
}
