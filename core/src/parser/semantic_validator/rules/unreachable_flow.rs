//! Rule: Unreachable Flow
//!
//! Reports a warning for each flow that no chain of buttons starting at
//! `inicio` can reach. Skipped when there is no `inicio` at all, since
//! `missing-entry` already covers that case.

use std::collections::{BTreeSet, VecDeque};

use crate::parser::Compilation;
use crate::types::ENTRY_FLOW;

use super::super::{ValidationError, ValidationRule};

pub struct UnreachableFlowRule;

impl ValidationRule for UnreachableFlowRule {
    fn id(&self) -> &'static str {
        "unreachable-flow"
    }

    fn description(&self) -> &'static str {
        "Every flow should be reachable from 'inicio'"
    }

    fn validate(&self, compilation: &Compilation) -> Vec<ValidationError> {
        let program = &compilation.program;
        if !program.contains(ENTRY_FLOW) {
            return Vec::new();
        }

        let mut reached: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([ENTRY_FLOW]);
        while let Some(name) = queue.pop_front() {
            if !reached.insert(name) {
                continue;
            }
            if let Some(flow) = program.get(name) {
                queue.extend(
                    flow.buttons
                        .iter()
                        .map(|b| b.target_flow.as_str())
                        .filter(|t| program.contains(t)),
                );
            }
        }

        program
            .names()
            .filter(|name| !reached.contains(name))
            .map(|name| {
                ValidationError::warning(
                    compilation.flow_lines.get(name).copied().unwrap_or(0),
                    format!("flow '{}' is not reachable from '{}'", name, ENTRY_FLOW),
                    self.id(),
                )
            })
            .collect()
    }
}
