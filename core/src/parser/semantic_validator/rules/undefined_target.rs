//! Rule: Undefined Target
//!
//! Reports an error for each button whose target is neither a compiled flow
//! nor the reserved handoff action. Pressing such a button only produces the
//! fallback message.
//!
//! ```text
//! inicio:
//! mensagem:
//! "Oi"
//! botao 1:
//! "Planos" -> planoss   // error: no flow 'planoss'
//! ```

use crate::parser::Compilation;
use crate::types::HANDOFF_TARGET;

use super::super::{ValidationError, ValidationRule};

pub struct UndefinedTargetRule;

impl ValidationRule for UndefinedTargetRule {
    fn id(&self) -> &'static str {
        "undefined-target"
    }

    fn description(&self) -> &'static str {
        "Buttons must lead to a defined flow or to the human handoff"
    }

    fn validate(&self, compilation: &Compilation) -> Vec<ValidationError> {
        let program = &compilation.program;

        program
            .flows()
            .flat_map(|flow| {
                let line = compilation.flow_lines.get(&flow.name).copied().unwrap_or(0);
                flow.buttons
                    .iter()
                    .filter(move |b| {
                        b.target_flow != HANDOFF_TARGET && !program.contains(&b.target_flow)
                    })
                    .map(move |b| {
                        ValidationError::error(
                            line,
                            format!(
                                "button '{}' in flow '{}' leads to undefined flow '{}'",
                                b.label, flow.name, b.target_flow
                            ),
                            self.id(),
                        )
                    })
            })
            .collect()
    }
}
