//! Validation Rules
//!
//! Each file in this module contains one validation rule:
//!
//! - `missing_entry.rs` - No `inicio` flow to start the conversation
//! - `undefined_target.rs` - Buttons leading to flows that do not exist
//! - `unreachable_flow.rs` - Flows no button path from `inicio` reaches
//! - `skipped_line.rs` - Constructs the compiler ignored

mod missing_entry;
mod skipped_line;
mod undefined_target;
mod unreachable_flow;

pub use missing_entry::MissingEntryRule;
pub use skipped_line::SkippedLineRule;
pub use undefined_target::UndefinedTargetRule;
pub use unreachable_flow::UnreachableFlowRule;
