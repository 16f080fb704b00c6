pub mod cli;
pub mod config;
pub mod parser;
pub mod preview;
pub mod runtime;
pub mod types;

// Re-export main types
pub use types::*;

// Re-export the compiler and runtime entry points for convenience
pub use parser::{compile, compile_report, Compilation};
pub use runtime::{Intent, Runtime, RuntimeOptions, SessionError};
