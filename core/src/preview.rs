//! Design-time preview
//!
//! Keeps a flow being edited compiled, validated and running side by side.
//! Every source update recompiles and hot-swaps the program into the live
//! preview conversation, so the author sees the effect of an edit without
//! losing their place.

use std::sync::Arc;

use tracing::debug;

use crate::parser::semantic_validator::{validate_program, ValidationError};
use crate::parser::{compile_report, source_hash, Compilation};
use crate::runtime::{Runtime, RuntimeOptions};

#[derive(Debug)]
pub struct Preview {
    version: String,
    compilation: Compilation,
    diagnostics: Vec<ValidationError>,
    runtime: Runtime,
}

impl Preview {
    pub fn new(source: &str, options: RuntimeOptions) -> Self {
        let compilation = compile_report(source);
        let diagnostics = validate_program(&compilation);
        let runtime = Runtime::with_options(Arc::new(compilation.program.clone()), options);

        Self {
            version: source_hash(source),
            compilation,
            diagnostics,
            runtime,
        }
    }

    /// Apply an edit. Returns false when the source did not change.
    pub fn update_source(&mut self, source: &str) -> bool {
        let version = source_hash(source);
        if version == self.version {
            return false;
        }
        debug!(version = &version[..8], "preview source changed");

        self.compilation = compile_report(source);
        self.diagnostics = validate_program(&self.compilation);
        self.runtime.reload(Arc::new(self.compilation.program.clone()));
        self.version = version;
        true
    }

    /// SHA-256 of the current source
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    pub fn diagnostics(&self) -> &[ValidationError] {
        &self.diagnostics
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }
}
