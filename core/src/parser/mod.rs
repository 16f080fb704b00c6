//! Flow compiler
//!
//! Turns flow source into a [`ParsedProgram`]. Compilation is best-effort and
//! never fails: anything that does not fit the grammar is skipped. The skipped
//! constructs are recorded as [`CompileNote`]s by [`compile_report`] so that
//! editors can surface them, but they never change the resulting program.
//!
//! ```text
//! inicio:
//! mensagem:
//! "Olá! Como posso ajudar?"
//! botao 1:
//! "Ver planos" -> planos
//! "Falar com atendente" -> atendimento_humano
//!
//! fluxo planos:
//! mensagem:
//! "Temos os planos Básico e Premium."
//! fim
//! ```

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::types::{ButtonTransition, FlowName, FlowNode, ParsedProgram, ENTRY_FLOW};

pub mod lexer;
pub mod semantic_validator;


use lexer::{Line, LineKind};

/* ===================== Compilation Output ===================== */

/// A program together with what the compiler skipped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub program: ParsedProgram,
    pub notes: Vec<CompileNote>,
    /// Header line of the definition that ended up in the program, per flow
    pub flow_lines: BTreeMap<FlowName, usize>,
}

/// Something the compiler skipped silently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileNote {
    /// 1-based source line
    pub line: usize,
    pub kind: NoteKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteKind {
    /// The line matched no construct of the language
    UnrecognizedLine(String),
    /// A quoted line outside a `mensagem:` block
    QuotedOutsideMessage,
    /// A button line outside a `botao N:` block
    ArrowOutsideButtons,
    /// The flow declared on this line had no message and was not kept
    EmptyFlow(FlowName),
    /// The flow declared on this line replaced an earlier definition
    Redefined(FlowName),
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteKind::UnrecognizedLine(text) => write!(f, "unrecognized line ignored: {}", text),
            NoteKind::QuotedOutsideMessage => {
                write!(f, "quoted text outside a 'mensagem:' block ignored")
            }
            NoteKind::ArrowOutsideButtons => {
                write!(f, "button outside a 'botao N:' block ignored")
            }
            NoteKind::EmptyFlow(name) => {
                write!(f, "flow '{}' has no message and was dropped", name)
            }
            NoteKind::Redefined(name) => {
                write!(f, "flow '{}' redefines an earlier flow", name)
            }
        }
    }
}

/* ===================== Public API ===================== */

/// Compile flow source into a program
pub fn compile(source: &str) -> ParsedProgram {
    compile_report(source).program
}

/// Compile flow source, keeping track of every skipped construct
pub fn compile_report(source: &str) -> Compilation {
    let lines = lexer::classify(source);
    let mut compiler = Compiler::default();

    for line in lines {
        if compiler.feed(line) == Flow::Stop {
            break;
        }
    }
    compiler.commit();

    let compilation = compiler.finish();
    debug!(
        flows = compilation.program.len(),
        notes = compilation.notes.len(),
        "compiled flow source"
    );
    compilation
}

/// SHA-256 of the raw source, used as a program version
pub fn source_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/* ===================== Compiler State ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    None,
    InMessage,
    InButtons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Flow currently being accumulated
#[derive(Debug)]
struct Pending {
    name: FlowName,
    line: usize,
    message: String,
    buttons: Vec<ButtonTransition>,
}

#[derive(Debug, Default)]
struct Compiler {
    program: ParsedProgram,
    notes: Vec<CompileNote>,
    flow_lines: BTreeMap<FlowName, usize>,
    pending: Option<Pending>,
    mode: Mode,
}

impl Compiler {
    fn feed(&mut self, line: Line) -> Flow {
        let Line { number, kind } = line;

        match kind {
            LineKind::EntryHeader => self.open(ENTRY_FLOW.to_string(), number),
            LineKind::FlowHeader(name) => self.open(name, number),
            LineKind::MessageOpener => self.mode = Mode::InMessage,
            LineKind::ButtonOpener(_) => self.mode = Mode::InButtons,
            LineKind::Quoted(text) => match (self.mode, self.pending.as_mut()) {
                (Mode::InMessage, Some(pending)) => {
                    if !pending.message.is_empty() {
                        pending.message.push('\n');
                    }
                    pending.message.push_str(&text);
                }
                _ => self.note(number, NoteKind::QuotedOutsideMessage),
            },
            LineKind::Arrow { label, target } => match (self.mode, self.pending.as_mut()) {
                (Mode::InButtons, Some(pending)) => {
                    pending.buttons.push(ButtonTransition::new(label, target));
                }
                _ => self.note(number, NoteKind::ArrowOutsideButtons),
            },
            LineKind::Terminator => return Flow::Stop,
            LineKind::Unrecognized(text) => self.note(number, NoteKind::UnrecognizedLine(text)),
        }

        Flow::Continue
    }

    fn open(&mut self, name: FlowName, line: usize) {
        self.commit();
        self.pending = Some(Pending {
            name,
            line,
            message: String::new(),
            buttons: Vec::new(),
        });
        self.mode = Mode::None;
    }

    /// Move the pending flow into the program if it has a message
    fn commit(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.mode = Mode::None;

        if pending.message.is_empty() {
            debug!(flow = %pending.name, line = pending.line, "dropping flow without message");
            self.note(pending.line, NoteKind::EmptyFlow(pending.name));
            return;
        }

        let node = FlowNode {
            name: pending.name.clone(),
            message: pending.message,
            buttons: pending.buttons,
        };
        if self.program.insert(node).is_some() {
            self.note(pending.line, NoteKind::Redefined(pending.name.clone()));
        }
        self.flow_lines.insert(pending.name, pending.line);
    }

    fn note(&mut self, line: usize, kind: NoteKind) {
        debug!(line, "{}", kind);
        self.notes.push(CompileNote { line, kind });
    }

    fn finish(mut self) -> Compilation {
        // Empty flows are noted at commit time, after the lines that follow them
        self.notes.sort_by_key(|n| n.line);
        Compilation {
            program: self.program,
            notes: self.notes,
            flow_lines: self.flow_lines,
        }
    }
}
