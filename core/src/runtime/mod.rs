//! # Session Runtime
//!
//! Walks a [`ParsedProgram`] in response to user intents and records every
//! exchange in a [`Transcript`].
//!
//! A session is always in one of three phases:
//!
//! - `Idle`: the program has no entry flow, so nothing was shown
//! - `Running(flow)`: showing `flow`, waiting for a button press
//! - `AwaitingFreeText(prior_flow)`: the user asked for a human and the next
//!   text they send is captured as their name
//!
//! The runtime is synchronous and holds no global state. One `Runtime` owns
//! one conversation; callers serialize the intents of a session themselves.
//! The program is only read at transition time, so [`Runtime::reload`] can
//! swap in a recompiled program mid-conversation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{FlowName, ParsedProgram, Turn, ENTRY_FLOW, HANDOFF_TARGET};

pub mod transcript;


pub use transcript::{Transcript, DEFAULT_VISIBLE_WINDOW};

/* ===================== Errors ===================== */

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Empty or whitespace-only text; nothing was recorded
    #[error("message text is empty")]
    EmptyText,
}

/* ===================== Options ===================== */

/// Placeholder replaced by the captured name in the confirmation message
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Fixed bot messages that do not come from the program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Asked when the user presses the human handoff button
    pub handoff_prompt: String,
    /// Sent after the name is captured; `{name}` is replaced with it
    pub capture_confirmation: String,
    /// Sent when a button leads to a flow that does not exist
    pub fallback: String,
}

impl Messages {
    pub fn confirmation(&self, name: &str) -> String {
        self.capture_confirmation.replace(NAME_PLACEHOLDER, name)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            handoff_prompt: "Para falar com um atendente, por favor digite seu nome.".to_string(),
            capture_confirmation:
                "Obrigado, {name}! Um atendente vai continuar a conversa em instantes.".to_string(),
            fallback: "Desculpe, não consegui processar sua solicitação.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub messages: Messages,
    /// How many trailing turns `Transcript::visible` returns
    pub visible_window: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            messages: Messages::default(),
            visible_window: DEFAULT_VISIBLE_WINDOW,
        }
    }
}

/* ===================== Session State ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Phase {
    Idle,
    Running { flow: FlowName },
    /// `prior_flow` is None when the handoff was requested from `Idle`
    AwaitingFreeText { prior_flow: Option<FlowName> },
}

/// Everything one conversation owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub transcript: Transcript,
}

impl SessionState {
    fn new(visible_window: usize) -> Self {
        Self {
            phase: Phase::Idle,
            transcript: Transcript::new(visible_window),
        }
    }

    /// Flow being shown; while awaiting free text, the flow the handoff came from.
    /// None while idle.
    pub fn current_flow(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Running { flow } => Some(flow),
            Phase::AwaitingFreeText { prior_flow } => prior_flow.as_deref(),
        }
    }

    pub fn awaiting_free_text(&self) -> bool {
        matches!(self.phase, Phase::AwaitingFreeText { .. })
    }
}

/* ===================== Intents ===================== */

/// A user action, for callers feeding a session from an event queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Intent {
    /// A button was pressed; carries its target
    Press(FlowName),
    /// Free text was submitted
    Text(String),
    Restart,
}

/* ===================== Runtime ===================== */

#[derive(Debug)]
pub struct Runtime {
    program: Arc<ParsedProgram>,
    options: RuntimeOptions,
    state: SessionState,
}

impl Runtime {
    /// Start a conversation with default options
    pub fn new(program: Arc<ParsedProgram>) -> Self {
        Self::with_options(program, RuntimeOptions::default())
    }

    /// Start a conversation. The entry message, if any, is the first turn.
    pub fn with_options(program: Arc<ParsedProgram>, options: RuntimeOptions) -> Self {
        let state = SessionState::new(options.visible_window);
        let mut runtime = Self {
            program,
            options,
            state,
        };
        runtime.start();
        runtime
    }

    fn start(&mut self) {
        match self.program.entry() {
            Some(entry) => {
                let turn = Turn::bot(entry.message.clone(), Some(entry.buttons.clone()));
                self.state.transcript.push(turn);
                self.state.phase = Phase::Running {
                    flow: entry.name.clone(),
                };
                debug!(flow = ENTRY_FLOW, "session started");
            }
            None => warn!("program has no '{}' flow, session starts empty", ENTRY_FLOW),
        }
    }

    /// Handle a button press and return the bot turn it produced
    pub fn press_button(&mut self, target: &str) -> &Turn {
        if target == HANDOFF_TARGET {
            let prior_flow = self.state.current_flow().map(str::to_string);
            info!(prior_flow = ?prior_flow, "human handoff requested");
            self.state.phase = Phase::AwaitingFreeText { prior_flow };
            let prompt = self.options.messages.handoff_prompt.clone();
            return self.state.transcript.push(Turn::bot(prompt, None));
        }

        match self.program.get(target) {
            Some(node) => {
                debug!(from = ?self.state.current_flow(), to = target, "flow transition");
                let turn = Turn::bot(node.message.clone(), Some(node.buttons.clone()));
                self.state.phase = Phase::Running {
                    flow: node.name.clone(),
                };
                self.state.transcript.push(turn)
            }
            None => {
                warn!(
                    flow = ?self.state.current_flow(),
                    button_target = target,
                    "button leads to an undefined flow"
                );
                let fallback = self.options.messages.fallback.clone();
                self.state.transcript.push(Turn::bot(fallback, None))
            }
        }
    }

    /// Handle submitted text and return the turns it produced.
    ///
    /// While a handoff is pending the text is captured and confirmed, and the
    /// session returns to the flow it came from. Otherwise the text is only
    /// recorded; the language has no free-text routing.
    pub fn submit_text(&mut self, text: &str) -> Result<&[Turn], SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyText);
        }

        let start = self.state.transcript.len();
        self.state.transcript.push(Turn::user(text));

        if let Phase::AwaitingFreeText { prior_flow } = &self.state.phase {
            let prior_flow = prior_flow.clone();
            info!(flow = ?prior_flow, "free text captured, resuming flow");
            let confirmation = self.options.messages.confirmation(text);
            self.state.transcript.push(Turn::bot(confirmation, None));
            self.state.phase = match prior_flow {
                Some(flow) => Phase::Running { flow },
                None => Phase::Idle,
            };
        } else {
            debug!(flow = ?self.state.current_flow(), "free text recorded without capture");
        }

        Ok(&self.state.transcript.turns()[start..])
    }

    /// Throw the conversation away and start over
    pub fn restart(&mut self) {
        info!("session restarted");
        self.state = SessionState::new(self.options.visible_window);
        self.start();
    }

    /// Apply one intent and return the turns it produced.
    /// After a restart that is the whole new transcript.
    pub fn dispatch(&mut self, intent: Intent) -> Result<&[Turn], SessionError> {
        match intent {
            Intent::Press(target) => {
                let start = self.state.transcript.len();
                self.press_button(&target);
                Ok(&self.state.transcript.turns()[start..])
            }
            Intent::Text(text) => self.submit_text(&text),
            Intent::Restart => {
                self.restart();
                Ok(self.state.transcript.turns())
            }
        }
    }

    /// Swap in a recompiled program. The conversation is left as it is;
    /// the new program is used from the next transition on.
    pub fn reload(&mut self, program: Arc<ParsedProgram>) {
        if *program == *self.program {
            debug!("reloaded program is unchanged");
        } else {
            info!(flows = program.len(), "program reloaded");
        }
        self.program = program;
    }

    pub fn program(&self) -> &Arc<ParsedProgram> {
        &self.program
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn current_flow(&self) -> Option<&str> {
        self.state.current_flow()
    }

    pub fn awaiting_free_text(&self) -> bool {
        self.state.awaiting_free_text()
    }

    /// False when the program has no entry flow; such a session never shows anything
    pub fn has_entry(&self) -> bool {
        self.program.contains(ENTRY_FLOW)
    }
}
