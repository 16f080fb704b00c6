use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of a flow in the conversation graph.
pub type FlowName = String;

/// Reserved entry point of every program
pub const ENTRY_FLOW: &str = "inicio";

/// Reserved button target that hands the conversation over to a human.
/// Consumed by the runtime directly, never needs a flow definition.
pub const HANDOFF_TARGET: &str = "atendimento_humano";

/// A button shown under a bot message, leading to another flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonTransition {
    pub label: String,
    pub target_flow: FlowName,
}

impl ButtonTransition {
    pub fn new(label: impl Into<String>, target_flow: impl Into<FlowName>) -> Self {
        Self {
            label: label.into(),
            target_flow: target_flow.into(),
        }
    }
}

/// A compiled flow: one message plus its buttons in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub name: FlowName,
    /// Quoted lines of the message block, joined with `\n`
    pub message: String,
    pub buttons: Vec<ButtonTransition>,
}

/// Immutable result of compiling flow source.
///
/// Holds at most one node per name, and every node has a non-empty message.
/// Flows are kept in name order so serialized programs are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProgram {
    flows: BTreeMap<FlowName, FlowNode>,
}

impl ParsedProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any earlier node with the same name.
    /// Returns the replaced node, if any.
    pub fn insert(&mut self, node: FlowNode) -> Option<FlowNode> {
        self.flows.insert(node.name.clone(), node)
    }

    pub fn get(&self, name: &str) -> Option<&FlowNode> {
        self.flows.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    pub fn entry(&self) -> Option<&FlowNode> {
        self.get(ENTRY_FLOW)
    }

    pub fn flows(&self) -> impl Iterator<Item = &FlowNode> {
        self.flows.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Bot,
    User,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub text: String,
    pub origin: Origin,
    /// Snapshot of the buttons offered with a bot message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonTransition>>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn bot(text: impl Into<String>, buttons: Option<Vec<ButtonTransition>>) -> Self {
        Self::new(text.into(), Origin::Bot, buttons)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), Origin::User, None)
    }

    fn new(text: String, origin: Origin, buttons: Option<Vec<ButtonTransition>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            origin,
            buttons,
            timestamp: Utc::now(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.origin == Origin::Bot
    }

    /// Buttons offered with this turn, empty for user turns
    pub fn buttons(&self) -> &[ButtonTransition] {
        self.buttons.as_deref().unwrap_or(&[])
    }
}
