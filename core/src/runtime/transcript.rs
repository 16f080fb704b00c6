//! Message log of a conversation
//!
//! Append-only; a restart replaces the whole log. Presentation layers
//! usually render [`Transcript::visible`], the trailing window of turns.

use serde::{Deserialize, Serialize};

use crate::types::Turn;

pub const DEFAULT_VISIBLE_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
    visible_window: usize,
}

impl Transcript {
    pub fn new(visible_window: usize) -> Self {
        Self {
            turns: Vec::new(),
            visible_window,
        }
    }

    /// Append a turn and return it
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Every turn, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `visible_window` turns, oldest first
    pub fn visible(&self) -> &[Turn] {
        let start = self.turns.len().saturating_sub(self.visible_window);
        &self.turns[start..]
    }

    pub fn visible_window(&self) -> usize {
        self.visible_window
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBLE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(turns: &[Turn]) -> Vec<&str> {
        turns.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_push_keeps_order() {
        let mut transcript = Transcript::default();
        transcript.push(Turn::bot("Oi", None));
        let last = transcript.push(Turn::user("Olá"));
        assert_eq!(last.text, "Olá");

        assert_eq!(texts(transcript.turns()), vec!["Oi", "Olá"]);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().map(|t| t.text.as_str()), Some("Olá"));
    }

    #[test]
    fn test_visible_window_trails() {
        let mut transcript = Transcript::new(2);
        for text in ["um", "dois", "três"] {
            transcript.push(Turn::user(text));
        }

        assert_eq!(texts(transcript.visible()), vec!["dois", "três"]);
        assert_eq!(transcript.turns().len(), 3);
    }

    #[test]
    fn test_visible_window_larger_than_log() {
        let mut transcript = Transcript::new(10);
        transcript.push(Turn::user("só"));

        assert_eq!(texts(transcript.visible()), vec!["só"]);
    }

    #[test]
    fn test_empty() {
        let transcript = Transcript::new(3);

        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
        assert!(transcript.visible().is_empty());
        assert_eq!(transcript.visible_window(), 3);
    }
}
