//! Response records produced by a two-alternative forced-choice trial.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation slot within a 2AFC trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Played before the inter-stimulus interval.
    First,
    /// Played after the inter-stimulus interval.
    Second,
}

impl Position {
    /// Parses the operator's keystroke (`1` or `2`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "1" => Some(Position::First),
            "2" => Some(Position::Second),
            _ => None,
        }
    }

    /// Keystroke that selects this position.
    pub fn key(&self) -> u8 {
        match self {
            Position::First => 1,
            Position::Second => 2,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::First => f.write_str("first"),
            Position::Second => f.write_str("second"),
        }
    }
}

/// Outcome of one trial, scored against the randomised presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResponse {
    /// Slot in which the target stimulus was played.
    pub target_position: Position,
    /// Slot the listener selected.
    pub chosen: Position,
    /// Whether the listener selected the target slot.
    pub target_chosen: bool,
}

impl TrialResponse {
    /// Scores a raw choice against the slot the target occupied.
    pub fn score(target_position: Position, chosen: Position) -> Self {
        Self {
            target_position,
            chosen,
            target_chosen: target_position == chosen,
        }
    }
}
