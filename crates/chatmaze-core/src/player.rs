use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, User};
use crate::time::Timestamp;

/// Cardinal direction on the board. Also names the four sides of a maze cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    #[default]
    Down,
    Left,
}

impl Direction {
    /// All directions in side-index order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Parse a chat direction word. Case-sensitive.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "up" => Some(Self::Up),
            "right" => Some(Self::Right),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            _ => None,
        }
    }

    /// Index into per-side arrays (top, right, bottom, left).
    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Row and column delta of a single step.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One chat participant's in-game state.
///
/// Identity fields come from the chat roster and are only written at
/// creation. Everything else is owned by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub source: String,
    pub row: u32,
    pub column: u32,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub last_moved_at: Timestamp,
    #[serde(default)]
    pub jumped_at: Timestamp,
    /// Pending macro letters, oldest first.
    #[serde(default)]
    pub commands: VecDeque<char>,
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub character: u8,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub last_active_at: Timestamp,
}

impl Player {
    /// A fresh player for a roster entry seen for the first time.
    pub fn spawn(user: &User, row: u32, column: u32, character: u8, now: Timestamp) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            source: user.source.clone(),
            row,
            column,
            direction: Direction::Down,
            last_moved_at: 0,
            jumped_at: 0,
            commands: VecDeque::new(),
            coins: 0,
            character,
            messages: Vec::new(),
            last_active_at: now,
        }
    }

    /// Latest of the last move and the last jump, i.e. when the current
    /// animation started.
    pub fn last_action_at(&self) -> Timestamp {
        self.last_moved_at.max(self.jumped_at)
    }

    /// Put the player back on the round-start cell with cleared timers.
    pub fn reset_for_round(&mut self, row: u32, column: u32) {
        self.row = row;
        self.column = column;
        self.last_moved_at = 0;
        self.jumped_at = 0;
        self.commands.clear();
        self.direction = Direction::Down;
    }

    /// Drop state that only makes sense within a running session.
    pub fn clear_transient(&mut self) {
        self.messages.clear();
        self.jumped_at = 0;
        self.commands.clear();
    }
}
