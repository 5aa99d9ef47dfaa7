//! # Command Definitions
//!
//! The fixed command set the player can issue, and the keyboard layout
//! that produces it.

use crate::game::Direction;
use serde::{Deserialize, Serialize};

/// One player command per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    /// Interact with the faced cell
    Interact,
    /// Toggle the message log overlay
    ShowLog,
    /// Start a new run from the end screen
    Restart,
    Quit,
    /// No recognised input
    None,
}

impl Command {
    /// Maps a typed character to a command. Unknown characters map to
    /// [`Command::None`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::Command;
    ///
    /// assert_eq!(Command::from_key_char('w'), Command::Up);
    /// assert_eq!(Command::from_key_char('E'), Command::Interact);
    /// assert_eq!(Command::from_key_char('?'), Command::None);
    /// ```
    pub fn from_key_char(key: char) -> Self {
        match key.to_ascii_lowercase() {
            'w' => Command::Up,
            's' => Command::Down,
            'a' => Command::Left,
            'd' => Command::Right,
            'e' | ' ' => Command::Interact,
            'l' => Command::ShowLog,
            'n' => Command::Restart,
            'q' | '\u{1b}' => Command::Quit,
            _ => Command::None,
        }
    }

    /// The movement direction, for the four movement commands.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Maps `'1'..='9'` to a 1-based quiz answer.
pub fn quiz_choice_from_char(key: char) -> Option<usize> {
    key.to_digit(10)
        .filter(|&digit| digit > 0)
        .map(|digit| digit as usize)
}
