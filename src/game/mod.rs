//! # Game Module
//!
//! Core board state, entities and the rules that govern them.
//!
//! This module contains the fundamental building blocks of Lockroom:
//! - The tile grid and its wall border
//! - The entity registry keyed by board position
//! - Movement predicates and interaction resolution
//! - Level progression and the session-wide game state

pub mod board;
pub mod entities;
pub mod interaction;
pub mod level;
pub mod registry;
pub mod rules;
pub mod state;

pub use board::*;
pub use entities::*;
pub use interaction::*;
pub use level::*;
pub use registry::*;
pub use rules::*;
pub use state::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate on the board.
///
/// `x` grows to the right, `y` grows downwards; `(0, 0)` is the top-left
/// corner.
///
/// # Examples
///
/// ```
/// use lockroom::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let block = pos.neighborhood();
/// assert_eq!(block.len(), 9); // The cell itself and its 8 neighbours
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    pub fn offset(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Calculates the Chebyshev (king-move) distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 1);
    /// assert_eq!(pos1.chebyshev_distance(pos2), 3);
    /// ```
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    /// Returns the 3x3 block centred on this position, row by row.
    ///
    /// The block is not clipped; callers check bounds against their board.
    pub fn neighborhood(self) -> Vec<Position> {
        let mut block = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                block.push(Position::new(self.x + dx, self.y + dy));
            }
        }
        block
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Directions the player can step or face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{Direction, Position};
    ///
    /// let delta = Direction::Up.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }
}
