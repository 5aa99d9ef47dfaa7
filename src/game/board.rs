//! # Board
//!
//! The rectangular tile grid. Border cells are always walls, interior cells
//! start empty, and every access is bounds-checked.

use crate::game::Position;
use crate::{LockroomError, LockroomResult};
use log::{error, warn};
use serde::{Deserialize, Serialize};

/// Static classification of a grid cell.
///
/// Occupancy lives in the [`EntityRegistry`](crate::EntityRegistry); the
/// interactive kinds are mirrored into the grid only so whole-board scans
/// stay cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Sentinel for out-of-bounds reads and cells not yet filled
    None,
    Empty,
    WallHorizontal,
    WallVertical,
    WallCornerTopLeft,
    WallCornerTopRight,
    WallCornerBottomLeft,
    WallCornerBottomRight,
    Door,
    Npc,
    Key,
    Player,
}

impl TileKind {
    /// Every wall variant, edges first.
    pub const WALLS: [TileKind; 6] = [
        TileKind::WallHorizontal,
        TileKind::WallVertical,
        TileKind::WallCornerTopLeft,
        TileKind::WallCornerTopRight,
        TileKind::WallCornerBottomLeft,
        TileKind::WallCornerBottomRight,
    ];

    /// Whether this is any wall variant.
    pub fn is_wall(self) -> bool {
        self.is_edge_wall() || self.is_corner()
    }

    /// Whether this is a straight wall segment (the only kinds a door may
    /// replace).
    pub fn is_edge_wall(self) -> bool {
        matches!(self, TileKind::WallHorizontal | TileKind::WallVertical)
    }

    /// Whether this is one of the four corner kinds.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            TileKind::WallCornerTopLeft
                | TileKind::WallCornerTopRight
                | TileKind::WallCornerBottomLeft
                | TileKind::WallCornerBottomRight
        )
    }

    /// Whether an entity on this tile blocks nearby spawns.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            TileKind::Door | TileKind::Npc | TileKind::Key | TileKind::Player
        )
    }

    /// Glyph used when no entity overrides the tile.
    pub fn glyph(self) -> char {
        match self {
            TileKind::None => '?',
            TileKind::Empty => '.',
            TileKind::WallHorizontal => '-',
            TileKind::WallVertical => '|',
            TileKind::WallCornerTopLeft => '/',
            TileKind::WallCornerTopRight => '\\',
            TileKind::WallCornerBottomLeft => '\\',
            TileKind::WallCornerBottomRight => '/',
            TileKind::Door => '=',
            TileKind::Npc => '&',
            TileKind::Key => 'k',
            TileKind::Player => '@',
        }
    }

    /// Human-readable name for messages.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::None => "nothing",
            TileKind::Empty => "floor",
            TileKind::Door => "door",
            TileKind::Npc => "stranger",
            TileKind::Key => "key fragment",
            TileKind::Player => "player",
            _ => "wall",
        }
    }
}

/// The tile grid for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    grid: Vec<Vec<TileKind>>,
}

impl Board {
    /// Creates a board of the given size with its border and interior
    /// filled.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{Board, Position, TileKind};
    ///
    /// let board = Board::new(45, 15).unwrap();
    /// assert_eq!(board.get(Position::new(0, 0)), TileKind::WallCornerTopLeft);
    /// assert_eq!(board.get(Position::new(10, 5)), TileKind::Empty);
    /// ```
    pub fn new(width: u32, height: u32) -> LockroomResult<Self> {
        let mut board = Self {
            width: 0,
            height: 0,
            grid: Vec::new(),
        };
        board.resize(width, height)?;
        board.fill();
        Ok(board)
    }

    /// Reallocates the grid. Every cell reads as [`TileKind::None`] until
    /// [`fill`](Self::fill) runs.
    ///
    /// Boards narrower or shorter than 2 tiles cannot hold four distinct
    /// corners and are rejected.
    pub fn resize(&mut self, width: u32, height: u32) -> LockroomResult<()> {
        if width < 2 || height < 2 {
            return Err(LockroomError::InvalidBoard(format!(
                "{}x{} cannot hold four distinct corners",
                width, height
            )));
        }

        self.width = width;
        self.height = height;
        self.grid = vec![vec![TileKind::None; width as usize]; height as usize];
        Ok(())
    }

    /// Writes the wall border and clears the interior. Idempotent.
    pub fn fill(&mut self) {
        let last_x = self.width as usize - 1;
        let last_y = self.height as usize - 1;

        for (y, row) in self.grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = match (x, y) {
                    (0, 0) => TileKind::WallCornerTopLeft,
                    (x, 0) if x == last_x => TileKind::WallCornerTopRight,
                    (0, y) if y == last_y => TileKind::WallCornerBottomLeft,
                    (x, y) if x == last_x && y == last_y => TileKind::WallCornerBottomRight,
                    (_, 0) => TileKind::WallHorizontal,
                    (_, y) if y == last_y => TileKind::WallHorizontal,
                    (0, _) => TileKind::WallVertical,
                    (x, _) if x == last_x => TileKind::WallVertical,
                    _ => TileKind::Empty,
                };
            }
        }

        if !self.verify_border() {
            error!(
                "Board border invariant violated after fill ({}x{})",
                self.width, self.height
            );
        }
    }

    /// Checks that the four corners hold four distinct corner kinds and
    /// that no corner kind appears on an edge.
    pub fn verify_border(&self) -> bool {
        let corners = self.corner_positions().map(|pos| self.tile_at(pos));
        let distinct = corners
            .iter()
            .enumerate()
            .all(|(i, kind)| corners.iter().skip(i + 1).all(|other| other != kind));
        if !distinct || corners.iter().any(|kind| !kind.is_corner()) {
            return false;
        }

        self.border_positions()
            .into_iter()
            .filter(|pos| !self.is_corner_position(*pos))
            .all(|pos| self.tile_at(pos).is_edge_wall())
    }

    /// Returns true if the position lies on the board.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Reads a tile. Out-of-bounds reads are logged and yield
    /// [`TileKind::None`].
    pub fn get(&self, pos: Position) -> TileKind {
        if !self.in_bounds(pos) {
            warn!(
                "Board read out of bounds at {} ({}x{})",
                pos, self.width, self.height
            );
            return TileKind::None;
        }
        self.tile_at(pos)
    }

    /// Writes a tile. Out-of-bounds writes are logged and ignored; the
    /// return value says whether the write happened.
    pub fn set(&mut self, pos: Position, kind: TileKind) -> bool {
        if !self.in_bounds(pos) {
            warn!(
                "Board write of {:?} out of bounds at {} ({}x{})",
                kind, pos, self.width, self.height
            );
            return false;
        }
        self.grid[pos.y as usize][pos.x as usize] = kind;
        true
    }

    /// Iterates every position row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Iterates `(position, kind)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        self.positions().map(move |pos| (pos, self.tile_at(pos)))
    }

    /// Whether the position lies on the outer ring.
    pub fn is_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1)
    }

    /// Whether the position lies on the left or right edge.
    pub fn is_x_boundary(&self, pos: Position) -> bool {
        self.in_bounds(pos) && (pos.x == 0 || pos.x == self.width as i32 - 1)
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corner_positions(&self) -> [Position; 4] {
        let right = self.width as i32 - 1;
        let bottom = self.height as i32 - 1;
        [
            Position::new(0, 0),
            Position::new(right, 0),
            Position::new(0, bottom),
            Position::new(right, bottom),
        ]
    }

    /// All positions on the outer ring.
    pub fn border_positions(&self) -> Vec<Position> {
        self.positions().filter(|pos| self.is_border(*pos)).collect()
    }

    /// Number of cells currently holding `kind`.
    pub fn count(&self, kind: TileKind) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| **cell == kind)
            .count()
    }

    fn is_corner_position(&self, pos: Position) -> bool {
        self.corner_positions().contains(&pos)
    }

    fn tile_at(&self, pos: Position) -> TileKind {
        self.grid[pos.y as usize][pos.x as usize]
    }
}
