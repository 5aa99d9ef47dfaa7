//! # Movement Rules
//!
//! Pure predicates over the board: where the player may step, and where a
//! new entity may spawn.

use crate::game::{Board, Position, TileKind};
use log::warn;

/// Whether the player may occupy `target`.
///
/// Only floor and key tiles can be entered. Anything the board does not
/// recognise is refused and reported.
///
/// # Examples
///
/// ```
/// use lockroom::{is_move_allowed, Board, Position};
///
/// let board = Board::new(45, 15).unwrap();
/// assert!(is_move_allowed(&board, Position::new(5, 5)));
/// assert!(!is_move_allowed(&board, Position::new(0, 5)));
/// ```
pub fn is_move_allowed(board: &Board, target: Position) -> bool {
    match board.get(target) {
        TileKind::Empty | TileKind::Key => true,
        TileKind::WallHorizontal
        | TileKind::WallVertical
        | TileKind::WallCornerTopLeft
        | TileKind::WallCornerTopRight
        | TileKind::WallCornerBottomLeft
        | TileKind::WallCornerBottomRight
        | TileKind::Door
        | TileKind::Npc
        | TileKind::Player => false,
        TileKind::None => {
            warn!("Movement check hit an unrecognised tile at {}", target);
            false
        }
    }
}

/// Whether `center` is free enough to host a new spawn: none of the cells
/// in its 3x3 block (clipped to the board) holds a door, player, NPC or key.
pub fn is_position_free_for_spawn(board: &Board, center: Position) -> bool {
    center
        .neighborhood()
        .into_iter()
        .filter(|pos| board.in_bounds(*pos))
        .all(|pos| !board.get(pos).is_interactive())
}
