//! # Rendering Module
//!
//! Board drawing behind the [`Renderer`] trait. The macroquad display
//! draws to the window; [`TextRenderer`] draws to a string for tests and
//! headless runs.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use crate::game::{Board, Entity, EntityRegistry, Position, TileKind};

/// Anything that can draw the board one cell at a time.
pub trait Renderer {
    /// Draws a single cell.
    fn draw_tile(&mut self, position: Position, glyph: char, tile: TileKind);

    /// Draws every cell of `board`, letting registered entities override
    /// the tile glyph.
    fn draw_full_board(&mut self, board: &Board, registry: &EntityRegistry) {
        for (position, tile) in board.cells() {
            self.draw_tile(position, glyph_at(board, registry, position), tile);
        }
    }
}

/// Glyph for a cell: the entity's symbol when one stands there, the tile
/// glyph otherwise.
pub fn glyph_at(board: &Board, registry: &EntityRegistry, position: Position) -> char {
    registry
        .get(position)
        .map(|entity| entity.symbol())
        .unwrap_or_else(|| board.get(position).glyph())
}

/// Renders the board into rows of characters.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    rows: Vec<Vec<char>>,
}

impl TextRenderer {
    /// Creates an empty text renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the whole board and returns it as newline-separated rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{Board, EntityRegistry, TextRenderer};
    ///
    /// let board = Board::new(4, 3).unwrap();
    /// let text = TextRenderer::new().render_to_string(&board, &EntityRegistry::new());
    /// assert_eq!(text, "/--\\\n|..|\n\\--/");
    /// ```
    pub fn render_to_string(&mut self, board: &Board, registry: &EntityRegistry) -> String {
        self.rows = vec![vec![' '; board.width as usize]; board.height as usize];
        self.draw_full_board(board, registry);
        self.rows
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Renderer for TextRenderer {
    fn draw_tile(&mut self, position: Position, glyph: char, _tile: TileKind) {
        if position.x < 0 || position.y < 0 {
            return;
        }
        if let Some(cell) = self
            .rows
            .get_mut(position.y as usize)
            .and_then(|row| row.get_mut(position.x as usize))
        {
            *cell = glyph;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Door, DoorOrientation, KeyFragment, Player};

    #[test]
    fn test_empty_board_text() {
        let board = Board::new(5, 4).unwrap();
        let text = TextRenderer::new().render_to_string(&board, &EntityRegistry::new());
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "/---\\");
        assert_eq!(rows[1], "|...|");
        assert_eq!(rows[3], "\\---/");
    }

    #[test]
    fn test_entities_override_tiles() {
        let mut board = Board::new(6, 4).unwrap();
        let mut registry = EntityRegistry::new();

        let player = Position::new(1, 1);
        board.set(player, TileKind::Player);
        registry.insert(player, Player::new("Hero".to_string(), player).into());

        let key = Position::new(3, 2);
        board.set(key, TileKind::Key);
        registry.insert(key, KeyFragment::new(key, 1).into());

        let door = Position::new(5, 2);
        board.set(door, TileKind::Door);
        let mut opened = Door::new(door, DoorOrientation::Vertical);
        opened.open();
        registry.insert(door, opened.into());

        let text = TextRenderer::new().render_to_string(&board, &registry);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[1], "|@...|");
        assert_eq!(rows[2], "|..k.:");
    }
}
