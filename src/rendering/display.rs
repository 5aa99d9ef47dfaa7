//! # Display Management
//!
//! Window rendering with macroquad: the board, the HUD panel and the
//! message strip.

use crate::game::{GameState, HudSnapshot, MessageImportance, Position, TileKind};
use crate::rendering::{Renderer, UI};
use crate::LockroomResult;
use macroquad::prelude::*;

/// Macroquad display manager for the game.
///
/// Draws the board glyph by glyph, the HUD to its right and the most
/// recent messages along the bottom.
pub struct MacroquadDisplay {
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Tile size in pixels
    pub tile_size: f32,
    /// Top-left corner of the board in pixels
    pub board_origin: Vec2,
    /// UI panel width in pixels
    pub ui_panel_width: f32,
    /// Message history
    pub messages: Vec<(String, MessageImportance)>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// Whether the full message log is shown
    pub show_log: bool,
    /// Overlays and end screens
    pub ui: UI,
}

impl MacroquadDisplay {
    /// Creates a display sized to the current window.
    pub fn new() -> Self {
        Self {
            screen_width: screen_width(),
            screen_height: screen_height(),
            tile_size: 18.0,
            board_origin: vec2(10.0, 10.0),
            ui_panel_width: 300.0,
            messages: Vec::new(),
            max_messages: 100,
            show_log: false,
            ui: UI::new(),
        }
    }

    /// Renders the complete game screen.
    pub fn render_game(&mut self, game_state: &GameState) -> LockroomResult<()> {
        self.screen_width = screen_width();
        self.screen_height = screen_height();
        clear_background(BLACK);

        if let Some(board) = game_state.board.as_ref() {
            let available = self.screen_width - self.ui_panel_width - 20.0;
            self.tile_size = (available / board.width as f32).clamp(8.0, 24.0);
            self.draw_full_board(board, &game_state.registry);
        }

        let hud = game_state.hud_snapshot();
        self.render_hud(&hud, game_state);
        self.render_messages();

        if let Some(quiz) = hud.encounter.as_ref() {
            self.ui.render_quiz_panel(quiz);
        } else if self.show_log {
            self.ui.render_log_overlay(&self.messages);
        }

        Ok(())
    }

    /// Renders the HUD panel.
    fn render_hud(&self, hud: &HudSnapshot, game_state: &GameState) {
        let panel_x = self.screen_width - self.ui_panel_width + 10.0;
        let mut line_y = 30.0;
        let line_height = 22.0;

        draw_text("LOCKROOM", panel_x, line_y, 28.0, WHITE);
        line_y += line_height * 2.0;

        let rows = [
            (format!("Player: {}", hud.player_name), YELLOW),
            (format!("Lives: {}", hud.lives), RED),
            (
                format!("Keys: {} / {}", hud.key_fragments, hud.required_keys),
                GOLD,
            ),
            (format!("Score: {}", hud.score), WHITE),
            (format!("Level: {}", hud.level), WHITE),
            (
                format!("Door: {}", if hud.door_open { "open" } else { "locked" }),
                if hud.door_open { GREEN } else { ORANGE },
            ),
        ];
        for (text, color) in &rows {
            draw_text(text, panel_x, line_y, 20.0, *color);
            line_y += line_height;
        }
        line_y += line_height;

        draw_text(
            &format!("Turn: {}", game_state.turn_number),
            panel_x,
            line_y,
            18.0,
            LIGHTGRAY,
        );
        line_y += line_height;
        draw_text(
            &format!("Time: {}s", game_state.elapsed().as_secs()),
            panel_x,
            line_y,
            18.0,
            LIGHTGRAY,
        );
        line_y += line_height * 2.0;

        draw_text("Controls:", panel_x, line_y, 18.0, GREEN);
        line_y += line_height;
        let controls = [
            "WASD/Arrows: Move",
            "E/Space: Interact",
            "1-3: Answer",
            "L: Message log",
            "ESC: Quit",
        ];
        for control in &controls {
            draw_text(control, panel_x, line_y, 16.0, WHITE);
            line_y += line_height;
        }
    }

    /// Renders the last few messages along the bottom edge.
    fn render_messages(&self) {
        let message_area_y = self.screen_height - 80.0;
        let message_count = 3;
        let line_height = 18.0;

        draw_rectangle(
            0.0,
            message_area_y - 10.0,
            self.screen_width,
            90.0,
            Color::new(0.0, 0.0, 0.0, 0.8),
        );

        let start_index = self.messages.len().saturating_sub(message_count);
        for (i, (message, importance)) in self.messages.iter().skip(start_index).enumerate() {
            let y = message_area_y + i as f32 * line_height;
            draw_text(message, 10.0, y, 16.0, importance_color(*importance));
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String, importance: MessageImportance) {
        self.messages.push((message, importance));

        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Toggles the full message log.
    pub fn toggle_log(&mut self) {
        self.show_log = !self.show_log;
    }
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MacroquadDisplay {
    fn draw_tile(&mut self, position: Position, glyph: char, tile: TileKind) {
        let x = self.board_origin.x + position.x as f32 * self.tile_size;
        let y = self.board_origin.y + (position.y as f32 + 1.0) * self.tile_size;
        let mut buffer = [0u8; 4];
        draw_text(
            glyph.encode_utf8(&mut buffer),
            x,
            y,
            self.tile_size * 1.2,
            tile_color(tile),
        );
    }
}

/// Colour for a tile kind.
pub fn tile_color(tile: TileKind) -> Color {
    match tile {
        TileKind::Empty => DARKGRAY,
        TileKind::Door => ORANGE,
        TileKind::Npc => SKYBLUE,
        TileKind::Key => GOLD,
        TileKind::Player => YELLOW,
        TileKind::None => MAGENTA,
        _ => WHITE,
    }
}

/// Colour for a message.
pub fn importance_color(importance: MessageImportance) -> Color {
    match importance {
        MessageImportance::Info => WHITE,
        MessageImportance::Success => GREEN,
        MessageImportance::Warning => ORANGE,
        MessageImportance::Critical => RED,
    }
}
