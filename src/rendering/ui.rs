//! # User Interface Elements
//!
//! Overlays drawn on top of the board: the quiz panel, the message log and
//! the end-of-run screen.

use crate::game::{GameCompletionState, GameStatistics, MessageImportance, PendingQuiz};
use crate::rendering::importance_color;
use macroquad::prelude::*;

/// Overlay renderer.
#[derive(Debug, Clone, Default)]
pub struct UI {
    /// Lines of the log overlay shown at once
    pub log_lines: usize,
}

impl UI {
    /// Creates a new UI instance.
    pub fn new() -> Self {
        Self { log_lines: 20 }
    }

    fn draw_panel(&self, width: f32, height: f32) -> (f32, f32) {
        let x = (screen_width() - width) / 2.0;
        let y = (screen_height() - height) / 2.0;
        draw_rectangle(x, y, width, height, Color::new(0.05, 0.05, 0.1, 0.95));
        draw_rectangle_lines(x, y, width, height, 2.0, WHITE);
        (x + 20.0, y + 36.0)
    }

    /// Draws the question and its numbered options.
    pub fn render_quiz_panel(&self, quiz: &PendingQuiz) {
        let height = 140.0 + quiz.options.len() as f32 * 28.0;
        let (x, mut y) = self.draw_panel(560.0, height);

        draw_text(&quiz.npc_name, x, y, 26.0, SKYBLUE);
        y += 36.0;
        draw_text(&quiz.question, x, y, 20.0, WHITE);
        y += 40.0;
        for (index, option) in quiz.options.iter().enumerate() {
            draw_text(&format!("{}) {}", index + 1, option), x, y, 20.0, YELLOW);
            y += 28.0;
        }
    }

    /// Draws the most recent messages.
    pub fn render_log_overlay(&self, messages: &[(String, MessageImportance)]) {
        let (x, mut y) = self.draw_panel(640.0, 60.0 + self.log_lines as f32 * 20.0);

        draw_text("Message log (L to close)", x, y, 22.0, SKYBLUE);
        y += 30.0;
        let start = messages.len().saturating_sub(self.log_lines);
        for (text, importance) in &messages[start..] {
            draw_text(text, x, y, 16.0, importance_color(*importance));
            y += 20.0;
        }
    }

    /// Draws the end-of-run screen.
    pub fn render_ending_screen(
        &self,
        completion_state: GameCompletionState,
        statistics: &GameStatistics,
        score: u32,
    ) {
        clear_background(BLACK);
        let (title, color) = match completion_state {
            GameCompletionState::PlayerDied => ("YOU DIED", RED),
            GameCompletionState::Quit => ("GAME OVER", ORANGE),
            GameCompletionState::Playing => ("PAUSED", WHITE),
        };

        let (x, mut y) = self.draw_panel(480.0, 300.0);
        draw_text(title, x, y, 36.0, color);
        y += 48.0;

        let lines = [
            format!("Score: {}", score),
            format!("Deepest level: {}", statistics.max_level_reached),
            format!("Doors opened: {}", statistics.doors_opened),
            format!("Key fragments found: {}", statistics.key_fragments_collected),
            format!(
                "Questions: {} right, {} wrong",
                statistics.quizzes_correct, statistics.quizzes_incorrect
            ),
            format!("Steps: {}", statistics.steps_taken),
        ];
        for line in &lines {
            draw_text(line, x, y, 20.0, WHITE);
            y += 26.0;
        }
        y += 10.0;
        draw_text("N: new game   ESC: exit", x, y, 18.0, GREEN);
    }
}
