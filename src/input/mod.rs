//! # Input Module
//!
//! Turns keyboard state into [`Command`]s and quiz answers.

pub mod commands;

pub use commands::*;

use macroquad::prelude::*;
use std::collections::VecDeque;

/// Source of player commands, polled once per frame.
pub trait InputMapper {
    /// The command issued this frame, if any.
    fn next_command(&mut self) -> Option<Command>;

    /// A 1-based quiz answer chosen this frame, if any.
    fn quiz_choice(&mut self) -> Option<usize>;
}

/// Keyboard input through macroquad.
///
/// WASD and the arrow keys move, E or Space interacts, L toggles the log,
/// N restarts from the end screen, Escape quits and 1 to 3 answer a quiz.
#[derive(Debug, Clone, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler.
    pub fn new() -> Self {
        Self
    }
}

impl InputMapper for InputHandler {
    fn next_command(&mut self) -> Option<Command> {
        if is_key_pressed(KeyCode::Escape) {
            return Some(Command::Quit);
        }

        if is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W) {
            return Some(Command::Up);
        }
        if is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S) {
            return Some(Command::Down);
        }
        if is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A) {
            return Some(Command::Left);
        }
        if is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D) {
            return Some(Command::Right);
        }

        if is_key_pressed(KeyCode::E) || is_key_pressed(KeyCode::Space) {
            return Some(Command::Interact);
        }
        if is_key_pressed(KeyCode::L) {
            return Some(Command::ShowLog);
        }
        if is_key_pressed(KeyCode::N) {
            return Some(Command::Restart);
        }

        None
    }

    fn quiz_choice(&mut self) -> Option<usize> {
        let keys = [
            (KeyCode::Key1, 1),
            (KeyCode::Key2, 2),
            (KeyCode::Key3, 3),
            (KeyCode::Kp1, 1),
            (KeyCode::Kp2, 2),
            (KeyCode::Kp3, 3),
        ];
        keys.iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|&(_, choice)| choice)
    }
}

/// Replays typed characters, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: VecDeque<char>,
}

impl ScriptedInput {
    /// Creates input that yields one character per poll.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{Command, InputMapper, ScriptedInput};
    ///
    /// let mut input = ScriptedInput::new("wd2");
    /// assert_eq!(input.next_command(), Some(Command::Up));
    /// assert_eq!(input.next_command(), Some(Command::Right));
    /// assert_eq!(input.quiz_choice(), Some(2));
    /// assert_eq!(input.next_command(), None);
    /// ```
    pub fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
        }
    }

    /// Whether every character has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.keys.is_empty()
    }
}

impl InputMapper for ScriptedInput {
    fn next_command(&mut self) -> Option<Command> {
        self.keys.pop_front().map(Command::from_key_char)
    }

    fn quiz_choice(&mut self) -> Option<usize> {
        self.keys.pop_front().and_then(quiz_choice_from_char)
    }
}
