//! # Scene Management System
//!
//! Switches between play and the end screen, feeds input into the game
//! state and rebuilds the board whenever a door has been opened.

use crate::game::{GameCompletionState, GameEvent, GameState, MessageImportance};
use crate::generation::{NpcRecord, SessionConfig};
use crate::input::{Command, InputMapper};
use crate::rendering::MacroquadDisplay;
use crate::LockroomResult;
use log::{error, info};
use macroquad::prelude::*;

/// Represents the current scene in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    /// Normal gameplay, including quizzes
    Playing,
    /// End screen after death or quitting
    GameOver(GameCompletionState),
}

/// What the end screen does with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverChoice {
    Stay,
    NewGame,
    Exit,
}

impl GameOverChoice {
    pub fn from_command(command: Command) -> Self {
        match command {
            Command::Restart => GameOverChoice::NewGame,
            Command::Quit => GameOverChoice::Exit,
            _ => GameOverChoice::Stay,
        }
    }
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    game_state: GameState,
    display: MacroquadDisplay,
    input: Box<dyn InputMapper>,
    config: SessionConfig,
    npc_pool: Vec<NpcRecord>,
}

impl SceneManager {
    /// Creates a scene manager and builds the first level.
    pub fn new(
        config: SessionConfig,
        npc_pool: Vec<NpcRecord>,
        input: Box<dyn InputMapper>,
    ) -> LockroomResult<Self> {
        let mut display = MacroquadDisplay::new();
        display.add_message("Welcome to Lockroom!".to_string(), MessageImportance::Info);
        display.add_message(
            "Collect key fragments and answer questions to open the door.".to_string(),
            MessageImportance::Info,
        );

        let mut game_state = GameState::new(config.clone(), npc_pool.clone());
        let events = game_state.start()?;
        publish(&mut display, &events);

        Ok(Self {
            current_scene: SceneType::Playing,
            game_state,
            display,
            input,
            config,
            npc_pool,
        })
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> LockroomResult<()> {
        loop {
            let exit = match self.current_scene {
                SceneType::Playing => self.update_playing_scene()?,
                SceneType::GameOver(completion_state) => {
                    self.update_game_over_scene(completion_state)?
                }
            };
            if exit {
                break;
            }
            next_frame().await;
        }
        Ok(())
    }

    /// Updates the playing scene, returns true if exit is requested
    fn update_playing_scene(&mut self) -> LockroomResult<bool> {
        if self.game_state.pending_quiz.is_some() {
            if let Some(choice) = self.input.quiz_choice() {
                let result = self.game_state.answer_quiz(choice);
                self.report(result);
            }
        } else if let Some(command) = self.input.next_command() {
            if command == Command::ShowLog {
                self.display.toggle_log();
            } else {
                let result = self.game_state.handle_command(command);
                self.report(result);
            }
        }

        if self.game_state.level.is_transition_pending() {
            let events = self.game_state.rebuild_if_pending().map_err(|e| {
                error!("Could not build level {}: {}", self.game_state.level.current_level, e);
                e
            })?;
            publish(&mut self.display, &events);
        }

        if self.game_state.is_game_ended() {
            self.current_scene = SceneType::GameOver(self.game_state.get_completion_state());
        }

        self.display.render_game(&self.game_state)?;
        Ok(false)
    }

    /// Updates the game over scene, returns true if exit is requested
    fn update_game_over_scene(
        &mut self,
        completion_state: GameCompletionState,
    ) -> LockroomResult<bool> {
        self.display.ui.render_ending_screen(
            completion_state,
            &self.game_state.statistics,
            self.game_state.inventory.score,
        );

        let choice = self
            .input
            .next_command()
            .map(GameOverChoice::from_command)
            .unwrap_or(GameOverChoice::Stay);
        match choice {
            GameOverChoice::NewGame => self.start_new_game()?,
            GameOverChoice::Exit => return Ok(true),
            GameOverChoice::Stay => {}
        }
        Ok(false)
    }

    /// Shows event messages, or the error when a command was refused.
    fn report(&mut self, result: LockroomResult<Vec<GameEvent>>) {
        match result {
            Ok(events) => publish(&mut self.display, &events),
            Err(e) => self
                .display
                .add_message(e.to_string(), MessageImportance::Warning),
        }
    }

    /// Starts a new run with a fresh seed
    fn start_new_game(&mut self) -> LockroomResult<()> {
        let new_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(self.config.seed.wrapping_add(1));
        info!("Starting new game with seed: {}", new_seed);

        self.config.seed = new_seed;
        self.game_state = GameState::new(self.config.clone(), self.npc_pool.clone());
        let events = self.game_state.start()?;

        self.current_scene = SceneType::Playing;
        self.display
            .add_message("New game started!".to_string(), MessageImportance::Info);
        publish(&mut self.display, &events);
        Ok(())
    }
}

fn publish(display: &mut MacroquadDisplay, events: &[GameEvent]) {
    for event in events {
        if let Some((text, importance)) = event.describe() {
            display.add_message(text, importance);
        }
    }
}
