//! # Game State Module
//!
//! Session-wide state and the command handling that ties the board, the
//! registry, placement, interaction and level progression together.
//!
//! `GameState` owns every mutable structure for one run and lends them to
//! the individual systems for the duration of a single command. It never
//! blocks: a quiz leaves `pending_quiz` set until the caller answers it.

use crate::game::interaction::{self, InteractionOutcome, PendingQuiz, QuizOutcome};
use crate::game::{
    is_move_allowed, Board, Direction, EntityRegistry, LevelState, Player, Position, TileKind,
};
use crate::generation::{
    select_npcs, utils, NpcRecord, PlacementEngine, PlacementReport, PlacementRequest,
    RandomSource, SessionConfig,
};
use crate::input::Command;
use crate::{LockroomError, LockroomResult};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Key fragments and score carried across levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub key_fragments: u32,
    pub score: u32,
}

impl Inventory {
    /// Adds key fragments, saturating at `u32::MAX`. Returns the new total.
    pub fn credit_keys(&mut self, amount: u32) -> u32 {
        self.key_fragments = self.key_fragments.saturating_add(amount);
        self.key_fragments
    }

    /// Adds score, saturating at `u32::MAX`.
    pub fn credit_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Removes `amount` key fragments, or fails without changing anything.
    pub fn debit_keys(&mut self, amount: u32) -> LockroomResult<()> {
        self.key_fragments = self.key_fragments.checked_sub(amount).ok_or_else(|| {
            LockroomError::InvalidAction(format!(
                "need {} key fragments, have {}",
                amount, self.key_fragments
            ))
        })?;
        Ok(())
    }
}

/// How prominently a message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Info,
    Success,
    Warning,
    Critical,
}

/// Things that happened while handling a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted {
        level: u32,
        required_keys: u32,
        width: u32,
        height: u32,
    },
    PlayerMoved {
        from: Position,
        to: Position,
    },
    MoveBlocked {
        target: Position,
        tile: TileKind,
    },
    KeyCollected {
        amount: u32,
        total: u32,
    },
    QuizStarted {
        npc_name: String,
    },
    QuizCorrect {
        npc_name: String,
        points: u32,
        keys: u32,
    },
    QuizIncorrect {
        npc_name: String,
        correct_answer: String,
        lives_left: u32,
    },
    NpcSilent {
        name: String,
    },
    DoorLocked {
        have: u32,
        required: u32,
    },
    DoorOpened {
        from_level: u32,
        to_level: u32,
    },
    NothingThere {
        tile: TileKind,
    },
    PlayerDied {
        level: u32,
    },
}

impl GameEvent {
    /// Player-facing text for the message log, if the event has any.
    pub fn describe(&self) -> Option<(String, MessageImportance)> {
        use MessageImportance::*;

        let described = match self {
            GameEvent::LevelStarted {
                level,
                required_keys,
                ..
            } => (
                format!(
                    "Level {}: find {} key fragments to open the door.",
                    level, required_keys
                ),
                Info,
            ),
            GameEvent::PlayerMoved { .. } => return None,
            GameEvent::MoveBlocked { tile, .. } => match tile {
                TileKind::Npc | TileKind::Door => (
                    format!("A {} blocks the way. Press E to interact.", tile.name()),
                    Info,
                ),
                _ => return None,
            },
            GameEvent::KeyCollected { amount, total } => (
                format!("Picked up {} key fragment(s), {} in total.", amount, total),
                Success,
            ),
            GameEvent::QuizStarted { npc_name } => {
                (format!("{} has a question for you.", npc_name), Info)
            }
            GameEvent::QuizCorrect {
                npc_name,
                points,
                keys,
            } => (
                format!(
                    "{}: Correct! +{} points, +{} key fragment(s).",
                    npc_name, points, keys
                ),
                Success,
            ),
            GameEvent::QuizIncorrect {
                npc_name,
                correct_answer,
                lives_left,
            } => (
                format!(
                    "{}: Wrong, it was '{}'. {} lives left.",
                    npc_name, correct_answer, lives_left
                ),
                Warning,
            ),
            GameEvent::NpcSilent { name } => {
                (format!("{} will not talk to you again.", name), Info)
            }
            GameEvent::DoorLocked { have, required } => (
                format!(
                    "The door is locked: {} of {} key fragments.",
                    have, required
                ),
                Warning,
            ),
            GameEvent::DoorOpened { to_level, .. } => {
                (format!("The door opens! On to level {}.", to_level), Success)
            }
            GameEvent::NothingThere { .. } => {
                ("There is nothing to interact with.".to_string(), Info)
            }
            GameEvent::PlayerDied { level } => (format!("You died on level {}.", level), Critical),
        };
        Some(described)
    }
}

/// Run statistics derived from events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub steps_taken: u64,
    pub key_fragments_collected: u32,
    pub quizzes_correct: u32,
    pub quizzes_incorrect: u32,
    pub doors_opened: u32,
    pub max_level_reached: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved { .. } => self.steps_taken += 1,
            GameEvent::KeyCollected { amount, .. } => self.key_fragments_collected += amount,
            GameEvent::QuizCorrect { .. } => self.quizzes_correct += 1,
            GameEvent::QuizIncorrect { .. } => self.quizzes_incorrect += 1,
            GameEvent::DoorOpened { .. } => self.doors_opened += 1,
            GameEvent::LevelStarted { level, .. } => {
                self.max_level_reached = self.max_level_reached.max(*level)
            }
            _ => {}
        }
    }
}

/// How the run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Lives ran out
    PlayerDied,
    /// The player quit
    Quit,
}

/// Everything the HUD shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSnapshot {
    pub player_name: String,
    pub lives: u32,
    pub key_fragments: u32,
    pub required_keys: u32,
    pub score: u32,
    pub level: u32,
    pub door_open: bool,
    pub encounter: Option<PendingQuiz>,
}

/// All mutable state of one run.
#[derive(Debug)]
pub struct GameState {
    /// Tuning for this run
    pub config: SessionConfig,
    /// The current board; `None` between levels
    pub board: Option<Board>,
    /// Entities on the current board
    pub registry: EntityRegistry,
    /// Keys and score, carried across levels
    pub inventory: Inventory,
    /// Level number, key requirement and difficulty
    pub level: LevelState,
    /// Every NPC record this run may draw from
    pub npc_pool: Vec<NpcRecord>,
    /// Quiz waiting for an answer, if any
    pub pending_quiz: Option<PendingQuiz>,
    /// Current game completion state
    pub completion_state: GameCompletionState,
    /// Game statistics for player progress
    pub statistics: GameStatistics,
    /// Result of the most recent placement pass
    pub last_placement: Option<PlacementReport>,
    /// Commands that changed or probed the board
    pub turn_number: u64,
    game_start_time: Option<Instant>,
    carried_player: Option<Player>,
    placement: PlacementEngine,
    rng: Box<dyn RandomSource>,
}

impl GameState {
    /// Creates a run seeded from the configuration. Call
    /// [`start`](Self::start) to build the first level.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{BuiltinNpcs, GameState, NpcDataSource, SessionConfig};
    ///
    /// let npcs = BuiltinNpcs.load_all().unwrap();
    /// let mut game_state = GameState::new(SessionConfig::new(12345), npcs);
    /// game_state.start().unwrap();
    /// assert_eq!(game_state.level.current_level, 1);
    /// assert!(game_state.registry.player().is_some());
    /// ```
    pub fn new(config: SessionConfig, npc_pool: Vec<NpcRecord>) -> Self {
        let rng = Box::new(utils::create_rng(&config));
        Self::with_random_source(config, npc_pool, rng)
    }

    /// Creates a run with an explicit random source.
    pub fn with_random_source(
        config: SessionConfig,
        npc_pool: Vec<NpcRecord>,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let level = LevelState::new(&config, rng.as_mut());
        Self {
            placement: PlacementEngine::from_config(&config),
            config,
            board: None,
            registry: EntityRegistry::new(),
            inventory: Inventory::default(),
            level,
            npc_pool,
            pending_quiz: None,
            completion_state: GameCompletionState::Playing,
            statistics: GameStatistics::new(),
            last_placement: None,
            turn_number: 0,
            game_start_time: None,
            carried_player: None,
            rng,
        }
    }

    /// Builds the first level and starts the session timer.
    pub fn start(&mut self) -> LockroomResult<Vec<GameEvent>> {
        self.game_start_time = Some(Instant::now());
        self.build_level()
    }

    /// Rebuilds the board after a door opened. A no-op otherwise.
    pub fn rebuild_if_pending(&mut self) -> LockroomResult<Vec<GameEvent>> {
        if !self.level.is_transition_pending() {
            return Ok(Vec::new());
        }
        self.build_level()
    }

    /// Creates and populates a fresh board for the current level.
    fn build_level(&mut self) -> LockroomResult<Vec<GameEvent>> {
        let difficulty = self.level.difficulty;
        let mut board = Board::new(difficulty.board_width, difficulty.board_height)?;
        self.registry.clear();

        let player = self.carried_player.take().unwrap_or_else(|| {
            Player::with_lives(
                self.config.player_name.clone(),
                Position::new(0, 0),
                self.config.starting_lives,
                self.config.death_threshold,
            )
        });
        let npcs = select_npcs(
            &self.npc_pool,
            difficulty.npc_count as usize,
            self.rng.as_mut(),
        );
        if npcs.len() < difficulty.npc_count as usize {
            warn!(
                "Only {} NPC records available, level asks for {}",
                npcs.len(),
                difficulty.npc_count
            );
        }

        let request = PlacementRequest {
            player: player.clone(),
            npcs,
            key_count: difficulty.key_count,
            key_amount: self.config.key_fragment_amount,
        };
        let report = self
            .placement
            .populate(&mut board, &mut self.registry, request, self.rng.as_mut());

        if report.player.is_none() {
            error!("Level {} has no room for the player", self.level.current_level);
            self.registry.clear();
            self.carried_player = Some(player);
            return Err(LockroomError::PlacementFailed(
                "player could not be placed".to_string(),
            ));
        }

        self.board = Some(board);
        self.last_placement = Some(report);
        self.level.complete_transition();
        info!(
            "Level {} ready ({}x{})",
            self.level.current_level, difficulty.board_width, difficulty.board_height
        );

        let events = vec![GameEvent::LevelStarted {
            level: self.level.current_level,
            required_keys: self.level.required_keys,
            width: difficulty.board_width,
            height: difficulty.board_height,
        }];
        self.record(&events);
        Ok(events)
    }

    /// Handles one player command.
    ///
    /// While a quiz is pending every command is refused; the quiz must be
    /// answered through [`answer_quiz`](Self::answer_quiz).
    pub fn handle_command(&mut self, command: Command) -> LockroomResult<Vec<GameEvent>> {
        if self.is_game_ended() {
            return Ok(Vec::new());
        }
        if self.pending_quiz.is_some() {
            return Err(LockroomError::InvalidAction(
                "answer the question first (1, 2 or 3)".to_string(),
            ));
        }

        let events = match (command, command.direction()) {
            (_, Some(direction)) => self.move_player(direction)?,
            (Command::Interact, _) => self.interact_facing()?,
            (Command::Quit, _) => {
                info!("Player quit on level {}", self.level.current_level);
                self.completion_state = GameCompletionState::Quit;
                return Ok(Vec::new());
            }
            _ => return Ok(Vec::new()),
        };

        self.turn_number += 1;
        self.record(&events);
        Ok(events)
    }

    /// Feeds the player's 1-based answer into the pending quiz.
    ///
    /// Invalid choices leave the quiz pending. A quiz whose NPC or player
    /// has vanished is dropped so play can continue.
    pub fn answer_quiz(&mut self, choice: usize) -> LockroomResult<Vec<GameEvent>> {
        let quiz = self
            .pending_quiz
            .as_ref()
            .ok_or_else(|| LockroomError::InvalidAction("no question is pending".to_string()))?;

        let outcome =
            match interaction::answer_quiz(&mut self.registry, &mut self.inventory, quiz, choice) {
                Ok(outcome) => outcome,
                Err(e @ LockroomError::InvalidState(_)) => {
                    error!("Dropping quiz from {}: {}", quiz.npc_name, e);
                    self.pending_quiz = None;
                    return Err(e);
                }
                Err(e) => return Err(e),
            };
        let npc_name = quiz.npc_name.clone();
        self.pending_quiz = None;

        let mut events = vec![match outcome {
            QuizOutcome::Correct { points, keys } => GameEvent::QuizCorrect {
                npc_name,
                points,
                keys,
            },
            QuizOutcome::Incorrect {
                lives_left,
                correct_answer,
            } => GameEvent::QuizIncorrect {
                npc_name,
                correct_answer,
                lives_left,
            },
        }];

        if self.registry.player().map_or(false, |player| !player.is_alive()) {
            info!("Player died on level {}", self.level.current_level);
            self.completion_state = GameCompletionState::PlayerDied;
            events.push(GameEvent::PlayerDied {
                level: self.level.current_level,
            });
        }

        self.turn_number += 1;
        self.record(&events);
        Ok(events)
    }

    fn move_player(&mut self, direction: Direction) -> LockroomResult<Vec<GameEvent>> {
        let from = self.player_position()?;
        let target = from.offset(direction);
        let board = self.board.as_ref().ok_or_else(|| {
            error!("Move attempted without a board");
            LockroomError::InvalidState("no board".to_string())
        })?;

        if let Some(player) = self.registry.player_mut() {
            player.facing = direction;
        }
        let tile = board.get(target);
        if !is_move_allowed(board, target) {
            return Ok(vec![GameEvent::MoveBlocked { target, tile }]);
        }

        let mut events = Vec::new();
        if tile == TileKind::Key {
            events.extend(self.resolve_interaction(target)?);
        }

        self.registry.move_entity(from, target)?;
        if let Some(board) = self.board.as_mut() {
            board.set(from, TileKind::Empty);
            board.set(target, TileKind::Player);
        }
        events.push(GameEvent::PlayerMoved { from, to: target });
        Ok(events)
    }

    fn interact_facing(&mut self) -> LockroomResult<Vec<GameEvent>> {
        let from = self.player_position()?;
        let facing = self
            .registry
            .player()
            .map(|player| player.facing)
            .unwrap_or(Direction::Down);
        self.resolve_interaction(from.offset(facing))
    }

    fn resolve_interaction(&mut self, target: Position) -> LockroomResult<Vec<GameEvent>> {
        let outcome = interaction::interact(
            &mut self.board,
            &mut self.registry,
            &mut self.inventory,
            &mut self.level,
            self.rng.as_mut(),
            target,
        )?;

        let event = match outcome {
            InteractionOutcome::KeyCollected { amount, total } => {
                GameEvent::KeyCollected { amount, total }
            }
            InteractionOutcome::QuizStarted(quiz) => {
                let npc_name = quiz.npc_name.clone();
                self.pending_quiz = Some(quiz);
                GameEvent::QuizStarted { npc_name }
            }
            InteractionOutcome::NpcSilent { name } => GameEvent::NpcSilent { name },
            InteractionOutcome::DoorLocked { have, required } => {
                GameEvent::DoorLocked { have, required }
            }
            InteractionOutcome::DoorOpened(transition) => {
                self.carried_player = transition.carried_player;
                GameEvent::DoorOpened {
                    from_level: transition.from_level,
                    to_level: transition.to_level,
                }
            }
            InteractionOutcome::Nothing(tile) => GameEvent::NothingThere { tile },
        };
        Ok(vec![event])
    }

    fn player_position(&self) -> LockroomResult<Position> {
        self.registry.player_position().ok_or_else(|| {
            error!("No player registered on level {}", self.level.current_level);
            LockroomError::InvalidState("no player on the board".to_string())
        })
    }

    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            debug!("Event: {:?}", event);
            self.statistics.update_from_event(event);
        }
    }

    /// Whether the run is over.
    pub fn is_game_ended(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    /// Gets the current completion state.
    pub fn get_completion_state(&self) -> GameCompletionState {
        self.completion_state
    }

    /// Time since [`start`](Self::start), for display only.
    pub fn elapsed(&self) -> Duration {
        self.game_start_time
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Gets the player, whether on the board or between levels.
    pub fn player(&self) -> Option<&Player> {
        self.registry.player().or(self.carried_player.as_ref())
    }

    /// Snapshot of everything the HUD shows.
    pub fn hud_snapshot(&self) -> HudSnapshot {
        let player = self.player();
        HudSnapshot {
            player_name: player
                .map(|p| p.name.clone())
                .unwrap_or_else(|| self.config.player_name.clone()),
            lives: player.map(|p| p.lives).unwrap_or_default(),
            key_fragments: self.inventory.key_fragments,
            required_keys: self.level.required_keys,
            score: self.inventory.score,
            level: self.level.current_level,
            door_open: self.registry.door().map_or(false, |door| door.is_open),
            encounter: self.pending_quiz.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Door, DoorOrientation, Entity, KeyFragment, Npc};
    use crate::generation::{BuiltinNpcs, NpcDataSource};

    fn started(seed: u64) -> GameState {
        let npcs = BuiltinNpcs.load_all().unwrap();
        let mut game_state = GameState::new(SessionConfig::for_testing(seed), npcs);
        game_state.start().unwrap();
        game_state
    }

    /// Clears the board around the player and puts `entity` right of them.
    fn stage(game_state: &mut GameState, entity: crate::game::ConcreteEntity) -> Position {
        let player = game_state.registry.player_position().unwrap();
        let target = player.offset(Direction::Right);
        let board = game_state.board.as_mut().unwrap();
        if let Some(existing) = game_state.registry.remove(target) {
            board.set(existing.position(), TileKind::Empty);
        }
        board.set(target, entity.tile_kind());
        game_state.registry.insert(target, entity);
        target
    }

    #[test]
    fn test_start_builds_first_level() {
        let game_state = started(12345);
        let board = game_state.board.as_ref().unwrap();

        assert_eq!(board.width, 45);
        assert_eq!(board.height, 15);
        assert!(game_state.registry.player().is_some());
        assert!(game_state.registry.door().is_some());
        assert!(game_state.last_placement.as_ref().unwrap().player.is_some());
        assert_eq!(game_state.statistics.max_level_reached, 1);
        assert!(!game_state.level.is_transition_pending());
    }

    #[test]
    fn test_inventory_debit() {
        let mut inventory = Inventory {
            key_fragments: 3,
            score: 9,
        };
        assert!(inventory.debit_keys(4).is_err());
        assert_eq!(inventory.key_fragments, 3);
        inventory.debit_keys(3).unwrap();
        assert_eq!(inventory.key_fragments, 0);
    }

    #[test]
    fn test_inventory_credits_saturate() {
        let mut inventory = Inventory {
            key_fragments: u32::MAX - 1,
            score: u32::MAX,
        };
        assert_eq!(inventory.credit_keys(5), u32::MAX);
        inventory.credit_score(10);
        assert_eq!(inventory.score, u32::MAX);
    }

    #[test]
    fn test_movement_updates_board_and_registry() {
        let mut game_state = started(1);
        let start = game_state.registry.player_position().unwrap();
        let target = start.offset(Direction::Right);
        game_state.registry.remove(target);
        game_state.board.as_mut().unwrap().set(target, TileKind::Empty);

        let events = game_state.handle_command(Command::Right).unwrap();
        assert_eq!(events, vec![GameEvent::PlayerMoved { from: start, to: target }]);

        let board = game_state.board.as_ref().unwrap();
        assert_eq!(board.get(start), TileKind::Empty);
        assert_eq!(board.get(target), TileKind::Player);
        assert_eq!(game_state.registry.player_position(), Some(target));
        assert_eq!(game_state.statistics.steps_taken, 1);
        assert_eq!(game_state.turn_number, 1);
    }

    #[test]
    fn test_stepping_on_key_collects_it() {
        let mut game_state = started(2);
        let target = stage(&mut game_state, KeyFragment::new(Position::new(0, 0), 2).into());

        let events = game_state.handle_command(Command::Right).unwrap();
        assert!(events.contains(&GameEvent::KeyCollected { amount: 2, total: 2 }));
        assert_eq!(game_state.inventory.key_fragments, 2);
        assert_eq!(game_state.registry.player_position(), Some(target));
    }

    #[test]
    fn test_bumping_npc_blocks_and_faces() {
        let mut game_state = started(3);
        let start = game_state.registry.player_position().unwrap();
        let npc = BuiltinNpcs.load_all().unwrap()[0].to_npc(Position::new(0, 0));
        let target = stage(&mut game_state, npc.into());

        let events = game_state.handle_command(Command::Right).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::MoveBlocked {
                target,
                tile: TileKind::Npc
            }]
        );
        assert_eq!(game_state.registry.player_position(), Some(start));
        assert_eq!(
            game_state.registry.player().unwrap().facing,
            Direction::Right
        );
    }

    #[test]
    fn test_quiz_suspends_commands_until_answered() {
        let mut game_state = started(4);
        let npc = Npc::new(
            "Owl".to_string(),
            Position::new(0, 0),
            "2+2?".to_string(),
            "4".to_string(),
            vec!["3".to_string(), "5".to_string()],
            1,
            10,
        );
        stage(&mut game_state, npc.into());
        game_state.handle_command(Command::Right).unwrap();

        let events = game_state.handle_command(Command::Interact).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::QuizStarted {
                npc_name: "Owl".to_string()
            }]
        );
        assert!(game_state.hud_snapshot().encounter.is_some());
        assert!(game_state.handle_command(Command::Up).is_err());
        assert!(game_state.answer_quiz(7).is_err());
        assert!(game_state.pending_quiz.is_some());

        let choice = game_state
            .pending_quiz
            .as_ref()
            .unwrap()
            .options
            .iter()
            .position(|o| o == "4")
            .unwrap()
            + 1;
        let events = game_state.answer_quiz(choice).unwrap();
        assert!(matches!(events[0], GameEvent::QuizCorrect { points: 10, keys: 1, .. }));
        assert!(game_state.pending_quiz.is_none());
        assert_eq!(game_state.inventory.score, 10);
        assert_eq!(game_state.statistics.quizzes_correct, 1);
    }

    #[test]
    fn test_quiz_with_vanished_npc_is_dropped() {
        let mut game_state = started(8);
        let npc = BuiltinNpcs.load_all().unwrap()[1].to_npc(Position::new(0, 0));
        let target = stage(&mut game_state, npc.into());
        game_state.handle_command(Command::Right).unwrap();
        game_state.handle_command(Command::Interact).unwrap();
        assert!(game_state.pending_quiz.is_some());

        game_state.registry.remove(target);
        game_state.board.as_mut().unwrap().set(target, TileKind::Empty);

        let result = game_state.answer_quiz(1);
        assert!(matches!(result, Err(LockroomError::InvalidState(_))));
        assert!(game_state.pending_quiz.is_none());
        assert!(game_state.handle_command(Command::Right).is_ok());
    }

    #[test]
    fn test_move_without_board_changes_nothing() {
        let mut game_state = started(9);
        let facing = game_state.registry.player().unwrap().facing;
        let turned = if facing == Direction::Up {
            Command::Down
        } else {
            Command::Up
        };
        game_state.board = None;

        let result = game_state.handle_command(turned);
        assert!(matches!(result, Err(LockroomError::InvalidState(_))));
        assert_eq!(game_state.registry.player().unwrap().facing, facing);
        assert_eq!(game_state.turn_number, 0);
    }

    #[test]
    fn test_losing_last_life_ends_the_run() {
        let mut game_state = started(5);
        if let Some(player) = game_state.registry.player_mut() {
            player.lives = 1;
        }
        let npc = Npc::new(
            "Troll".to_string(),
            Position::new(0, 0),
            "Password?".to_string(),
            "swordfish".to_string(),
            vec!["tuna".to_string(), "carp".to_string()],
            1,
            10,
        );
        stage(&mut game_state, npc.into());
        game_state.handle_command(Command::Right).unwrap();
        game_state.handle_command(Command::Interact).unwrap();

        let wrong = game_state
            .pending_quiz
            .as_ref()
            .unwrap()
            .options
            .iter()
            .position(|o| o != "swordfish")
            .unwrap()
            + 1;
        let events = game_state.answer_quiz(wrong).unwrap();

        assert!(events.contains(&GameEvent::PlayerDied { level: 1 }));
        assert_eq!(game_state.get_completion_state(), GameCompletionState::PlayerDied);
        assert!(game_state.is_game_ended());
        assert!(game_state.handle_command(Command::Up).unwrap().is_empty());
    }

    #[test]
    fn test_door_transition_and_rebuild() {
        let mut game_state = started(6);
        let lives = game_state.registry.player().unwrap().lives;
        game_state.inventory.key_fragments = 6;
        stage(
            &mut game_state,
            Door::new(Position::new(0, 0), DoorOrientation::Horizontal).into(),
        );
        game_state.handle_command(Command::Right).unwrap();

        let events = game_state.handle_command(Command::Interact).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::DoorOpened {
                from_level: 1,
                to_level: 2
            }]
        );
        assert!(game_state.board.is_none());
        assert!(game_state.registry.is_empty());
        assert_eq!(game_state.inventory.key_fragments, 1);
        assert_eq!(game_state.hud_snapshot().lives, lives);

        let events = game_state.rebuild_if_pending().unwrap();
        assert!(matches!(events[0], GameEvent::LevelStarted { level: 2, required_keys: 8, .. }));
        assert_eq!(game_state.board.as_ref().unwrap().width, 50);
        assert_eq!(game_state.registry.player().unwrap().lives, lives);
        assert_eq!(game_state.registry.npcs().count(), 4);
        assert!(game_state.rebuild_if_pending().unwrap().is_empty());
    }

    #[test]
    fn test_quit() {
        let mut game_state = started(7);
        game_state.handle_command(Command::Quit).unwrap();
        assert_eq!(game_state.get_completion_state(), GameCompletionState::Quit);
    }

    #[test]
    fn test_event_descriptions() {
        let locked = GameEvent::DoorLocked { have: 2, required: 5 };
        let (text, importance) = locked.describe().unwrap();
        assert!(text.contains("2 of 5"));
        assert_eq!(importance, MessageImportance::Warning);

        let moved = GameEvent::PlayerMoved {
            from: Position::new(1, 1),
            to: Position::new(2, 1),
        };
        assert!(moved.describe().is_none());
    }
}
