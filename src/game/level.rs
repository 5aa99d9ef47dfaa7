//! # Level Progression
//!
//! Tracks the current level, the key requirement for its door and the
//! difficulty of the next board. Opening the door advances everything by a
//! fixed step and tears down the current board and registry.

use crate::game::{Board, EntityRegistry, Inventory, Player};
use crate::generation::{RandomSource, SessionConfig};
use crate::LockroomResult;
use log::info;
use serde::{Deserialize, Serialize};

/// Size and population of one level's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub board_width: u32,
    pub board_height: u32,
    pub npc_count: u32,
    pub key_count: u32,
}

/// How much harder each level gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRamp {
    pub required_keys_step: u32,
    pub board_width_step: u32,
    pub npc_count_step: u32,
    pub key_count_step: u32,
}

/// Progress through the run. Never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    /// 1-based level number
    pub current_level: u32,
    /// Key fragments the current door demands
    pub required_keys: u32,
    /// Size and population of the current (or next) board
    pub difficulty: Difficulty,
    /// Per-level increments
    pub ramp: DifficultyRamp,
    transition_pending: bool,
}

/// Everything the orchestrating loop needs after a door opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTransition {
    pub from_level: u32,
    pub to_level: u32,
    pub keys_spent: u32,
    /// The player lifted off the old board, lives intact
    pub carried_player: Option<Player>,
}

impl LevelState {
    /// Creates level 1. The board height is drawn once from the configured
    /// range and then held for the whole run.
    pub fn new(config: &SessionConfig, rng: &mut dyn RandomSource) -> Self {
        let max_height = config.max_board_height.max(config.min_board_height);
        let board_height = rng.int_in_range(
            config.min_board_height as usize,
            max_height as usize + 1,
        ) as u32;

        Self {
            current_level: 1,
            required_keys: config.initial_required_keys,
            difficulty: Difficulty {
                board_width: config.min_board_width,
                board_height,
                npc_count: config.initial_npc_count,
                key_count: config.initial_key_count,
            },
            ramp: DifficultyRamp {
                required_keys_step: config.required_keys_step,
                board_width_step: config.board_width_step,
                npc_count_step: config.npc_count_step,
                key_count_step: config.key_count_step,
            },
            transition_pending: false,
        }
    }

    /// Whether the board must be rebuilt before play continues.
    pub fn is_transition_pending(&self) -> bool {
        self.transition_pending
    }

    /// Called by the orchestrating loop once the new board is populated.
    pub fn complete_transition(&mut self) {
        self.transition_pending = false;
    }

    /// Pays for the door and ramps up to the next level.
    ///
    /// Debits the current requirement from `inventory`, raises the
    /// requirement, the level number, the board width and the NPC and key
    /// counts, lifts the player off the board, clears the registry and
    /// destroys the board. Fails without changing anything when the
    /// inventory cannot pay.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{Board, EntityRegistry, Inventory, LevelState, SeededRandom, SessionConfig};
    ///
    /// let config = SessionConfig::new(1);
    /// let mut level = LevelState::new(&config, &mut SeededRandom::new(1));
    /// let mut inventory = Inventory { key_fragments: 5, score: 0 };
    /// let mut registry = EntityRegistry::new();
    /// let mut board = Some(Board::new(45, 15).unwrap());
    ///
    /// let transition = level.advance_level(&mut inventory, &mut registry, &mut board).unwrap();
    /// assert_eq!(transition.to_level, 2);
    /// assert_eq!(level.required_keys, 8);
    /// assert!(board.is_none());
    /// ```
    pub fn advance_level(
        &mut self,
        inventory: &mut Inventory,
        registry: &mut EntityRegistry,
        board: &mut Option<Board>,
    ) -> LockroomResult<LevelTransition> {
        let keys_spent = self.required_keys;
        inventory.debit_keys(keys_spent)?;

        let from_level = self.current_level;
        self.current_level += 1;
        self.required_keys += self.ramp.required_keys_step;
        self.difficulty.board_width += self.ramp.board_width_step;
        self.difficulty.npc_count += self.ramp.npc_count_step;
        self.difficulty.key_count += self.ramp.key_count_step;

        let carried_player = registry.take_player();
        registry.clear();
        *board = None;
        self.transition_pending = true;

        info!(
            "Advanced to level {} (door needs {} keys, board {}x{})",
            self.current_level,
            self.required_keys,
            self.difficulty.board_width,
            self.difficulty.board_height
        );

        Ok(LevelTransition {
            from_level,
            to_level: self.current_level,
            keys_spent,
            carried_player,
        })
    }
}
