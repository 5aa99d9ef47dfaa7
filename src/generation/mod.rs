//! # Generation Module
//!
//! Level population: session tuning, the seedable random source, NPC
//! datasets and the constrained-random placement engine.

pub mod npcs;
pub mod placement;

pub use npcs::*;
pub use placement::*;

use crate::{config, LockroomResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning for one run: board sizes, difficulty ramp and spawn limits.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Random seed for reproducible levels
    pub seed: u64,
    /// Name shown on the HUD
    pub player_name: String,
    /// Width of the first board
    pub min_board_width: u32,
    /// Lower bound for the first board height
    pub min_board_height: u32,
    /// Upper bound (inclusive) for the first board height
    pub max_board_height: u32,
    /// Width added per level
    pub board_width_step: u32,
    /// Keys needed for the first door
    pub initial_required_keys: u32,
    /// Keys added to the requirement per level
    pub required_keys_step: u32,
    /// NPCs on the first level
    pub initial_npc_count: u32,
    /// NPCs added per level
    pub npc_count_step: u32,
    /// Key fragments on the first level
    pub initial_key_count: u32,
    /// Key fragments added per level
    pub key_count_step: u32,
    /// Fragments granted by one pickup
    pub key_fragment_amount: u32,
    /// Random draws per spawn before giving up
    pub max_spawn_attempts: u32,
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Lives at or below which the run ends
    pub death_threshold: u32,
}

impl SessionConfig {
    /// Creates the default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::SessionConfig;
    ///
    /// let config = SessionConfig::new(7);
    /// assert_eq!(config.min_board_width, 45);
    /// assert_eq!(config.initial_required_keys, 5);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            player_name: "Player".to_string(),
            min_board_width: config::MIN_BOARD_WIDTH,
            min_board_height: config::MIN_BOARD_HEIGHT,
            max_board_height: config::MAX_BOARD_HEIGHT,
            board_width_step: config::BOARD_WIDTH_STEP,
            initial_required_keys: config::INITIAL_REQUIRED_KEYS,
            required_keys_step: config::REQUIRED_KEYS_STEP,
            initial_npc_count: config::INITIAL_NPC_COUNT,
            npc_count_step: config::NPC_COUNT_STEP,
            initial_key_count: config::INITIAL_KEY_COUNT,
            key_count_step: config::KEY_COUNT_STEP,
            key_fragment_amount: config::KEY_FRAGMENT_AMOUNT,
            max_spawn_attempts: config::MAX_SPAWN_ATTEMPTS,
            starting_lives: config::STARTING_LIVES,
            death_threshold: config::DEATH_THRESHOLD,
        }
    }

    /// Creates a configuration for tests: minimum board size, no height
    /// variance, and enough keys on the floor to open the first door.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            max_board_height: config::MIN_BOARD_HEIGHT,
            initial_key_count: 5,
            ..Self::new(seed)
        }
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> LockroomResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> LockroomResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Source of randomness for placement, NPC selection and quiz ordering.
///
/// Everything random in the core flows through this trait so tests can
/// seed or script it.
pub trait RandomSource: std::fmt::Debug {
    /// Uniform integer in `min..max_exclusive`. An empty range yields `min`.
    fn int_in_range(&mut self, min: usize, max_exclusive: usize) -> usize;
}

/// [`RandomSource`] backed by a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a deterministic source from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn int_in_range(&mut self, min: usize, max_exclusive: usize) -> usize {
        if max_exclusive <= min {
            return min;
        }
        self.rng.gen_range(min..max_exclusive)
    }
}

/// Utility functions shared by the generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random source from the config.
    pub fn create_rng(config: &SessionConfig) -> SeededRandom {
        SeededRandom::new(config.seed)
    }

    /// Fisher-Yates shuffle of the whole slice.
    pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
        let len = items.len();
        partial_shuffle(rng, items, len);
    }

    /// Fisher-Yates partial shuffle: afterwards the first `count` items are
    /// a uniform sample without replacement. Returns that prefix length.
    pub fn partial_shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T], count: usize) -> usize {
        let count = count.min(items.len());
        for i in 0..count {
            let j = rng.int_in_range(i, items.len());
            items.swap(i, j);
        }
        count
    }
}
