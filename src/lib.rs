//! # Lockroom
//!
//! A turn-based, grid-based escape room. The player walks a walled board,
//! answers NPC quizzes and collects key fragments until there are enough to
//! open the door, which regenerates a larger, harder level.
//!
//! ## Architecture Overview
//!
//! - **Board**: the tile grid and its invariant wall border
//! - **Entity Registry**: the single source of truth for what occupies a cell
//! - **Placement**: retry-bounded random spawning under a 3x3 separation rule
//! - **Movement Rules / Interaction**: what the player may step on, and what
//!   happens when they act on a neighbouring cell
//! - **Level Progression**: the difficulty ramp and destroy-and-rebuild cycle
//!
//! Rendering and input are thin macroquad adapters around the core; the core
//! itself never blocks and never touches the screen.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

pub use game::{
    // From board
    Board,
    TileKind,
    // From entities
    ConcreteEntity,
    Door,
    DoorOrientation,
    Entity,
    KeyFragment,
    Npc,
    Player,
    Wall,
    // From the game module itself
    Direction,
    Position,
    // From interaction
    InteractionOutcome,
    PendingQuiz,
    QuizOutcome,
    // From level
    Difficulty,
    LevelState,
    LevelTransition,
    // From registry
    EntityRegistry,
    // From state
    GameCompletionState,
    GameEvent,
    GameState,
    HudSnapshot,
    Inventory,
    MessageImportance,
};

pub use generation::{
    NpcDataSource, NpcRecord, PlacementEngine, PlacementReport, RandomSource, SeededRandom,
    SessionConfig,
};

pub use rendering::{MacroquadDisplay, Renderer, TextRenderer, UI};

/// Core error type for the Lockroom engine.
#[derive(thiserror::Error, Debug)]
pub enum LockroomError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Board dimensions are unusable
    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    /// A structural invariant does not hold (missing board, missing entity)
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// An entity could not be placed on the board
    #[error("Placement failed: {0}")]
    PlacementFailed(String),

    /// A data record could not be parsed
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// Result type used throughout the Lockroom codebase.
pub type LockroomResult<T> = Result<T, LockroomError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tuning constants. Every value can be overridden through
/// [`SessionConfig`].
pub mod config {
    /// Narrowest board ever generated, in tiles
    pub const MIN_BOARD_WIDTH: u32 = 45;

    /// Lower bound for the randomly chosen first-level board height
    pub const MIN_BOARD_HEIGHT: u32 = 15;

    /// Upper bound (inclusive) for the first-level board height
    pub const MAX_BOARD_HEIGHT: u32 = 17;

    /// Board width added on every level transition
    pub const BOARD_WIDTH_STEP: u32 = 5;

    /// Key fragments needed to open the first door
    pub const INITIAL_REQUIRED_KEYS: u32 = 5;

    /// Extra key fragments required per level
    pub const REQUIRED_KEYS_STEP: u32 = 3;

    /// NPCs placed on the first level
    pub const INITIAL_NPC_COUNT: u32 = 3;

    /// NPCs added per level
    pub const NPC_COUNT_STEP: u32 = 1;

    /// Key fragments placed on the first level
    pub const INITIAL_KEY_COUNT: u32 = 3;

    /// Key fragments added per level
    pub const KEY_COUNT_STEP: u32 = 1;

    /// Fragments granted by a single key pickup
    pub const KEY_FRAGMENT_AMOUNT: u32 = 1;

    /// Random draws before a spawn is given up
    pub const MAX_SPAWN_ATTEMPTS: u32 = 50;

    /// Lives the player starts a run with
    pub const STARTING_LIVES: u32 = 3;

    /// The player is dead once lives drop to this value
    pub const DEATH_THRESHOLD: u32 = 0;

    /// Options shown on screen for every quiz
    pub const QUIZ_OPTION_COUNT: usize = 3;

    /// Answer options an NPC may carry (the correct one plus distractors)
    pub const MAX_ANSWER_OPTIONS: usize = 4;
}
