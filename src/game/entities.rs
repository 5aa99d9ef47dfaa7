//! # Entities
//!
//! Stateful objects that occupy a board cell: the player, quiz NPCs, the
//! door, key fragments and structural walls.
//!
//! Every variant implements [`Entity`]; the registry stores them as the
//! closed [`ConcreteEntity`] union and dispatches with `match`.

use crate::config;
use crate::game::{Direction, Position, TileKind};
use serde::{Deserialize, Serialize};

/// Capabilities shared by everything that sits on the board.
pub trait Entity {
    /// Current board position.
    fn position(&self) -> Position;

    /// Moves the entity. Registry bookkeeping is the caller's job.
    fn set_position(&mut self, position: Position);

    /// Glyph drawn for this entity.
    fn symbol(&self) -> char;

    /// Tile kind mirrored into the grid while the entity is alive.
    fn tile_kind(&self) -> TileKind;
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name
    pub name: String,
    /// Current position
    pub position: Position,
    /// Remaining lives; only ever goes down
    pub lives: u32,
    /// Direction of the last movement attempt; the interact target
    pub facing: Direction,
    death_threshold: u32,
}

impl Player {
    /// Creates a player with the default starting lives.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::{Player, Position};
    ///
    /// let player = Player::new("Ada".to_string(), Position::new(3, 3));
    /// assert_eq!(player.lives, 3);
    /// assert!(player.is_alive());
    /// ```
    pub fn new(name: String, position: Position) -> Self {
        Self::with_lives(
            name,
            position,
            config::STARTING_LIVES,
            config::DEATH_THRESHOLD,
        )
    }

    /// Creates a player with explicit lives and death threshold.
    pub fn with_lives(name: String, position: Position, lives: u32, death_threshold: u32) -> Self {
        Self {
            name,
            position,
            lives,
            facing: Direction::Down,
            death_threshold,
        }
    }

    /// Whether the player still has lives above the death threshold.
    pub fn is_alive(&self) -> bool {
        self.lives > self.death_threshold
    }

    /// Removes exactly one life. Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

impl Entity for Player {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn symbol(&self) -> char {
        '@'
    }

    fn tile_kind(&self) -> TileKind {
        TileKind::Player
    }
}

/// A character who asks one question and rewards a correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    /// Display name
    pub name: String,
    /// Current position
    pub position: Position,
    /// The question asked
    pub question: String,
    /// The correct answer text
    pub correct_answer: String,
    /// Correct answer first, then distractors
    pub answer_options: Vec<String>,
    /// Key fragments granted for a correct answer
    pub reward_keys: u32,
    /// Score granted for a correct answer
    pub reward_points: u32,
    /// True only while an encounter is in progress
    pub is_active: bool,
    /// Latched after the first resolved encounter
    pub has_interacted: bool,
}

impl Npc {
    /// Creates a dormant NPC. Options beyond the configured maximum are
    /// dropped, blank distractors are ignored.
    pub fn new(
        name: String,
        position: Position,
        question: String,
        correct_answer: String,
        distractors: Vec<String>,
        reward_keys: u32,
        reward_points: u32,
    ) -> Self {
        let mut answer_options = vec![correct_answer.clone()];
        answer_options.extend(
            distractors
                .into_iter()
                .filter(|d| !d.trim().is_empty() && *d != correct_answer),
        );
        answer_options.truncate(config::MAX_ANSWER_OPTIONS);

        Self {
            name,
            position,
            question,
            correct_answer,
            answer_options,
            reward_keys,
            reward_points,
            is_active: false,
            has_interacted: false,
        }
    }

    /// Distractors only.
    pub fn distractors(&self) -> &[String] {
        self.answer_options.get(1..).unwrap_or(&[])
    }

    /// Exact-text comparison against the correct answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

impl Entity for Npc {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn symbol(&self) -> char {
        if self.has_interacted {
            '%'
        } else {
            '&'
        }
    }

    fn tile_kind(&self) -> TileKind {
        TileKind::Npc
    }
}

/// Which wall segment the door was cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorOrientation {
    /// Top or bottom wall
    Horizontal,
    /// Left or right wall
    Vertical,
}

/// The level exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Current position
    pub position: Position,
    /// Wall segment the door sits on
    pub orientation: DoorOrientation,
    /// Once open, stays open for the rest of the level
    pub is_open: bool,
}

impl Door {
    /// Creates a closed door.
    pub fn new(position: Position, orientation: DoorOrientation) -> Self {
        Self {
            position,
            orientation,
            is_open: false,
        }
    }

    /// Opens the door. There is no way to close it again.
    pub fn open(&mut self) {
        self.is_open = true;
    }
}

impl Entity for Door {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn symbol(&self) -> char {
        match (self.orientation, self.is_open) {
            (DoorOrientation::Horizontal, false) => '=',
            (DoorOrientation::Horizontal, true) => '_',
            (DoorOrientation::Vertical, false) => '#',
            (DoorOrientation::Vertical, true) => ':',
        }
    }

    fn tile_kind(&self) -> TileKind {
        TileKind::Door
    }
}

/// A collectible fragment of the door key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFragment {
    /// Current position
    pub position: Position,
    /// Fragments credited on pickup
    pub amount: u32,
}

impl KeyFragment {
    pub fn new(position: Position, amount: u32) -> Self {
        Self { position, amount }
    }
}

impl Entity for KeyFragment {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn symbol(&self) -> char {
        'k'
    }

    fn tile_kind(&self) -> TileKind {
        TileKind::Key
    }
}

/// A border wall cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub position: Position,
    pub kind: TileKind,
}

impl Wall {
    pub fn new(position: Position, kind: TileKind) -> Self {
        Self { position, kind }
    }
}

impl Entity for Wall {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn symbol(&self) -> char {
        self.kind.glyph()
    }

    fn tile_kind(&self) -> TileKind {
        self.kind
    }
}

/// Every entity that can occupy a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteEntity {
    Player(Player),
    Npc(Npc),
    Door(Door),
    Key(KeyFragment),
    Wall(Wall),
}

impl ConcreteEntity {
    /// Whether this entity keeps other spawns out of its 3x3 block.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, ConcreteEntity::Wall(_))
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ConcreteEntity::Player(_) => "player",
            ConcreteEntity::Npc(_) => "npc",
            ConcreteEntity::Door(_) => "door",
            ConcreteEntity::Key(_) => "key",
            ConcreteEntity::Wall(_) => "wall",
        }
    }
}

impl Entity for ConcreteEntity {
    fn position(&self) -> Position {
        match self {
            ConcreteEntity::Player(player) => player.position(),
            ConcreteEntity::Npc(npc) => npc.position(),
            ConcreteEntity::Door(door) => door.position(),
            ConcreteEntity::Key(key) => key.position(),
            ConcreteEntity::Wall(wall) => wall.position(),
        }
    }

    fn set_position(&mut self, position: Position) {
        match self {
            ConcreteEntity::Player(player) => player.set_position(position),
            ConcreteEntity::Npc(npc) => npc.set_position(position),
            ConcreteEntity::Door(door) => door.set_position(position),
            ConcreteEntity::Key(key) => key.set_position(position),
            ConcreteEntity::Wall(wall) => wall.set_position(position),
        }
    }

    fn symbol(&self) -> char {
        match self {
            ConcreteEntity::Player(player) => player.symbol(),
            ConcreteEntity::Npc(npc) => npc.symbol(),
            ConcreteEntity::Door(door) => door.symbol(),
            ConcreteEntity::Key(key) => key.symbol(),
            ConcreteEntity::Wall(wall) => wall.symbol(),
        }
    }

    fn tile_kind(&self) -> TileKind {
        match self {
            ConcreteEntity::Player(player) => player.tile_kind(),
            ConcreteEntity::Npc(npc) => npc.tile_kind(),
            ConcreteEntity::Door(door) => door.tile_kind(),
            ConcreteEntity::Key(key) => key.tile_kind(),
            ConcreteEntity::Wall(wall) => wall.tile_kind(),
        }
    }
}

impl From<Player> for ConcreteEntity {
    fn from(player: Player) -> Self {
        ConcreteEntity::Player(player)
    }
}

impl From<Npc> for ConcreteEntity {
    fn from(npc: Npc) -> Self {
        ConcreteEntity::Npc(npc)
    }
}

impl From<Door> for ConcreteEntity {
    fn from(door: Door) -> Self {
        ConcreteEntity::Door(door)
    }
}

impl From<KeyFragment> for ConcreteEntity {
    fn from(key: KeyFragment) -> Self {
        ConcreteEntity::Key(key)
    }
}

impl From<Wall> for ConcreteEntity {
    fn from(wall: Wall) -> Self {
        ConcreteEntity::Wall(wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_npc() -> Npc {
        Npc::new(
            "Sphinx".to_string(),
            Position::new(5, 5),
            "What walks on four legs in the morning?".to_string(),
            "Man".to_string(),
            vec!["Dog".to_string(), "".to_string(), "Cat".to_string()],
            2,
            10,
        )
    }

    #[test]
    fn test_player_lives_only_decrease() {
        let mut player = Player::new("Hero".to_string(), Position::new(1, 1));
        assert_eq!(player.lives, 3);
        assert_eq!(player.lose_life(), 2);
        assert_eq!(player.lose_life(), 1);
        assert!(player.is_alive());
        assert_eq!(player.lose_life(), 0);
        assert!(!player.is_alive());
        assert_eq!(player.lose_life(), 0);
    }

    #[test]
    fn test_custom_death_threshold() {
        let player = Player::with_lives("Hero".to_string(), Position::new(1, 1), 2, 2);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_npc_options_skip_blank_distractors() {
        let npc = sample_npc();
        assert_eq!(npc.answer_options, vec!["Man", "Dog", "Cat"]);
        assert_eq!(npc.distractors(), &["Dog".to_string(), "Cat".to_string()]);
        assert!(npc.is_correct("Man"));
        assert!(!npc.is_correct("man"));
        assert!(!npc.is_active);
        assert!(!npc.has_interacted);
    }

    #[test]
    fn test_npc_options_are_capped() {
        let npc = Npc::new(
            "Chatty".to_string(),
            Position::new(1, 1),
            "Pick one".to_string(),
            "A".to_string(),
            vec!["B", "C", "D", "E", "F"]
                .into_iter()
                .map(String::from)
                .collect(),
            1,
            1,
        );
        assert_eq!(npc.answer_options.len(), config::MAX_ANSWER_OPTIONS);
        assert_eq!(npc.answer_options[0], "A");
    }

    #[test]
    fn test_door_symbol_depends_on_orientation_and_state() {
        let mut horizontal = Door::new(Position::new(4, 0), DoorOrientation::Horizontal);
        let mut vertical = Door::new(Position::new(0, 4), DoorOrientation::Vertical);

        let closed = (horizontal.symbol(), vertical.symbol());
        assert_ne!(closed.0, closed.1);

        horizontal.open();
        vertical.open();
        assert!(horizontal.is_open);
        assert_ne!(horizontal.symbol(), closed.0);
        assert_ne!(vertical.symbol(), closed.1);
        assert_ne!(horizontal.symbol(), vertical.symbol());
    }

    #[test]
    fn test_concrete_entity_dispatch() {
        let mut entity: ConcreteEntity = KeyFragment::new(Position::new(2, 3), 5).into();
        assert_eq!(entity.position(), Position::new(2, 3));
        assert_eq!(entity.tile_kind(), TileKind::Key);
        assert!(entity.is_interactive());

        entity.set_position(Position::new(7, 7));
        assert_eq!(entity.position(), Position::new(7, 7));

        let wall: ConcreteEntity =
            Wall::new(Position::new(0, 0), TileKind::WallCornerTopLeft).into();
        assert!(!wall.is_interactive());
        assert_eq!(wall.symbol(), TileKind::WallCornerTopLeft.glyph());
    }
}
