//! # Placement
//!
//! Populates a freshly filled board with walls, the door, the player, NPCs
//! and key fragments.
//!
//! The algorithm:
//! 1. Scan the grid once, bucketing straight wall cells and interior floor
//!    cells into candidate pools
//! 2. Cut the door into a random wall cell, oriented by the wall it sits on
//! 3. Spawn the player, then NPCs, then keys. Each spawn draws random
//!    floor candidates and accepts the first whose 3x3 block holds no
//!    interactive object, giving up after a fixed number of attempts
//!
//! A failed spawn is reported and skipped; the level stays playable with
//! fewer objects.

use crate::game::{
    is_position_free_for_spawn, Board, ConcreteEntity, Door, DoorOrientation, Entity,
    EntityRegistry, KeyFragment, Player, Position, TileKind, Wall,
};
use crate::generation::{NpcRecord, RandomSource, SessionConfig};
use crate::{config, LockroomError, LockroomResult};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

/// Candidate cells gathered from one scan of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnCandidates {
    /// Straight wall segments; corners are never candidates
    pub wall_edge_cells: Vec<Position>,
    /// Interior floor cells not yet used by a spawn
    pub empty_cells: Vec<Position>,
}

/// What one level should contain.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    /// The player carried into this level
    pub player: Player,
    /// NPC records already chosen for this level
    pub npcs: Vec<NpcRecord>,
    /// Key fragments to scatter
    pub key_count: u32,
    /// Fragments granted by each key
    pub key_amount: u32,
}

/// Outcome of populating one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub door: Option<Position>,
    pub player: Option<Position>,
    pub npcs_placed: u32,
    pub npcs_failed: u32,
    pub keys_placed: u32,
    pub keys_failed: u32,
}

impl PlacementReport {
    /// True when every requested entity found a cell.
    pub fn is_complete(&self) -> bool {
        self.door.is_some()
            && self.player.is_some()
            && self.npcs_failed == 0
            && self.keys_failed == 0
    }
}

/// Constrained-random spawner.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    /// Maximum random draws per spawn before giving up
    pub max_spawn_attempts: u32,
}

impl PlacementEngine {
    /// Creates an engine with the default retry budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockroom::PlacementEngine;
    ///
    /// let engine = PlacementEngine::new();
    /// assert_eq!(engine.max_spawn_attempts, 50);
    /// ```
    pub fn new() -> Self {
        Self {
            max_spawn_attempts: config::MAX_SPAWN_ATTEMPTS,
        }
    }

    /// Creates an engine using the session's retry budget.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            max_spawn_attempts: config.max_spawn_attempts,
        }
    }

    /// Scans the board once and buckets wall edges and interior floor.
    pub fn collect_candidates(&self, board: &Board) -> SpawnCandidates {
        let mut candidates = SpawnCandidates::default();
        for (pos, kind) in board.cells() {
            match kind {
                TileKind::WallHorizontal | TileKind::WallVertical => {
                    candidates.wall_edge_cells.push(pos)
                }
                TileKind::Empty => candidates.empty_cells.push(pos),
                _ => {}
            }
        }
        candidates
    }

    /// Registers a [`Wall`] entity for every wall tile on the board.
    pub fn register_walls(&self, board: &Board, registry: &mut EntityRegistry) -> usize {
        let mut count = 0;
        for (pos, kind) in board.cells() {
            if kind.is_wall() {
                registry.insert(pos, Wall::new(pos, kind).into());
                count += 1;
            }
        }
        count
    }

    /// Cuts the door into a random straight wall cell and removes that cell
    /// from the pool.
    pub fn place_door(
        &self,
        board: &mut Board,
        registry: &mut EntityRegistry,
        candidates: &mut SpawnCandidates,
        rng: &mut dyn RandomSource,
    ) -> LockroomResult<Position> {
        if candidates.wall_edge_cells.is_empty() {
            error!(
                "No wall cell available for the door on a {}x{} board",
                board.width, board.height
            );
            return Err(LockroomError::PlacementFailed(
                "no wall edge cell for the door".to_string(),
            ));
        }

        let index = rng.int_in_range(0, candidates.wall_edge_cells.len());
        let position = candidates.wall_edge_cells.swap_remove(index);
        let orientation = if board.is_x_boundary(position) {
            DoorOrientation::Vertical
        } else {
            DoorOrientation::Horizontal
        };

        registry.insert(position, Door::new(position, orientation).into());
        board.set(position, TileKind::Door);
        debug!("Door placed at {} ({:?})", position, orientation);
        Ok(position)
    }

    /// Draws up to `max_spawn_attempts` random candidates and returns the
    /// index of the first whose 3x3 block is free of interactive objects.
    pub fn try_find_free_spawn_position(
        &self,
        board: &Board,
        empty_cells: &[Position],
        rng: &mut dyn RandomSource,
    ) -> Option<usize> {
        if empty_cells.is_empty() {
            return None;
        }

        for _ in 0..self.max_spawn_attempts {
            let index = rng.int_in_range(0, empty_cells.len());
            if is_position_free_for_spawn(board, empty_cells[index]) {
                return Some(index);
            }
        }
        None
    }

    /// Places one entity on a free floor cell. On failure nothing is
    /// registered and the board is untouched.
    pub fn spawn(
        &self,
        board: &mut Board,
        registry: &mut EntityRegistry,
        candidates: &mut SpawnCandidates,
        rng: &mut dyn RandomSource,
        entity: ConcreteEntity,
    ) -> LockroomResult<Position> {
        let label = entity.label();
        if candidates.empty_cells.is_empty() {
            warn!("No floor left to spawn {}", label);
            return Err(LockroomError::PlacementFailed(format!(
                "no floor left for {}",
                label
            )));
        }

        let index = self
            .try_find_free_spawn_position(board, &candidates.empty_cells, rng)
            .ok_or_else(|| {
                warn!(
                    "Gave up spawning {} after {} attempts",
                    label, self.max_spawn_attempts
                );
                LockroomError::PlacementFailed(format!(
                    "no free cell for {} after {} attempts",
                    label, self.max_spawn_attempts
                ))
            })?;

        let position = candidates.empty_cells.swap_remove(index);
        board.set(position, entity.tile_kind());
        registry.insert(position, entity);
        Ok(position)
    }

    /// Populates a whole level. Individual failures are recorded in the
    /// report and never abort the rest of the placement.
    pub fn populate(
        &self,
        board: &mut Board,
        registry: &mut EntityRegistry,
        request: PlacementRequest,
        rng: &mut dyn RandomSource,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();
        let mut candidates = self.collect_candidates(board);

        self.register_walls(board, registry);
        report.door = self
            .place_door(board, registry, &mut candidates, rng)
            .ok();

        report.player = self
            .spawn(board, registry, &mut candidates, rng, request.player.into())
            .ok();
        if report.player.is_none() {
            error!("Player could not be placed");
        }

        for record in &request.npcs {
            let npc = record.to_npc(Position::new(0, 0));
            match self.spawn(board, registry, &mut candidates, rng, npc.into()) {
                Ok(_) => report.npcs_placed += 1,
                Err(_) => report.npcs_failed += 1,
            }
        }

        for _ in 0..request.key_count {
            let key = KeyFragment::new(Position::new(0, 0), request.key_amount);
            match self.spawn(board, registry, &mut candidates, rng, key.into()) {
                Ok(_) => report.keys_placed += 1,
                Err(_) => report.keys_failed += 1,
            }
        }

        if report.is_complete() {
            debug!(
                "Placed door, player, {} NPCs and {} keys",
                report.npcs_placed, report.keys_placed
            );
        } else {
            warn!("Level populated with gaps: {:?}", report);
        }
        report
    }
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}
