//! # Entity Registry
//!
//! Maps a board position to at most one live entity. This is the single
//! source of truth for "what occupies this cell".

use crate::game::{ConcreteEntity, Door, Entity, KeyFragment, Npc, Player, Position};
use crate::{LockroomError, LockroomResult};
use std::collections::HashMap;

/// Position-keyed store of every entity on the current level.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<Position, ConcreteEntity>,
    player_position: Option<Position>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity at `position`, moving the entity there first.
    ///
    /// Returns whatever was previously registered at that cell.
    pub fn insert(
        &mut self,
        position: Position,
        mut entity: ConcreteEntity,
    ) -> Option<ConcreteEntity> {
        entity.set_position(position);
        let is_player = matches!(entity, ConcreteEntity::Player(_));
        if is_player {
            if let Some(old) = self.player_position.take() {
                if old != position {
                    self.entities.remove(&old);
                }
            }
            self.player_position = Some(position);
        }

        let previous = self.entities.insert(position, entity);
        if !is_player && matches!(previous, Some(ConcreteEntity::Player(_))) {
            self.player_position = None;
        }
        previous
    }

    /// Gets the entity at a position.
    pub fn get(&self, position: Position) -> Option<&ConcreteEntity> {
        self.entities.get(&position)
    }

    /// Removes and returns the entity at a position.
    pub fn remove(&mut self, position: Position) -> Option<ConcreteEntity> {
        let removed = self.entities.remove(&position);
        if matches!(removed, Some(ConcreteEntity::Player(_))) {
            self.player_position = None;
        }
        removed
    }

    /// Moves the entity at `from` to the free cell `to`.
    pub fn move_entity(&mut self, from: Position, to: Position) -> LockroomResult<()> {
        if self.entities.contains_key(&to) {
            return Err(LockroomError::InvalidAction(format!(
                "Cannot move onto occupied cell {}",
                to
            )));
        }

        let mut entity = self.entities.remove(&from).ok_or_else(|| {
            LockroomError::InvalidState(format!("No entity at {} to move", from))
        })?;

        entity.set_position(to);
        if matches!(entity, ConcreteEntity::Player(_)) {
            self.player_position = Some(to);
        }
        self.entities.insert(to, entity);
        Ok(())
    }

    /// Position of the player, if one is registered.
    pub fn player_position(&self) -> Option<Position> {
        self.player_position
    }

    /// Gets the player if one is registered.
    pub fn player(&self) -> Option<&Player> {
        match self.entities.get(&self.player_position?) {
            Some(ConcreteEntity::Player(player)) => Some(player),
            _ => None,
        }
    }

    /// Gets the player mutably if one is registered.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match self.entities.get_mut(&self.player_position?) {
            Some(ConcreteEntity::Player(player)) => Some(player),
            _ => None,
        }
    }

    /// Removes the player from the board so it can be carried to the next
    /// level.
    pub fn take_player(&mut self) -> Option<Player> {
        let position = self.player_position.take()?;
        match self.entities.remove(&position) {
            Some(ConcreteEntity::Player(player)) => Some(player),
            Some(other) => {
                self.entities.insert(position, other);
                None
            }
            None => None,
        }
    }

    /// Gets the NPC at a position.
    pub fn npc_at(&self, position: Position) -> Option<&Npc> {
        match self.entities.get(&position) {
            Some(ConcreteEntity::Npc(npc)) => Some(npc),
            _ => None,
        }
    }

    /// Gets the NPC at a position mutably.
    pub fn npc_at_mut(&mut self, position: Position) -> Option<&mut Npc> {
        match self.entities.get_mut(&position) {
            Some(ConcreteEntity::Npc(npc)) => Some(npc),
            _ => None,
        }
    }

    /// Gets the key fragment at a position.
    pub fn key_at(&self, position: Position) -> Option<&KeyFragment> {
        match self.entities.get(&position) {
            Some(ConcreteEntity::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Gets the door at a position mutably.
    pub fn door_at_mut(&mut self, position: Position) -> Option<&mut Door> {
        match self.entities.get_mut(&position) {
            Some(ConcreteEntity::Door(door)) => Some(door),
            _ => None,
        }
    }

    /// The door of the current level, if it was placed.
    pub fn door(&self) -> Option<&Door> {
        self.entities.values().find_map(|entity| match entity {
            ConcreteEntity::Door(door) => Some(door),
            _ => None,
        })
    }

    /// Every NPC on the level.
    pub fn npcs(&self) -> impl Iterator<Item = &Npc> + '_ {
        self.entities.values().filter_map(|entity| match entity {
            ConcreteEntity::Npc(npc) => Some(npc),
            _ => None,
        })
    }

    /// Every key fragment still on the level.
    pub fn keys(&self) -> impl Iterator<Item = &KeyFragment> + '_ {
        self.entities.values().filter_map(|entity| match entity {
            ConcreteEntity::Key(key) => Some(key),
            _ => None,
        })
    }

    /// Positions of doors, players, NPCs and keys.
    pub fn interactive_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.is_interactive())
            .map(|(position, _)| *position)
            .collect();
        positions.sort();
        positions
    }

    /// Iterates every `(position, entity)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&Position, &ConcreteEntity)> + '_ {
        self.entities.iter()
    }

    /// Removes every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.player_position = None;
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
