//! # Interaction
//!
//! Resolves the player acting on a neighbouring cell: picking up keys,
//! answering NPC quizzes and unlocking the door.
//!
//! NPC encounters move `Dormant -> Active -> Dormant`. The quiz is a
//! suspension point: [`interact`] returns [`InteractionOutcome::QuizStarted`]
//! and the caller feeds the player's choice back through [`answer_quiz`].
//! Nothing here blocks on input.

use crate::config;
use crate::game::{
    Board, EntityRegistry, Inventory, LevelState, LevelTransition, Position, TileKind,
};
use crate::generation::{utils, RandomSource};
use crate::{LockroomError, LockroomResult};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

/// A quiz waiting for the player's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuiz {
    pub npc_position: Position,
    pub npc_name: String,
    pub question: String,
    /// Options in on-screen order; the player answers with 1-based indices
    pub options: Vec<String>,
}

/// Result of acting on a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// A key fragment was picked up
    KeyCollected { amount: u32, total: u32 },
    /// An NPC is waiting for an answer
    QuizStarted(PendingQuiz),
    /// The NPC was already spoken to and will not talk again
    NpcSilent { name: String },
    /// Not enough key fragments for the door
    DoorLocked { have: u32, required: u32 },
    /// The door opened and the level has been torn down
    DoorOpened(LevelTransition),
    /// Nothing to interact with
    Nothing(TileKind),
}

/// Result of answering a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Correct { points: u32, keys: u32 },
    Incorrect { lives_left: u32, correct_answer: String },
}

/// Acts on `target`, dispatching on its tile kind.
///
/// Missing collaborators (no board, or no entity behind an NPC, key or door
/// tile) are reported as [`LockroomError::InvalidState`] and leave every
/// structure untouched.
pub fn interact(
    board: &mut Option<Board>,
    registry: &mut EntityRegistry,
    inventory: &mut Inventory,
    level: &mut LevelState,
    rng: &mut dyn RandomSource,
    target: Position,
) -> LockroomResult<InteractionOutcome> {
    let kind = match board.as_ref() {
        Some(grid) => grid.get(target),
        None => {
            error!("Interaction at {} without a board", target);
            return Err(LockroomError::InvalidState(
                "no board for interaction".to_string(),
            ));
        }
    };

    match kind {
        TileKind::Key => collect_key(board, registry, inventory, target),
        TileKind::Npc => start_quiz(registry, rng, target),
        TileKind::Door => try_open_door(board, registry, inventory, level, target),
        other => {
            debug!("Nothing to interact with at {} ({:?})", target, other);
            Ok(InteractionOutcome::Nothing(other))
        }
    }
}

fn collect_key(
    board: &mut Option<Board>,
    registry: &mut EntityRegistry,
    inventory: &mut Inventory,
    target: Position,
) -> LockroomResult<InteractionOutcome> {
    let amount = registry.key_at(target).map(|key| key.amount).ok_or_else(|| {
        error!("Key tile at {} has no key fragment registered", target);
        LockroomError::InvalidState(format!("no key fragment at {}", target))
    })?;

    registry.remove(target);
    let total = inventory.credit_keys(amount);
    if let Some(grid) = board.as_mut() {
        grid.set(target, TileKind::Empty);
    }

    debug!("Collected {} key fragment(s) at {}", amount, target);
    Ok(InteractionOutcome::KeyCollected { amount, total })
}

fn start_quiz(
    registry: &mut EntityRegistry,
    rng: &mut dyn RandomSource,
    target: Position,
) -> LockroomResult<InteractionOutcome> {
    let npc = registry.npc_at_mut(target).ok_or_else(|| {
        error!("NPC tile at {} has no NPC registered", target);
        LockroomError::InvalidState(format!("no NPC at {}", target))
    })?;

    if npc.has_interacted {
        return Ok(InteractionOutcome::NpcSilent {
            name: npc.name.clone(),
        });
    }

    let mut distractors = npc.distractors().to_vec();
    utils::shuffle(rng, &mut distractors);
    distractors.truncate(config::QUIZ_OPTION_COUNT - 1);

    let mut options = vec![npc.correct_answer.clone()];
    options.extend(distractors);
    utils::shuffle(rng, &mut options);

    npc.is_active = true;
    debug!("{} starts a quiz", npc.name);

    Ok(InteractionOutcome::QuizStarted(PendingQuiz {
        npc_position: target,
        npc_name: npc.name.clone(),
        question: npc.question.clone(),
        options,
    }))
}

fn try_open_door(
    board: &mut Option<Board>,
    registry: &mut EntityRegistry,
    inventory: &mut Inventory,
    level: &mut LevelState,
    target: Position,
) -> LockroomResult<InteractionOutcome> {
    let door = registry.door_at_mut(target).ok_or_else(|| {
        error!("Door tile at {} has no door registered", target);
        LockroomError::InvalidState(format!("no door at {}", target))
    })?;

    if inventory.key_fragments < level.required_keys {
        debug!(
            "Door needs {} keys, player has {}",
            level.required_keys, inventory.key_fragments
        );
        return Ok(InteractionOutcome::DoorLocked {
            have: inventory.key_fragments,
            required: level.required_keys,
        });
    }

    door.open();
    info!("Door opened at {}", target);
    let transition = level.advance_level(inventory, registry, board)?;
    Ok(InteractionOutcome::DoorOpened(transition))
}

/// Resolves a pending quiz with the player's 1-based `choice`.
///
/// An out-of-range choice is an [`LockroomError::InvalidAction`] and leaves
/// the quiz pending so the caller can prompt again. Either answer latches
/// the NPC's `has_interacted` flag; a wrong one costs exactly one life.
pub fn answer_quiz(
    registry: &mut EntityRegistry,
    inventory: &mut Inventory,
    quiz: &PendingQuiz,
    choice: usize,
) -> LockroomResult<QuizOutcome> {
    if choice == 0 || choice > quiz.options.len() {
        return Err(LockroomError::InvalidAction(format!(
            "choose an answer between 1 and {}",
            quiz.options.len()
        )));
    }

    if registry.player().is_none() {
        error!("Quiz answered with no player on the board");
        return Err(LockroomError::InvalidState("no player registered".to_string()));
    }

    let npc = registry.npc_at_mut(quiz.npc_position).ok_or_else(|| {
        error!("Quiz NPC {} vanished from {}", quiz.npc_name, quiz.npc_position);
        LockroomError::InvalidState(format!("no NPC at {}", quiz.npc_position))
    })?;

    if npc.has_interacted {
        return Err(LockroomError::InvalidAction(format!(
            "{} has already been answered",
            npc.name
        )));
    }

    let correct = npc.is_correct(&quiz.options[choice - 1]);
    let (reward_keys, reward_points) = (npc.reward_keys, npc.reward_points);
    let correct_answer = npc.correct_answer.clone();
    npc.has_interacted = true;
    npc.is_active = false;

    if correct {
        inventory.credit_score(reward_points);
        inventory.credit_keys(reward_keys);
        debug!("{} answered correctly", quiz.npc_name);
        return Ok(QuizOutcome::Correct {
            points: reward_points,
            keys: reward_keys,
        });
    }

    let lives_left = registry
        .player_mut()
        .map(|player| player.lose_life())
        .unwrap_or_default();
    debug!("{} answered wrongly, {} lives left", quiz.npc_name, lives_left);
    Ok(QuizOutcome::Incorrect {
        lives_left,
        correct_answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Door, DoorOrientation, KeyFragment, Npc, Player};
    use crate::generation::{SeededRandom, SessionConfig};

    struct Fixture {
        board: Option<Board>,
        registry: EntityRegistry,
        inventory: Inventory,
        level: LevelState,
        rng: SeededRandom,
    }

    const PLAYER: Position = Position { x: 5, y: 5 };
    const NPC: Position = Position { x: 8, y: 5 };
    const KEY: Position = Position { x: 3, y: 3 };
    const DOOR: Position = Position { x: 0, y: 5 };

    impl Fixture {
        fn new() -> Self {
            let config = SessionConfig::new(7);
            let mut rng = SeededRandom::new(7);
            let level = LevelState::new(&config, &mut rng);
            let mut board = Board::new(45, 15).unwrap();
            let mut registry = EntityRegistry::new();

            registry.insert(PLAYER, Player::new("Hero".to_string(), PLAYER).into());
            board.set(PLAYER, TileKind::Player);

            let npc = Npc::new(
                "Sphinx".to_string(),
                NPC,
                "Best number?".to_string(),
                "42".to_string(),
                vec!["7".to_string(), "13".to_string(), "99".to_string()],
                2,
                30,
            );
            registry.insert(NPC, npc.into());
            board.set(NPC, TileKind::Npc);

            registry.insert(KEY, KeyFragment::new(KEY, 5).into());
            board.set(KEY, TileKind::Key);

            registry.insert(DOOR, Door::new(DOOR, DoorOrientation::Vertical).into());
            board.set(DOOR, TileKind::Door);

            Self {
                board: Some(board),
                registry,
                inventory: Inventory::default(),
                level,
                rng,
            }
        }

        fn interact(&mut self, target: Position) -> LockroomResult<InteractionOutcome> {
            interact(
                &mut self.board,
                &mut self.registry,
                &mut self.inventory,
                &mut self.level,
                &mut self.rng,
                target,
            )
        }

        fn start_quiz(&mut self) -> PendingQuiz {
            match self.interact(NPC).unwrap() {
                InteractionOutcome::QuizStarted(quiz) => quiz,
                other => panic!("expected a quiz, got {:?}", other),
            }
        }

        fn lives(&self) -> u32 {
            self.registry.player().unwrap().lives
        }
    }

    fn choice_for(quiz: &PendingQuiz, correct: bool) -> usize {
        quiz.options
            .iter()
            .position(|option| (option == "42") == correct)
            .unwrap()
            + 1
    }

    #[test]
    fn test_key_pickup() {
        let mut fx = Fixture::new();

        let outcome = fx.interact(KEY).unwrap();
        assert_eq!(outcome, InteractionOutcome::KeyCollected { amount: 5, total: 5 });
        assert_eq!(fx.inventory, Inventory { key_fragments: 5, score: 0 });
        assert!(fx.registry.get(KEY).is_none());
        assert_eq!(fx.board.as_ref().unwrap().get(KEY), TileKind::Empty);

        // The key is gone; a second try finds nothing.
        assert_eq!(fx.interact(KEY).unwrap(), InteractionOutcome::Nothing(TileKind::Empty));
        assert_eq!(fx.inventory.key_fragments, 5);
    }

    #[test]
    fn test_key_tile_without_entity_is_hard_error() {
        let mut fx = Fixture::new();
        fx.registry.remove(KEY);

        let result = fx.interact(KEY);
        assert!(matches!(result, Err(LockroomError::InvalidState(_))));
        assert_eq!(fx.inventory.key_fragments, 0);
        assert_eq!(fx.board.as_ref().unwrap().get(KEY), TileKind::Key);
    }

    #[test]
    fn test_quiz_options_and_activation() {
        let mut fx = Fixture::new();
        let quiz = fx.start_quiz();

        assert_eq!(quiz.npc_name, "Sphinx");
        assert_eq!(quiz.options.len(), 3);
        assert_eq!(quiz.options.iter().filter(|o| *o == "42").count(), 1);
        assert!(fx.registry.npc_at(NPC).unwrap().is_active);
    }

    #[test]
    fn test_correct_answer_rewards() {
        let mut fx = Fixture::new();
        let quiz = fx.start_quiz();

        let outcome = answer_quiz(
            &mut fx.registry,
            &mut fx.inventory,
            &quiz,
            choice_for(&quiz, true),
        )
        .unwrap();

        assert_eq!(outcome, QuizOutcome::Correct { points: 30, keys: 2 });
        assert_eq!(fx.inventory, Inventory { key_fragments: 2, score: 30 });
        assert_eq!(fx.lives(), 3);
        let npc = fx.registry.npc_at(NPC).unwrap();
        assert!(npc.has_interacted);
        assert!(!npc.is_active);
    }

    #[test]
    fn test_wrong_answer_costs_one_life() {
        let mut fx = Fixture::new();
        let quiz = fx.start_quiz();

        let outcome = answer_quiz(
            &mut fx.registry,
            &mut fx.inventory,
            &quiz,
            choice_for(&quiz, false),
        )
        .unwrap();

        assert_eq!(
            outcome,
            QuizOutcome::Incorrect {
                lives_left: 2,
                correct_answer: "42".to_string()
            }
        );
        assert_eq!(fx.inventory, Inventory::default());
        assert_eq!(fx.lives(), 2);
        let npc = fx.registry.npc_at(NPC).unwrap();
        assert!(npc.has_interacted);
        assert!(!npc.is_active);
    }

    #[test]
    fn test_npc_talks_only_once() {
        for correct in [true, false] {
            let mut fx = Fixture::new();
            let quiz = fx.start_quiz();
            answer_quiz(
                &mut fx.registry,
                &mut fx.inventory,
                &quiz,
                choice_for(&quiz, correct),
            )
            .unwrap();

            let inventory = fx.inventory;
            let lives = fx.lives();

            for _ in 0..3 {
                let outcome = fx.interact(NPC).unwrap();
                assert_eq!(
                    outcome,
                    InteractionOutcome::NpcSilent {
                        name: "Sphinx".to_string()
                    }
                );
            }
            // Replaying the stale quiz is refused as well.
            assert!(answer_quiz(&mut fx.registry, &mut fx.inventory, &quiz, 1).is_err());

            assert_eq!(fx.inventory, inventory);
            assert_eq!(fx.lives(), lives);
            assert!(!fx.registry.npc_at(NPC).unwrap().is_active);
        }
    }

    #[test]
    fn test_huge_rewards_saturate() {
        let mut fx = Fixture::new();
        let second = Position::new(8, 9);
        for position in [NPC, second] {
            let npc = Npc::new(
                "Miser".to_string(),
                position,
                "Best number?".to_string(),
                "42".to_string(),
                vec!["7".to_string()],
                u32::MAX,
                u32::MAX,
            );
            fx.registry.insert(position, npc.into());
            fx.board.as_mut().unwrap().set(position, TileKind::Npc);
        }

        for position in [NPC, second] {
            let quiz = match fx.interact(position).unwrap() {
                InteractionOutcome::QuizStarted(quiz) => quiz,
                other => panic!("expected a quiz, got {:?}", other),
            };
            let choice = choice_for(&quiz, true);
            answer_quiz(&mut fx.registry, &mut fx.inventory, &quiz, choice).unwrap();
        }

        assert_eq!(fx.inventory.score, u32::MAX);
        assert_eq!(fx.inventory.key_fragments, u32::MAX);

        fx.interact(KEY).unwrap();
        assert_eq!(fx.inventory.key_fragments, u32::MAX);
    }

    #[test]
    fn test_out_of_range_choice_keeps_quiz_pending() {
        let mut fx = Fixture::new();
        let quiz = fx.start_quiz();

        for choice in [0, 4, 9] {
            let result = answer_quiz(&mut fx.registry, &mut fx.inventory, &quiz, choice);
            assert!(matches!(result, Err(LockroomError::InvalidAction(_))));
        }
        let npc = fx.registry.npc_at(NPC).unwrap();
        assert!(npc.is_active);
        assert!(!npc.has_interacted);
        assert_eq!(fx.lives(), 3);
    }

    #[test]
    fn test_door_gating() {
        let mut fx = Fixture::new();
        fx.inventory.key_fragments = 4;
        let level_before = fx.level.clone();

        let outcome = fx.interact(DOOR).unwrap();
        assert_eq!(outcome, InteractionOutcome::DoorLocked { have: 4, required: 5 });
        assert_eq!(fx.inventory.key_fragments, 4);
        assert_eq!(fx.level, level_before);
        assert!(!fx.registry.door().unwrap().is_open);

        // Re-attempting is always possible.
        assert!(matches!(
            fx.interact(DOOR).unwrap(),
            InteractionOutcome::DoorLocked { .. }
        ));
    }

    #[test]
    fn test_door_opens_and_transitions() {
        let mut fx = Fixture::new();
        fx.inventory.key_fragments = 5;

        let outcome = fx.interact(DOOR).unwrap();
        let transition = match outcome {
            InteractionOutcome::DoorOpened(transition) => transition,
            other => panic!("expected the door to open, got {:?}", other),
        };

        assert_eq!(transition.from_level, 1);
        assert_eq!(transition.to_level, 2);
        assert_eq!(transition.carried_player.unwrap().name, "Hero");
        assert_eq!(fx.inventory.key_fragments, 0);
        assert_eq!(fx.level.required_keys, 8);
        assert_eq!(fx.level.current_level, 2);
        assert!(fx.level.is_transition_pending());
        assert!(fx.registry.is_empty());
        assert!(fx.board.is_none());
    }

    #[test]
    fn test_missing_board_is_hard_error() {
        let mut fx = Fixture::new();
        fx.board = None;

        assert!(matches!(
            fx.interact(KEY),
            Err(LockroomError::InvalidState(_))
        ));
        assert_eq!(fx.registry.keys().count(), 1);
    }

    #[test]
    fn test_walls_and_floor_are_no_ops() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.interact(Position::new(10, 0)).unwrap(),
            InteractionOutcome::Nothing(TileKind::WallHorizontal)
        );
        assert_eq!(
            fx.interact(Position::new(10, 10)).unwrap(),
            InteractionOutcome::Nothing(TileKind::Empty)
        );
        assert_eq!(
            fx.interact(PLAYER).unwrap(),
            InteractionOutcome::Nothing(TileKind::Player)
        );
    }
}
