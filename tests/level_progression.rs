//! Door opening and the rebuild of the next level.

use lockroom::{
    BuiltinNpcs, Command, Direction, Entity, GameEvent, GameState, LockroomResult,
    NpcDataSource, Position, SessionConfig, TileKind,
};

fn new_game(seed: u64) -> LockroomResult<GameState> {
    let npcs = BuiltinNpcs.load_all()?;
    let mut game_state = GameState::new(SessionConfig::new(seed), npcs);
    game_state.start()?;
    Ok(game_state)
}

/// Moves the player onto the interior cell next to the door, facing it.
fn stand_at_door(game_state: &mut GameState) -> Direction {
    let board = game_state.board.as_mut().expect("board");
    let door = game_state.registry.door().expect("door").position();

    let (inside, facing) = if door.x == 0 {
        (Position::new(1, door.y), Direction::Left)
    } else if door.x == board.width as i32 - 1 {
        (Position::new(door.x - 1, door.y), Direction::Right)
    } else if door.y == 0 {
        (Position::new(door.x, 1), Direction::Up)
    } else {
        (Position::new(door.x, door.y - 1), Direction::Down)
    };

    if let Some(occupant) = game_state.registry.remove(inside) {
        board.set(occupant.position(), TileKind::Empty);
    }
    let mut player = game_state.registry.take_player().expect("player");
    board.set(player.position, TileKind::Empty);
    player.facing = facing;
    board.set(inside, TileKind::Player);
    game_state.registry.insert(inside, player.into());
    facing
}

#[test]
fn test_locked_door_reports_shortfall() -> LockroomResult<()> {
    let mut game_state = new_game(3)?;
    stand_at_door(&mut game_state);
    game_state.inventory.key_fragments = 2;

    let events = game_state.handle_command(Command::Interact)?;
    assert_eq!(events, vec![GameEvent::DoorLocked { have: 2, required: 5 }]);
    assert_eq!(game_state.level.current_level, 1);
    assert!(game_state.board.is_some());
    Ok(())
}

#[test]
fn test_three_levels_in_a_row() -> LockroomResult<()> {
    let mut game_state = new_game(11)?;
    let lives = game_state.registry.player().expect("player").lives;
    let mut expected_width = 45;
    let mut expected_keys = 5;

    for level in 1..=3u32 {
        assert_eq!(game_state.level.current_level, level);
        assert_eq!(game_state.level.required_keys, expected_keys);
        assert_eq!(game_state.board.as_ref().expect("board").width, expected_width);

        stand_at_door(&mut game_state);
        game_state.inventory.key_fragments = expected_keys;
        let events = game_state.handle_command(Command::Interact)?;
        assert_eq!(
            events,
            vec![GameEvent::DoorOpened {
                from_level: level,
                to_level: level + 1
            }]
        );
        assert!(game_state.board.is_none());
        assert_eq!(game_state.inventory.key_fragments, 0);

        let events = game_state.rebuild_if_pending()?;
        assert!(matches!(events[0], GameEvent::LevelStarted { .. }));

        expected_width += 5;
        expected_keys += 3;
    }

    assert_eq!(game_state.registry.player().expect("player").lives, lives);
    assert_eq!(game_state.statistics.doors_opened, 3);
    assert_eq!(game_state.statistics.max_level_reached, 4);
    Ok(())
}

#[test]
fn test_height_is_fixed_across_levels() -> LockroomResult<()> {
    let mut game_state = new_game(21)?;
    let height = game_state.board.as_ref().expect("board").height;
    assert!((15..=17).contains(&height));

    stand_at_door(&mut game_state);
    game_state.inventory.key_fragments = 5;
    game_state.handle_command(Command::Interact)?;
    game_state.rebuild_if_pending()?;

    assert_eq!(game_state.board.as_ref().expect("board").height, height);
    Ok(())
}
