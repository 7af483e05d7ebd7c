#![no_main]

use arbitrary::Arbitrary;
use enclave::{Coord, Engine, EngineConfig, GameError, Range, Role};
use libfuzzer_sys::fuzz_target;

/// One step of a fuzzed game.
#[derive(Arbitrary, Debug)]
enum Step {
    /// Player index and raw coordinates.
    Place { player: u8, x: i8, y: i8 },
    /// Grow each bound outward by the given amounts.
    Grow { left: u8, right: u8, down: u8, up: u8 },
    /// Run an evaluation pass.
    Evaluate,
}

/// Structured input for game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    /// Initial range side lengths.
    width: u8,
    height: u8,
    /// Players besides the admin.
    players: u8,
    steps: Vec<Step>,
}

fuzz_target!(|input: GameInput| {
    let config = EngineConfig {
        starting_points: 64,
        ..EngineConfig::default()
    };
    let engine = Engine::new(config);
    let Ok(admin) = engine.register_player_with_role("ops", Role::Admin) else {
        return;
    };
    let width = i32::from(input.width % 32);
    let height = i32::from(input.height % 32);
    let Ok(range) = Range::new(0, width, 0, height) else {
        return;
    };
    if engine.expand_range(admin.id, range).is_err() {
        return;
    }
    let ids: Vec<_> = (0..=input.players % 6)
        .filter_map(|i| engine.register_player(&format!("p{i}")).ok())
        .map(|p| p.id)
        .collect();

    for step in input.steps.into_iter().take(256) {
        match step {
            Step::Place { player, x, y } => {
                let id = ids[usize::from(player) % ids.len()];
                let coord = Coord::new(i32::from(x), i32::from(y));
                let before = engine.player(id).map(|p| p.points).unwrap_or(0);
                match engine.place_tile(id, coord) {
                    Ok(tile) => assert_eq!(tile.coord, coord),
                    Err(GameError::OutOfBounds { .. } | GameError::TileOccupied(_) | GameError::InsufficientPoints(_)) => {
                        assert_eq!(engine.player(id).map(|p| p.points).unwrap_or(0), before);
                    }
                    Err(e) => panic!("unexpected placement error: {e}"),
                }
            }
            Step::Grow { left, right, down, up } => {
                let Some(current) = engine.current_range() else {
                    continue;
                };
                if let Ok(next) = Range::new(
                    current.min_x - i32::from(left % 8),
                    current.max_x + i32::from(right % 8),
                    current.min_y - i32::from(down % 8),
                    current.max_y + i32::from(up % 8),
                ) {
                    let _ = engine.expand_range(admin.id, next);
                }
            }
            Step::Evaluate => {
                engine.run_evaluation(admin.id).unwrap();
                let again = engine.run_evaluation(admin.id).unwrap();
                assert_eq!(again.processed, 0);
            }
        }

        let total: u64 = engine.standings().iter().map(|s| s.tiles).sum();
        assert_eq!(total, engine.tiles().len() as u64);
    }
});
