//! Range growth racing an evaluation pass.
//!
//! A logger hook runs on the pass's start message, before the pass takes
//! the tile lock, and grows the range and claims cells in the new area.
//! The pass must evaluate those tiles against the grown range. This file
//! installs a global logger, so it holds a single test.
//!
//! Run with: cargo test evaluation_race

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{LevelFilter, Log, Metadata, Record};

use enclave::{Coord, Engine, EngineConfig, PlayerId, Range};

struct Game {
    engine: Engine,
    admin: PlayerId,
    a: PlayerId,
    b: PlayerId,
}

static GAME: OnceLock<Game> = OnceLock::new();

/// Grows the range and surrounds a new cell the first time a pass starts.
struct GrowOnStart {
    fired: AtomicBool,
}

impl Log for GrowOnStart {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if record.args().to_string() != "Starting evaluation" || self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(game) = GAME.get() else {
            return;
        };
        game.engine
            .expand_range(game.admin, Range::new(0, 5, 0, 5).unwrap())
            .unwrap();
        game.engine.place_tile(game.b, Coord::new(3, 1)).unwrap();
        for (x, y) in [(2, 1), (4, 1), (3, 0), (3, 2)] {
            game.engine.place_tile(game.a, Coord::new(x, y)).unwrap();
        }
    }

    fn flush(&self) {}
}

static HOOK: GrowOnStart = GrowOnStart {
    fired: AtomicBool::new(false),
};

#[test]
fn test_range_grown_before_lock_is_evaluated() {
    log::set_logger(&HOOK).unwrap();
    log::set_max_level(LevelFilter::Info);

    let config = EngineConfig {
        starting_points: 10,
        admin_names: vec!["ops".to_string()],
        ..EngineConfig::default()
    };
    let engine = Engine::new(config);
    let admin = engine.register_player("ops").unwrap().id;
    let a = engine.register_player("alice").unwrap().id;
    let b = engine.register_player("bob").unwrap().id;
    engine
        .expand_range(admin, Range::new(0, 3, 0, 3).unwrap())
        .unwrap();
    assert!(GAME.set(Game { engine, admin, a, b }).is_ok());
    let game = GAME.get().unwrap();

    let report = game.engine.run_evaluation(game.admin).unwrap();

    assert!(HOOK.fired.load(Ordering::SeqCst));
    assert_eq!(game.engine.current_range(), Some(Range::new(0, 5, 0, 5).unwrap()));
    assert_eq!(report.processed, 5);
    assert_eq!(report.captures.len(), 1);
    assert_eq!(report.captures[0].previous_owner, b);
    let center = game.engine.tiles().get(Coord::new(3, 1)).unwrap();
    assert_eq!(center.owner, a);
    assert!(center.resolved);
}
