// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Enclave: a grid territory-capture engine.
//!
//! Players claim cells on a shared rectangular grid, spending one point
//! per claim. An administrator periodically runs an evaluation pass that
//! finds regions fully walled in by occupied cells and hands them to the
//! player whose claim closed the ring.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Engine (authorization, external surface)   │
//! ├──────────────┬──────────────┬───────────────┤
//! │ Occupation   │ Evaluation   │ Standings     │
//! ├──────────────┴──────────────┴───────────────┤
//! │  RangeManager · TileStore · PlayerRoster    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Mutations notify a [`cache::CacheInvalidator`] after they commit.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod grid;
pub mod occupation;
pub mod range;
pub mod roster;
pub mod snapshot;
pub mod standings;
pub mod tiles;

pub use error::{GameError, GameResult};

// Re-export key types at crate root for convenience
pub use config::EngineConfig;
pub use engine::{Engine, Profile};
pub use evaluation::{Capture, EvaluationReport};
pub use grid::{Coord, OwnershipGrid, Player, PlayerId, Range, RangeRecord, Role, Tile};
pub use standings::Standing;
