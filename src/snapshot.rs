//! Saving and loading engine state.
//!
//! The whole state (players, range history and tiles in insertion order)
//! is written as one versioned JSON document. Loading validates the same
//! invariants the engine maintains while running: unique ids and names,
//! an expansion-only range history, one tile per coordinate and tile
//! owners that exist.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::CacheInvalidator;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::GameError;
use crate::grid::{Player, RangeRecord, Tile};
use crate::roster::PlayerRoster;
use crate::tiles::TileTable;

/// Current format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Format version.
    pub version: u32,
    /// All players, ordered by id.
    pub players: Vec<Player>,
    /// Range history, oldest first.
    pub ranges: Vec<RangeRecord>,
    /// Tiles in insertion order.
    pub tiles: Vec<Tile>,
}

/// Error type for snapshot operations.
#[derive(Debug)]
pub enum SnapshotError {
    /// Reading or writing the file failed.
    Io(io::Error),
    /// The document is not valid JSON for a snapshot.
    Json(serde_json::Error),
    /// The document was written by an incompatible version.
    UnsupportedVersion(u32),
    /// The document violates an engine invariant.
    Inconsistent(GameError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Snapshot I/O failed: {e}"),
            Self::Json(e) => write!(f, "Snapshot is malformed: {e}"),
            Self::UnsupportedVersion(v) => write!(f, "Unsupported snapshot version: {v}"),
            Self::Inconsistent(e) => write!(f, "Snapshot is inconsistent: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<GameError> for SnapshotError {
    fn from(e: GameError) -> Self {
        Self::Inconsistent(e)
    }
}

impl StateSnapshot {
    /// Copy the state out of a running engine.
    #[must_use]
    pub fn capture(engine: &Engine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            players: engine.players(),
            ranges: engine.ranges().history(),
            tiles: engine.tiles().list_all(),
        }
    }

    /// Write the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed or has
    /// an unsupported version.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    /// Validate the snapshot and build an engine from it.
    ///
    /// # Errors
    ///
    /// Returns `Inconsistent` if the snapshot violates an engine invariant.
    pub fn restore(
        self,
        config: EngineConfig,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Result<Engine, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }

        for pair in self.ranges.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.id <= previous.id {
                return Err(GameError::InvalidInput(format!(
                    "range ids out of order: {} after {}",
                    next.id, previous.id
                ))
                .into());
            }
            if !next.range.covers(&previous.range) {
                return Err(GameError::RangeShrinkDisallowed {
                    current: previous.range,
                    requested: next.range,
                }
                .into());
            }
        }

        let roster = PlayerRoster::from_players(self.players)?;

        let mut table = TileTable::new();
        for tile in self.tiles {
            roster.get(tile.owner)?;
            table.insert_tile(tile)?;
        }

        Ok(Engine::from_parts(config, roster, self.ranges, table, cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoopInvalidator;
    use crate::grid::{Coord, Range};

    fn sample_engine() -> Engine {
        let config = EngineConfig {
            starting_points: 3,
            admin_names: vec!["root".to_string()],
            ..EngineConfig::default()
        };
        let engine = Engine::new(config);
        let root = engine.register_player("root").unwrap().id;
        let ada = engine.register_player("ada").unwrap().id;
        engine.expand_range(root, Range::new(0, 2, 0, 2).unwrap()).unwrap();
        engine.expand_range(root, Range::new(0, 3, 0, 3).unwrap()).unwrap();
        engine.place_tile(ada, Coord::new(1, 1)).unwrap();
        engine.place_tile(ada, Coord::new(2, 2)).unwrap();
        engine.run_evaluation(root).unwrap();
        engine.place_tile(ada, Coord::new(0, 0)).unwrap();
        engine
    }

    #[test]
    fn test_save_load_restore() {
        let engine = sample_engine();
        let snapshot = StateSnapshot::capture(&engine);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        snapshot.save(&path).unwrap();
        let loaded = StateSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);

        let restored = loaded
            .restore(engine.config().clone(), Arc::new(NoopInvalidator))
            .unwrap();
        assert_eq!(restored.players(), engine.players());
        assert_eq!(restored.tiles().list_all(), engine.tiles().list_all());
        assert_eq!(restored.current_range(), engine.current_range());

        // Ids continue after the restored players.
        assert_eq!(restored.register_player("bob").unwrap().id, 3);
    }

    #[test]
    fn test_restore_rejects_shrinking_history() {
        let mut snapshot = StateSnapshot::capture(&sample_engine());
        snapshot.ranges.swap(0, 1);
        snapshot.ranges[0].id = 1;
        snapshot.ranges[1].id = 2;
        let result = snapshot.restore(EngineConfig::default(), Arc::new(NoopInvalidator));
        assert!(matches!(
            result,
            Err(SnapshotError::Inconsistent(GameError::RangeShrinkDisallowed { .. }))
        ));
    }

    #[test]
    fn test_restore_rejects_duplicate_tiles() {
        let mut snapshot = StateSnapshot::capture(&sample_engine());
        let duplicate = snapshot.tiles[0].clone();
        snapshot.tiles.push(duplicate);
        let result = snapshot.restore(EngineConfig::default(), Arc::new(NoopInvalidator));
        assert!(matches!(
            result,
            Err(SnapshotError::Inconsistent(GameError::TileOccupied(_)))
        ));
    }

    #[test]
    fn test_restore_rejects_unknown_owner() {
        let mut snapshot = StateSnapshot::capture(&sample_engine());
        snapshot.tiles[0].owner = 42;
        let result = snapshot.restore(EngineConfig::default(), Arc::new(NoopInvalidator));
        assert!(matches!(
            result,
            Err(SnapshotError::Inconsistent(GameError::UnknownPlayer(42)))
        ));
    }

    #[test]
    fn test_load_rejects_future_version() {
        let mut snapshot = StateSnapshot::capture(&sample_engine());
        snapshot.version = SNAPSHOT_VERSION + 1;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        snapshot.save(&path).unwrap();
        assert!(matches!(
            StateSnapshot::load(&path),
            Err(SnapshotError::UnsupportedVersion(_))
        ));
    }
}
