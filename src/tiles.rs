//! Tile storage: the ground truth of grid occupancy.
//!
//! [`TileTable`] holds the records and implements every operation;
//! [`TileStore`] puts it behind a lock so concurrent placements and the
//! evaluation pass can share it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::error::{GameError, GameResult};
use crate::grid::{Coord, PlayerId, Tile};

/// Tiles in insertion order with a unique index on the coordinate.
#[derive(Debug, Clone, Default)]
pub struct TileTable {
    rows: Vec<Tile>,
    index: HashMap<Coord, usize>,
}

impl TileTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no tile has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the tile at a coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index.get(&coord).map(|&idx| &self.rows[idx])
    }

    /// Insert a new unresolved tile.
    ///
    /// # Errors
    ///
    /// Returns `TileOccupied` if a tile already exists at `coord`.
    pub fn insert(
        &mut self,
        coord: Coord,
        owner: PlayerId,
        submitted_at: DateTime<Utc>,
    ) -> GameResult<Tile> {
        self.insert_tile(Tile::new(coord, owner, submitted_at))
    }

    /// Insert a complete tile record, keeping its `resolved` flag.
    ///
    /// # Errors
    ///
    /// Returns `TileOccupied` if a tile already exists at its coordinate.
    pub fn insert_tile(&mut self, tile: Tile) -> GameResult<Tile> {
        match self.index.entry(tile.coord) {
            Entry::Occupied(_) => Err(GameError::TileOccupied(tile.coord)),
            Entry::Vacant(slot) => {
                slot.insert(self.rows.len());
                self.rows.push(tile.clone());
                Ok(tile)
            }
        }
    }

    /// Reassign the owner of every listed tile.
    ///
    /// Coordinates without a tile are skipped. `submitted_at` and
    /// `resolved` are left alone. Returns the number of tiles updated.
    pub fn update_owner(&mut self, coords: impl IntoIterator<Item = Coord>, owner: PlayerId) -> usize {
        let mut updated = 0;
        for coord in coords {
            if let Some(&idx) = self.index.get(&coord) {
                self.rows[idx].owner = owner;
                updated += 1;
            }
        }
        updated
    }

    /// Mark a tile as resolved.
    ///
    /// Returns `false` if no tile exists at `coord`.
    pub fn mark_resolved(&mut self, coord: Coord) -> bool {
        if let Some(&idx) = self.index.get(&coord) {
            self.rows[idx].resolved = true;
            true
        } else {
            false
        }
    }

    /// Unresolved tiles by ascending submission time.
    ///
    /// The sort is stable, so equal timestamps keep insertion order.
    #[must_use]
    pub fn unresolved_by_submission(&self) -> Vec<&Tile> {
        let mut pending: Vec<&Tile> = self.rows.iter().filter(|t| !t.resolved).collect();
        pending.sort_by_key(|t| t.submitted_at);
        pending
    }

    /// Resolved tiles in insertion order.
    pub fn resolved(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().filter(|t| t.resolved)
    }

    /// All tiles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter()
    }

    /// Number of tiles currently owned by each player.
    #[must_use]
    pub fn owner_counts(&self) -> HashMap<PlayerId, u64> {
        let mut counts = HashMap::new();
        for tile in &self.rows {
            *counts.entry(tile.owner).or_insert(0) += 1;
        }
        counts
    }
}

/// Shared, lock-protected tile table.
///
/// `insert` is a single check-and-insert under the write lock, which makes
/// it the consistency gate for racing placements on one coordinate.
#[derive(Debug, Default)]
pub struct TileStore {
    table: RwLock<TileTable>,
}

impl TileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store around an existing table.
    #[must_use]
    pub fn from_table(table: TileTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    /// Run `f` with shared access to the table.
    pub fn read<R>(&self, f: impl FnOnce(&TileTable) -> R) -> R {
        let guard = self.table.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Run `f` with exclusive access to the table.
    ///
    /// Every other reader and writer waits until `f` returns.
    pub fn exclusive<R>(&self, f: impl FnOnce(&mut TileTable) -> R) -> R {
        let mut guard = self.table.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Get a copy of the tile at a coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Tile> {
        self.read(|table| table.get(coord).cloned())
    }

    /// Atomically insert a tile if the coordinate is free.
    ///
    /// # Errors
    ///
    /// Returns `TileOccupied` if a tile already exists at `coord`.
    pub fn insert(
        &self,
        coord: Coord,
        owner: PlayerId,
        submitted_at: DateTime<Utc>,
    ) -> GameResult<Tile> {
        self.exclusive(|table| table.insert(coord, owner, submitted_at))
    }

    /// Reassign the owner of every listed tile.
    pub fn update_owner(&self, coords: impl IntoIterator<Item = Coord>, owner: PlayerId) -> usize {
        self.exclusive(|table| table.update_owner(coords, owner))
    }

    /// Mark a tile as resolved.
    pub fn mark_resolved(&self, coord: Coord) -> bool {
        self.exclusive(|table| table.mark_resolved(coord))
    }

    /// Unresolved tiles by ascending submission time, ties in insertion order.
    #[must_use]
    pub fn list_unresolved_ordered_by_submission(&self) -> Vec<Tile> {
        self.read(|table| table.unresolved_by_submission().into_iter().cloned().collect())
    }

    /// Resolved tiles in insertion order.
    #[must_use]
    pub fn list_resolved(&self) -> Vec<Tile> {
        self.read(|table| table.resolved().cloned().collect())
    }

    /// All tiles in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Tile> {
        self.read(|table| table.iter().cloned().collect())
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read(TileTable::len)
    }

    /// True if no tile has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(TileTable::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_insert_unique() {
        let store = TileStore::new();
        let tile = store.insert(Coord::new(1, 2), 3, at(10)).unwrap();
        assert_eq!(tile.owner, 3);
        assert!(!tile.resolved);

        let again = store.insert(Coord::new(1, 2), 4, at(11));
        assert_eq!(again, Err(GameError::TileOccupied(Coord::new(1, 2))));
        assert_eq!(store.get(Coord::new(1, 2)).unwrap().owner, 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unresolved_order_ties_by_insertion() {
        let store = TileStore::new();
        store.insert(Coord::new(0, 0), 1, at(20)).unwrap();
        store.insert(Coord::new(0, 1), 2, at(10)).unwrap();
        store.insert(Coord::new(0, 2), 3, at(20)).unwrap();
        store.insert(Coord::new(0, 3), 4, at(10)).unwrap();
        store.mark_resolved(Coord::new(0, 3));

        let owners: Vec<PlayerId> = store
            .list_unresolved_ordered_by_submission()
            .iter()
            .map(|t| t.owner)
            .collect();
        assert_eq!(owners, vec![2, 1, 3]);
        assert_eq!(store.list_resolved().len(), 1);
    }

    #[test]
    fn test_update_owner_keeps_flags() {
        let store = TileStore::new();
        store.insert(Coord::new(0, 0), 1, at(5)).unwrap();
        store.insert(Coord::new(1, 0), 1, at(6)).unwrap();
        store.mark_resolved(Coord::new(0, 0));

        let updated = store.update_owner([Coord::new(0, 0), Coord::new(1, 0), Coord::new(9, 9)], 2);
        assert_eq!(updated, 2);

        let first = store.get(Coord::new(0, 0)).unwrap();
        assert_eq!(first.owner, 2);
        assert!(first.resolved);
        assert_eq!(first.submitted_at, at(5));
        assert!(!store.get(Coord::new(1, 0)).unwrap().resolved);
    }

    #[test]
    fn test_owner_counts() {
        let mut table = TileTable::new();
        table.insert(Coord::new(0, 0), 1, at(0)).unwrap();
        table.insert(Coord::new(0, 1), 1, at(0)).unwrap();
        table.insert(Coord::new(0, 2), 2, at(0)).unwrap();
        let counts = table.owner_counts();
        assert_eq!(counts[&1], 2);
        assert_eq!(counts[&2], 1);
        assert!(!counts.contains_key(&3));
    }

    #[test]
    fn test_mark_resolved_missing() {
        let store = TileStore::new();
        assert!(!store.mark_resolved(Coord::new(0, 0)));
        assert!(store.is_empty());
    }
}
