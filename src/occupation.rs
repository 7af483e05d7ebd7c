//! Tile placement.

use chrono::Utc;
use log::debug;

use crate::cache::{CacheInvalidator, CacheKey};
use crate::error::{GameError, GameResult};
use crate::grid::{Coord, PlayerId, Tile};
use crate::range::RangeManager;
use crate::roster::PlayerRoster;
use crate::tiles::TileStore;

/// Validates and commits placements against the range, the tile table
/// and the player's point budget.
#[derive(Debug, Clone, Copy)]
pub struct OccupationService<'a> {
    roster: &'a PlayerRoster,
    ranges: &'a RangeManager,
    tiles: &'a TileStore,
    cache: &'a dyn CacheInvalidator,
}

impl<'a> OccupationService<'a> {
    /// Create a service over the given stores.
    #[must_use]
    pub fn new(
        roster: &'a PlayerRoster,
        ranges: &'a RangeManager,
        tiles: &'a TileStore,
        cache: &'a dyn CacheInvalidator,
    ) -> Self {
        Self {
            roster,
            ranges,
            tiles,
            cache,
        }
    }

    /// Claim the cell at `coord` for `player_id`, spending one point.
    ///
    /// The tile insert and the point decrement commit together: the
    /// decrement is only written back once the insert has succeeded, and
    /// the player's lock is held across both.
    ///
    /// # Errors
    ///
    /// - `NoRangeConfigured` if no range exists yet.
    /// - `OutOfBounds` if `coord` lies outside the current range,
    ///   whatever the player's balance.
    /// - `UnknownPlayer` if the player does not exist.
    /// - `InsufficientPoints` if the player has no points left.
    /// - `TileOccupied` if the cell is already claimed; points are untouched.
    pub fn place_tile(&self, player_id: PlayerId, coord: Coord) -> GameResult<Tile> {
        let range = self.ranges.current().ok_or(GameError::NoRangeConfigured)?;
        if !range.contains(coord) {
            return Err(GameError::OutOfBounds { coord, range });
        }

        let tile = self.roster.update(player_id, |player| {
            if player.points == 0 {
                return Err(GameError::InsufficientPoints(player.id));
            }
            let tile = self.tiles.insert(coord, player.id, Utc::now())?;
            player.points -= 1;
            Ok(tile)
        })?;

        debug!("Player {player_id} claimed {coord}");
        self.cache.invalidate(CacheKey::GridSnapshot);
        self.cache.invalidate(CacheKey::Standings);
        Ok(tile)
    }
}
