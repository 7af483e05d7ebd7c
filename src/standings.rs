//! Leaderboard.

use std::collections::HashMap;

use serde::Serialize;

use crate::grid::{Player, PlayerId, Role};
use crate::roster::PlayerRoster;
use crate::tiles::{TileStore, TileTable};

/// Tile count for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Player identifier.
    pub player_id: PlayerId,
    /// Player name.
    pub name: String,
    /// Tiles currently owned.
    pub tiles: u64,
}

/// Join tile counts against every `user` player.
///
/// Users without tiles appear with a count of zero; admins are left out.
/// Sorted by ascending count, then by name.
#[must_use]
pub fn rank(players: &[Player], counts: &HashMap<PlayerId, u64>) -> Vec<Standing> {
    let mut standings: Vec<Standing> = players
        .iter()
        .filter(|p| p.role == Role::User)
        .map(|p| Standing {
            player_id: p.id,
            name: p.name.clone(),
            tiles: counts.get(&p.id).copied().unwrap_or(0),
        })
        .collect();
    standings.sort_by(|a, b| a.tiles.cmp(&b.tiles).then_with(|| a.name.cmp(&b.name)));
    standings
}

/// Read-only view deriving standings from the roster and tile table.
#[derive(Debug, Clone, Copy)]
pub struct StandingsAggregator<'a> {
    roster: &'a PlayerRoster,
    tiles: &'a TileStore,
}

impl<'a> StandingsAggregator<'a> {
    /// Create an aggregator over the given stores.
    #[must_use]
    pub fn new(roster: &'a PlayerRoster, tiles: &'a TileStore) -> Self {
        Self { roster, tiles }
    }

    /// Current standings, fewest tiles first.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let counts = self.tiles.read(TileTable::owner_counts);
        rank(&self.roster.list(), &counts)
    }
}
