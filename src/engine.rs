//! The engine facade.
//!
//! Owns the roster, range history and tile table, and exposes the
//! operations callers use. Admin-only operations take the acting player
//! and check its role here; the services underneath are role-agnostic.
//!
//! `Engine` is `Sync`: share it by reference between threads and call
//! [`Engine::place_tile`] concurrently. Placements for different cells and
//! players proceed in parallel; an evaluation pass excludes them.

use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::cache::{CacheInvalidator, CacheKey, NoopInvalidator};
use crate::config::EngineConfig;
use crate::error::{GameError, GameResult};
use crate::evaluation::{EvaluationEngine, EvaluationReport};
use crate::grid::{Coord, OwnershipGrid, Player, PlayerId, Range, RangeRecord, Role, Tile};
use crate::occupation::OccupationService;
use crate::range::RangeManager;
use crate::roster::PlayerRoster;
use crate::standings::{Standing, StandingsAggregator};
use crate::tiles::{TileStore, TileTable};

/// A player together with the number of tiles they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// The player record.
    pub player: Player,
    /// Tiles currently owned.
    pub tiles: u64,
}

/// Grid occupation and territory-resolution engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    roster: PlayerRoster,
    ranges: RangeManager,
    tiles: TileStore,
    cache: Arc<dyn CacheInvalidator>,
}

impl Engine {
    /// Create an empty engine that drops invalidation signals.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_cache(config, Arc::new(NoopInvalidator))
    }

    /// Create an empty engine reporting to `cache`.
    #[must_use]
    pub fn with_cache(config: EngineConfig, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self::from_parts(
            config,
            PlayerRoster::new(),
            Vec::new(),
            TileTable::new(),
            cache,
        )
    }

    /// Assemble an engine from already-validated state.
    pub(crate) fn from_parts(
        config: EngineConfig,
        roster: PlayerRoster,
        ranges: Vec<RangeRecord>,
        tiles: TileTable,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            ranges: RangeManager::with_history(ranges, config.max_cells, cache.clone()),
            roster,
            tiles: TileStore::from_table(tiles),
            config,
            cache,
        }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The player roster.
    #[must_use]
    pub const fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    /// The range history.
    #[must_use]
    pub const fn ranges(&self) -> &RangeManager {
        &self.ranges
    }

    /// The tile table.
    #[must_use]
    pub const fn tiles(&self) -> &TileStore {
        &self.tiles
    }

    /// Placement service over this engine's stores.
    #[must_use]
    pub fn occupation(&self) -> OccupationService<'_> {
        OccupationService::new(&self.roster, &self.ranges, &self.tiles, self.cache.as_ref())
    }

    /// Evaluation service over this engine's stores.
    #[must_use]
    pub fn evaluation(&self) -> EvaluationEngine<'_> {
        EvaluationEngine::new(&self.ranges, &self.tiles, self.cache.as_ref())
    }

    /// Standings view over this engine's stores.
    #[must_use]
    pub fn standings_aggregator(&self) -> StandingsAggregator<'_> {
        StandingsAggregator::new(&self.roster, &self.tiles)
    }

    fn require_admin(&self, actor: PlayerId) -> GameResult<Player> {
        let player = self.roster.get(actor)?;
        if player.is_admin() {
            Ok(player)
        } else {
            warn!("Player {actor} attempted an admin operation");
            Err(GameError::Unauthorized(actor))
        }
    }

    /// Register a player. Names listed in the config become admins.
    ///
    /// # Errors
    ///
    /// Returns `NameTaken` or `InvalidInput` for a bad name.
    pub fn register_player(&self, name: &str) -> GameResult<Player> {
        let role = if self.config.is_admin_name(name.trim()) {
            Role::Admin
        } else {
            Role::User
        };
        self.register_player_with_role(name, role)
    }

    /// Register a player with an explicit role.
    ///
    /// # Errors
    ///
    /// Returns `NameTaken` or `InvalidInput` for a bad name.
    pub fn register_player_with_role(&self, name: &str, role: Role) -> GameResult<Player> {
        let player = self
            .roster
            .register(name, role, self.config.starting_points)?;
        info!("Registered player {} ({}) as {}", player.id, player.name, player.role);
        if role == Role::User {
            self.cache.invalidate(CacheKey::Standings);
        }
        Ok(player)
    }

    /// Get a copy of a player.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` if no such player exists.
    pub fn player(&self, id: PlayerId) -> GameResult<Player> {
        self.roster.get(id)
    }

    /// All players, ordered by id.
    #[must_use]
    pub fn players(&self) -> Vec<Player> {
        self.roster.list()
    }

    /// A player with their current tile count.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` if no such player exists.
    pub fn profile(&self, id: PlayerId) -> GameResult<Profile> {
        let player = self.roster.get(id)?;
        let tiles = self
            .tiles
            .read(|table| table.iter().filter(|t| t.owner == id).count());
        Ok(Profile {
            player,
            tiles: tiles as u64,
        })
    }

    /// Claim a cell for a player. See [`OccupationService::place_tile`].
    ///
    /// # Errors
    ///
    /// Returns the placement error kinds documented on the service.
    pub fn place_tile(&self, player: PlayerId, coord: Coord) -> GameResult<Tile> {
        self.occupation().place_tile(player, coord)
    }

    /// Grow the playable range. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `RangeShrinkDisallowed` if a
    /// bound would shrink and `InvalidInput` if the range is too large.
    pub fn expand_range(&self, actor: PlayerId, range: Range) -> GameResult<RangeRecord> {
        self.require_admin(actor)?;
        self.ranges.expand(range)
    }

    /// The current range.
    #[must_use]
    pub fn current_range(&self) -> Option<Range> {
        self.ranges.current()
    }

    /// Run an evaluation pass. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins. The pass itself never fails.
    pub fn run_evaluation(&self, actor: PlayerId) -> GameResult<EvaluationReport> {
        self.require_admin(actor)?;
        Ok(self.evaluation().run())
    }

    /// Users ranked by tile count, fewest first.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        self.standings_aggregator().standings()
    }

    /// Dense ownership of the current range, `None` without a usable range.
    #[must_use]
    pub fn grid_snapshot(&self) -> Option<OwnershipGrid> {
        let range = self.ranges.current()?;
        self.tiles
            .read(|table| OwnershipGrid::from_tiles(range, table.iter()))
    }

    /// Dense ownership of `window`, which must lie inside the current range.
    ///
    /// # Errors
    ///
    /// Returns `NoRangeConfigured` without a range and `InvalidInput` if the
    /// window is empty or reaches outside the current range.
    pub fn grid_snapshot_in(&self, window: Range) -> GameResult<OwnershipGrid> {
        let range = self.ranges.current().ok_or(GameError::NoRangeConfigured)?;
        if !range.covers(&window) {
            return Err(GameError::InvalidInput(format!(
                "window {window} is not inside the grid {range}"
            )));
        }
        self.tiles
            .read(|table| OwnershipGrid::from_tiles(window, table.iter()))
            .ok_or_else(|| GameError::InvalidInput(format!("window {window} has no cells")))
    }

    /// Add `delta` (possibly negative) to a player's points. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `UnknownPlayer` for a bad
    /// target and `InvalidInput` if the balance would leave `0..=u32::MAX`.
    pub fn grant_points(&self, actor: PlayerId, target: PlayerId, delta: i64) -> GameResult<Player> {
        self.require_admin(actor)?;
        let player = self.roster.update(target, |player| {
            let balance = i64::from(player.points)
                .checked_add(delta)
                .and_then(|b| u32::try_from(b).ok())
                .ok_or_else(|| {
                    GameError::InvalidInput(format!(
                        "granting {delta} to a balance of {} is out of range",
                        player.points
                    ))
                })?;
            player.points = balance;
            Ok(player.clone())
        })?;
        info!("Player {actor} granted {delta} points to {target}, now {}", player.points);
        Ok(player)
    }

    /// Change a player's role. Admin only; admins cannot demote themselves.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized`, `UnknownPlayer`, `SelfDemotionDisallowed` or
    /// `AlreadyInRole`.
    pub fn set_role(&self, actor: PlayerId, target: PlayerId, role: Role) -> GameResult<Player> {
        self.require_admin(actor)?;
        if actor == target && role == Role::User {
            return Err(GameError::SelfDemotionDisallowed(actor));
        }
        let player = self.roster.update(target, |player| {
            if player.role == role {
                return Err(GameError::AlreadyInRole {
                    player: target,
                    role,
                });
            }
            player.role = role;
            Ok(player.clone())
        })?;
        info!("Player {actor} made {target} {role}");
        self.cache.invalidate(CacheKey::Standings);
        Ok(player)
    }
}
