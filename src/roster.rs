//! Player roster.
//!
//! Each player sits behind its own mutex, so point balances of different
//! players are updated in parallel while updates to one player serialize.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::{GameError, GameResult};
use crate::grid::{Player, PlayerId, Role};

#[derive(Debug, Default)]
struct Entries {
    by_id: BTreeMap<PlayerId, Arc<Mutex<Player>>>,
    by_name: HashMap<String, PlayerId>,
    next_id: PlayerId,
}

/// All registered players.
#[derive(Debug)]
pub struct PlayerRoster {
    entries: RwLock<Entries>,
}

impl Default for PlayerRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRoster {
    /// Create an empty roster. The first registered player gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                next_id: 1,
                ..Entries::default()
            }),
        }
    }

    /// Rebuild a roster from stored player records.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a duplicate or zero id and `NameTaken` for
    /// a duplicate name.
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> GameResult<Self> {
        let roster = Self::new();
        {
            let mut entries = roster.entries.write().unwrap_or_else(PoisonError::into_inner);
            for player in players {
                if player.id == 0 || entries.by_id.contains_key(&player.id) {
                    return Err(GameError::InvalidInput(format!(
                        "duplicate or invalid player id {}",
                        player.id
                    )));
                }
                if entries.by_name.contains_key(&player.name) {
                    return Err(GameError::NameTaken(player.name));
                }
                entries.next_id = entries.next_id.max(player.id.saturating_add(1));
                entries.by_name.insert(player.name.clone(), player.id);
                entries.by_id.insert(player.id, Arc::new(Mutex::new(player)));
            }
        }
        Ok(roster)
    }

    /// Register a new player.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name and `NameTaken` if the
    /// name is already registered.
    pub fn register(&self, name: &str, role: Role, points: u32) -> GameResult<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidInput("player name must not be empty".to_string()));
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.by_name.contains_key(name) {
            return Err(GameError::NameTaken(name.to_string()));
        }
        let id = entries.next_id;
        entries.next_id = id
            .checked_add(1)
            .ok_or_else(|| GameError::InvalidInput("player ids exhausted".to_string()))?;

        let player = Player::new(id, name, role, points);
        entries.by_name.insert(player.name.clone(), id);
        entries.by_id.insert(id, Arc::new(Mutex::new(player.clone())));
        Ok(player)
    }

    fn slot(&self, id: PlayerId) -> GameResult<Arc<Mutex<Player>>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .get(&id)
            .cloned()
            .ok_or(GameError::UnknownPlayer(id))
    }

    /// Get a copy of a player.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` if no such player exists.
    pub fn get(&self, id: PlayerId) -> GameResult<Player> {
        let slot = self.slot(id)?;
        let player = slot.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(player)
    }

    /// Run `f` on a working copy of the player while holding its lock.
    ///
    /// The copy is written back only if `f` succeeds, so a failed update
    /// leaves the player untouched.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` if no such player exists, or whatever `f`
    /// returns.
    pub fn update<R>(&self, id: PlayerId, f: impl FnOnce(&mut Player) -> GameResult<R>) -> GameResult<R> {
        let slot = self.slot(id)?;
        let mut player = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let mut working = player.clone();
        let result = f(&mut working)?;
        *player = working;
        Ok(result)
    }

    /// Look a player up by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Player> {
        let id = *self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_name
            .get(name.trim())?;
        self.get(id).ok()
    }

    /// Copies of all players, ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<Player> {
        let slots: Vec<Arc<Mutex<Player>>> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .values()
            .cloned()
            .collect();
        slots
            .iter()
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }
}
