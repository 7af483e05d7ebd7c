//! Error types for grid occupation and territory resolution.

use std::fmt;

use crate::grid::{Coord, PlayerId, Range, Role};

/// Every rejected engine operation maps to exactly one of these kinds.
///
/// All variants are recoverable: they describe why a requested mutation
/// was not applied so the caller can present an actionable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The coordinate lies outside the current range.
    OutOfBounds {
        /// The rejected coordinate.
        coord: Coord,
        /// The range it was checked against.
        range: Range,
    },
    /// A tile already exists at the coordinate.
    TileOccupied(Coord),
    /// The player has no points left to spend.
    InsufficientPoints(PlayerId),
    /// No range has been created yet.
    NoRangeConfigured,
    /// The requested range would shrink at least one bound.
    RangeShrinkDisallowed {
        /// The current range.
        current: Range,
        /// The rejected request.
        requested: Range,
    },
    /// Malformed input (non-integer values, inverted bounds, overflow).
    InvalidInput(String),
    /// An admin attempted to demote themselves.
    SelfDemotionDisallowed(PlayerId),
    /// The target player already has the requested role.
    AlreadyInRole {
        /// The target player.
        player: PlayerId,
        /// The role it already holds.
        role: Role,
    },
    /// No player with this id exists.
    UnknownPlayer(PlayerId),
    /// A player with this name is already registered.
    NameTaken(String),
    /// The acting player lacks the admin role.
    Unauthorized(PlayerId),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds { coord, range } => {
                write!(f, "{coord} is outside the grid {range}")
            }
            GameError::TileOccupied(coord) => write!(f, "tile {coord} is already occupied"),
            GameError::InsufficientPoints(player) => {
                write!(f, "player {player} has no points left")
            }
            GameError::NoRangeConfigured => write!(f, "no grid range has been configured"),
            GameError::RangeShrinkDisallowed { current, requested } => {
                write!(f, "range {requested} would shrink the current range {current}")
            }
            GameError::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            GameError::SelfDemotionDisallowed(player) => {
                write!(f, "player {player} cannot demote themselves")
            }
            GameError::AlreadyInRole { player, role } => {
                write!(f, "player {player} already has role {role}")
            }
            GameError::UnknownPlayer(player) => write!(f, "unknown player {player}"),
            GameError::NameTaken(name) => write!(f, "name {name:?} is already taken"),
            GameError::Unauthorized(player) => {
                write!(f, "player {player} is not allowed to do that")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
