//! Placement records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::{Coord, PlayerId};

/// A claimed cell.
///
/// The coordinate never changes once placed; only `owner` may be
/// rewritten by a capture.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Cell position (primary key).
    pub coord: Coord,
    /// Current owner.
    pub owner: PlayerId,
    /// When the placement was committed.
    pub submitted_at: DateTime<Utc>,
    /// Whether the tile has been through an evaluation pass.
    pub resolved: bool,
}

impl Tile {
    /// Create a new unresolved tile.
    #[must_use]
    pub const fn new(coord: Coord, owner: PlayerId, submitted_at: DateTime<Utc>) -> Self {
        Self {
            coord,
            owner,
            submitted_at,
            resolved: false,
        }
    }
}
