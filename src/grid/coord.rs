//! Grid coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Axis neighbor offsets `(dx, dy)` in evaluation order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// A cell on the unbounded integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Parse a coordinate from raw text fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either field is not an integer.
    pub fn parse(x: &str, y: &str) -> GameResult<Self> {
        Ok(Self::new(parse_number("x", x)?, parse_number("y", y)?))
    }

    /// The coordinate shifted by `(dx, dy)`, or `None` on overflow.
    #[must_use]
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The four axis neighbors in [`NEIGHBOR_OFFSETS`] order.
    ///
    /// Entries are `None` only where the shift would overflow `i32`.
    #[must_use]
    #[inline]
    pub fn neighbors(self) -> [Option<Self>; 4] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parse an integer field, reporting the field name on failure.
///
/// # Errors
///
/// Returns `InvalidInput` if `raw` (trimmed) does not parse as `T`.
pub fn parse_number<T: FromStr>(field: &str, raw: &str) -> GameResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| GameError::InvalidInput(format!("{field} must be an integer, got {raw:?}")))
}
