//! Grid bounds.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::grid::Coord;

/// Half-open rectangular bounds `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive lower x bound.
    pub min_x: i32,
    /// Exclusive upper x bound.
    pub max_x: i32,
    /// Inclusive lower y bound.
    pub min_y: i32,
    /// Exclusive upper y bound.
    pub max_y: i32,
}

impl Range {
    /// Create a range, rejecting inverted bounds.
    ///
    /// Empty ranges (`min == max` on an axis) are allowed; they contain
    /// no cells.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a minimum exceeds its maximum.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> GameResult<Self> {
        if min_x > max_x || min_y > max_y {
            return Err(GameError::InvalidInput(format!(
                "inverted bounds [{min_x}, {max_x}) x [{min_y}, {max_y})"
            )));
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u64 {
        span(self.min_x, self.max_x)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u64 {
        span(self.min_y, self.max_y)
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.width() * self.height()
    }

    /// True if the range holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Check if a coordinate lies inside the range.
    #[must_use]
    #[inline]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.min_x && coord.x < self.max_x && coord.y >= self.min_y && coord.y < self.max_y
    }

    /// Check if `other` fits entirely inside this range on every side.
    #[must_use]
    pub const fn covers(&self, other: &Range) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

#[allow(clippy::cast_sign_loss)]
fn span(min: i32, max: i32) -> u64 {
    (i64::from(max) - i64::from(min)).max(0) as u64
}

/// One entry of the append-only range history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRecord {
    /// Sequential id; the highest id is the current range.
    pub id: u64,
    /// The bounds.
    pub range: Range,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
