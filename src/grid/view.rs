//! Dense ownership view over a range.

use std::collections::HashSet;

use serde::Serialize;

use crate::grid::{Coord, PlayerId, Range, Tile};

/// Ownership of every cell in a range, stored in row-major order.
///
/// Indexed by normalized coordinate `(x - min_x, y - min_y)`. Empty cells
/// are `None`. This is derived state: it is rebuilt from the tile table
/// whenever it is needed and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipGrid {
    range: Range,
    width: usize,
    height: usize,
    cells: Vec<Option<PlayerId>>,
}

impl OwnershipGrid {
    /// Create an all-empty grid covering `range`.
    ///
    /// Returns `None` if the range has no cells or does not fit in memory
    /// addressing.
    #[must_use]
    pub fn new(range: Range) -> Option<Self> {
        if range.is_empty() {
            return None;
        }
        let width = usize::try_from(range.width()).ok()?;
        let height = usize::try_from(range.height()).ok()?;
        let size = width.checked_mul(height)?;

        Some(Self {
            range,
            width,
            height,
            cells: vec![None; size],
        })
    }

    /// Create a grid with every tile inside `range` written at its cell.
    ///
    /// Tiles outside the range are ignored.
    #[must_use]
    pub fn from_tiles<'a>(range: Range, tiles: impl IntoIterator<Item = &'a Tile>) -> Option<Self> {
        let mut grid = Self::new(range)?;
        for tile in tiles {
            grid.set(tile.coord, Some(tile.owner));
        }
        Some(grid)
    }

    /// The range this grid covers.
    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Option<PlayerId>] {
        &self.cells
    }

    /// Iterate over rows, lowest `y` first.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PlayerId>]> {
        self.cells.chunks(self.width)
    }

    /// Convert a coordinate to an index into the cells array.
    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.range.contains(coord) {
            return None;
        }
        let nx = usize::try_from(i64::from(coord.x) - i64::from(self.range.min_x)).ok()?;
        let ny = usize::try_from(i64::from(coord.y) - i64::from(self.range.min_y)).ok()?;
        Some(ny * self.width + nx)
    }

    /// Owner of the cell, `None` if empty or outside the range.
    #[must_use]
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<PlayerId> {
        self.index(coord).and_then(|idx| self.cells[idx])
    }

    /// Set the owner of a cell.
    ///
    /// Returns `false` if the coordinate is outside the range.
    pub fn set(&mut self, coord: Coord, owner: Option<PlayerId>) -> bool {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = owner;
            true
        } else {
            false
        }
    }

    /// Find the enclosed same-owner region containing `start`.
    ///
    /// Walks the 4-connected component of cells sharing `start`'s owner
    /// with an explicit stack. The walk stops with `None` as soon as any
    /// visited cell touches an empty cell or the range boundary. Otherwise
    /// the whole component is returned, `start` first.
    ///
    /// Returns `None` for an empty or out-of-range `start`.
    #[must_use]
    pub fn enclosed_region(&self, start: Coord) -> Option<Vec<Coord>> {
        let start_idx = self.index(start)?;
        let owner = self.cells[start_idx]?;

        let mut visited = HashSet::from([start_idx]);
        let mut stack = vec![start];
        let mut region = Vec::new();

        while let Some(coord) = stack.pop() {
            region.push(coord);
            for neighbor in coord.neighbors() {
                // Falling off the range (or off i32) leaks.
                let next = neighbor?;
                let idx = self.index(next)?;
                match self.cells[idx] {
                    None => return None,
                    Some(other) if other == owner => {
                        if visited.insert(idx) {
                            stack.push(next);
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(range: Range, rows: &[&[PlayerId]]) -> OwnershipGrid {
        let mut grid = OwnershipGrid::new(range).unwrap();
        for (dy, row) in rows.iter().enumerate() {
            for (dx, owner) in row.iter().enumerate() {
                let coord = Coord::new(
                    range.min_x + i32::try_from(dx).unwrap(),
                    range.min_y + i32::try_from(dy).unwrap(),
                );
                grid.set(coord, (*owner != 0).then_some(*owner));
            }
        }
        grid
    }

    #[test]
    fn test_empty_range_has_no_grid() {
        assert!(OwnershipGrid::new(Range::new(0, 0, 0, 5).unwrap()).is_none());
    }

    #[test]
    fn test_get_set_normalized() {
        let mut grid = OwnershipGrid::new(Range::new(-2, 1, 10, 12).unwrap()).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.set(Coord::new(-2, 10), Some(7)));
        assert!(grid.set(Coord::new(0, 11), Some(8)));
        assert!(!grid.set(Coord::new(1, 11), Some(9)));
        assert_eq!(grid.cells()[0], Some(7));
        assert_eq!(grid.cells()[5], Some(8));
        assert_eq!(grid.get(Coord::new(0, 11)), Some(8));
        assert_eq!(grid.get(Coord::new(5, 5)), None);
    }

    #[test]
    fn test_single_cell_enclosed() {
        let grid = grid_from(
            Range::new(0, 3, 0, 3).unwrap(),
            &[&[0, 1, 0], &[1, 2, 1], &[0, 1, 0]],
        );
        assert_eq!(grid.enclosed_region(Coord::new(1, 1)), Some(vec![Coord::new(1, 1)]));
    }

    #[test]
    fn test_gap_in_ring_leaks() {
        let grid = grid_from(
            Range::new(0, 3, 0, 3).unwrap(),
            &[&[0, 1, 0], &[1, 2, 0], &[0, 1, 0]],
        );
        assert_eq!(grid.enclosed_region(Coord::new(1, 1)), None);
    }

    #[test]
    fn test_boundary_leaks() {
        let grid = grid_from(Range::new(0, 2, 0, 2).unwrap(), &[&[2, 1], &[1, 1]]);
        assert_eq!(grid.enclosed_region(Coord::new(0, 0)), None);
    }

    #[test]
    fn test_multi_cell_region_with_mixed_ring() {
        let grid = grid_from(
            Range::new(0, 4, 0, 4).unwrap(),
            &[&[0, 1, 3, 0], &[1, 2, 2, 1], &[0, 3, 1, 0], &[0, 0, 0, 0]],
        );
        let mut region = grid.enclosed_region(Coord::new(2, 1)).unwrap();
        region.sort();
        assert_eq!(region, vec![Coord::new(1, 1), Coord::new(2, 1)]);
    }

    #[test]
    fn test_empty_start() {
        let grid = OwnershipGrid::new(Range::new(0, 3, 0, 3).unwrap()).unwrap();
        assert_eq!(grid.enclosed_region(Coord::new(1, 1)), None);
    }
}
