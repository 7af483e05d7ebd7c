//! Territory resolution.
//!
//! An evaluation pass walks every unresolved tile in submission order.
//! For each tile it looks at the four axis neighbors; any neighbor owned
//! by someone else whose same-owner region is completely walled in by
//! occupied cells is captured by the tile's owner.
//!
//! The pass works on a dense [`OwnershipGrid`] built from every tile in the
//! current range. Captures are written to that grid immediately, so a
//! later tile in the same pass sees the effects of earlier ones; the
//! result is order dependent and submission order is part of the
//! contract. Nothing is written to the tile table until the whole pass
//! has been computed, at which point every capture and every resolved
//! flag is committed under the same exclusive lock.

use log::{debug, info};
use serde::Serialize;

use crate::cache::{CacheInvalidator, CacheKey};
use crate::grid::{Coord, OwnershipGrid, PlayerId, Range};
use crate::range::RangeManager;
use crate::tiles::{TileStore, TileTable};

/// One enclosed region changing hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    /// The player whose tile closed the ring.
    pub captor: PlayerId,
    /// The region's owner before the capture.
    pub previous_owner: PlayerId,
    /// Every cell of the region.
    pub cells: Vec<Coord>,
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    /// Number of tiles that were unresolved when the pass started.
    pub processed: usize,
    /// Captures in the order they happened.
    pub captures: Vec<Capture>,
}

impl EvaluationReport {
    /// Total number of cells that changed owner (counting repeats).
    #[must_use]
    pub fn captured_cells(&self) -> usize {
        self.captures.iter().map(|c| c.cells.len()).sum()
    }
}

/// Run one pass over `table` within `range`.
///
/// Tiles outside `range` are marked resolved without affecting anything.
/// An empty range leaves the table untouched.
pub fn resolve_pass(table: &mut TileTable, range: Range) -> EvaluationReport {
    let Some(mut grid) = OwnershipGrid::from_tiles(range, table.iter()) else {
        return EvaluationReport::default();
    };

    let pending: Vec<(Coord, PlayerId)> = table
        .unresolved_by_submission()
        .iter()
        .map(|tile| (tile.coord, tile.owner))
        .collect();

    let mut captures = Vec::new();
    for &(coord, placed_by) in &pending {
        // An earlier capture in this pass may already have taken the cell.
        let owner = grid.get(coord).unwrap_or(placed_by);
        if !grid.set(coord, Some(owner)) {
            continue;
        }

        for neighbor in coord.neighbors().into_iter().flatten() {
            let Some(other) = grid.get(neighbor) else {
                continue;
            };
            if other == owner {
                continue;
            }
            if let Some(cells) = grid.enclosed_region(neighbor) {
                for &cell in &cells {
                    grid.set(cell, Some(owner));
                }
                debug!(
                    "Player {owner} captured {} cells of player {other} from {coord}",
                    cells.len()
                );
                captures.push(Capture {
                    captor: owner,
                    previous_owner: other,
                    cells,
                });
            }
        }
    }

    for capture in &captures {
        table.update_owner(capture.cells.iter().copied(), capture.captor);
    }
    for &(coord, _) in &pending {
        table.mark_resolved(coord);
    }

    EvaluationReport {
        processed: pending.len(),
        captures,
    }
}

/// Runs evaluation passes against the shared stores.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationEngine<'a> {
    ranges: &'a RangeManager,
    tiles: &'a TileStore,
    cache: &'a dyn CacheInvalidator,
}

impl<'a> EvaluationEngine<'a> {
    /// Create an engine over the given stores.
    #[must_use]
    pub fn new(
        ranges: &'a RangeManager,
        tiles: &'a TileStore,
        cache: &'a dyn CacheInvalidator,
    ) -> Self {
        Self {
            ranges,
            tiles,
            cache,
        }
    }

    /// Run one pass with exclusive access to the tile table.
    ///
    /// Placements and other passes block until this returns, so at most
    /// one pass runs at a time. Without a range (or with an empty one)
    /// this is a no-op.
    pub fn run(&self) -> EvaluationReport {
        info!("Starting evaluation");
        // The range is read under the tile lock: a range grown after it was
        // read would leave new tiles outside the arena yet marked resolved.
        let report = self.tiles.exclusive(|table| {
            let Some(range) = self.ranges.current() else {
                debug!("Skipping evaluation: no range configured");
                return EvaluationReport::default();
            };
            debug!("Evaluating {range}");
            resolve_pass(table, range)
        });
        info!(
            "Evaluation resolved {} tiles with {} captures",
            report.processed,
            report.captures.len()
        );

        if report.processed > 0 {
            self.cache.invalidate(CacheKey::Standings);
            self.cache.invalidate(CacheKey::GridSnapshot);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn table_with(placements: &[(i32, i32, PlayerId)]) -> TileTable {
        let mut table = TileTable::new();
        for (i, &(x, y, owner)) in placements.iter().enumerate() {
            let secs = i64::try_from(i).unwrap();
            table.insert(Coord::new(x, y), owner, at(secs)).unwrap();
        }
        table
    }

    fn owner(table: &TileTable, x: i32, y: i32) -> PlayerId {
        table.get(Coord::new(x, y)).unwrap().owner
    }

    fn three_by_three() -> Range {
        Range::new(0, 3, 0, 3).unwrap()
    }

    #[test]
    fn test_ring_captures_center() {
        let mut table = table_with(&[(1, 1, 2), (0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 1, 1)]);
        let report = resolve_pass(&mut table, three_by_three());

        assert_eq!(owner(&table, 1, 1), 1);
        assert_eq!(report.processed, 5);
        assert_eq!(
            report.captures,
            vec![Capture {
                captor: 1,
                previous_owner: 2,
                cells: vec![Coord::new(1, 1)],
            }]
        );
        assert!(table.iter().all(|t| t.resolved));
    }

    #[test]
    fn test_open_ring_no_capture() {
        let mut table = table_with(&[(1, 1, 2), (0, 1, 1), (1, 0, 1), (1, 2, 1)]);
        let report = resolve_pass(&mut table, three_by_three());
        assert_eq!(owner(&table, 1, 1), 2);
        assert!(report.captures.is_empty());
    }

    #[test]
    fn test_boundary_cell_never_captured() {
        let mut table = table_with(&[(0, 1, 2), (0, 0, 1), (1, 1, 1), (0, 2, 1)]);
        resolve_pass(&mut table, three_by_three());
        assert_eq!(owner(&table, 0, 1), 2);
    }

    #[test]
    fn test_later_placement_visible_to_earlier_tiles() {
        // The center lands after the ring, but every tile is on the grid
        // from the start of the pass, so the first ring tile captures it.
        let mut table = table_with(&[(0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 1, 1), (1, 1, 2)]);
        let report = resolve_pass(&mut table, three_by_three());
        assert_eq!(owner(&table, 1, 1), 1);
        assert_eq!(report.captures.len(), 1);
        assert_eq!(report.captures[0].captor, 1);
    }

    #[test]
    fn test_resolved_center_captured_by_later_ring() {
        let range = three_by_three();
        let mut table = table_with(&[(1, 1, 2)]);
        resolve_pass(&mut table, range);
        assert!(table.get(Coord::new(1, 1)).unwrap().resolved);

        for (i, (x, y)) in [(0, 1), (1, 0), (1, 2), (2, 1)].into_iter().enumerate() {
            let secs = 10 + i64::try_from(i).unwrap();
            table.insert(Coord::new(x, y), 1, at(secs)).unwrap();
        }
        let report = resolve_pass(&mut table, range);

        assert_eq!(report.processed, 4);
        assert_eq!(owner(&table, 1, 1), 1);
        assert!(table.get(Coord::new(1, 1)).unwrap().resolved);
    }

    #[test]
    fn test_multi_cell_region_captured_together() {
        let range = Range::new(0, 4, 0, 3).unwrap();
        let mut table = table_with(&[
            (1, 1, 2),
            (2, 1, 2),
            (0, 1, 1),
            (1, 0, 1),
            (2, 0, 1),
            (1, 2, 1),
            (2, 2, 1),
            (3, 1, 1),
        ]);
        let report = resolve_pass(&mut table, range);
        assert_eq!(owner(&table, 1, 1), 1);
        assert_eq!(owner(&table, 2, 1), 1);
        assert_eq!(report.captures.len(), 1);
        assert_eq!(report.captured_cells(), 2);
    }

    #[test]
    fn test_captured_pending_tile_acts_for_captor() {
        // Player 3 holds (2, 1), already walled by player 1 on every side
        // except (1, 1). Player 2's pending tile at (1, 1) is taken by
        // player 1's earlier tile at (0, 1), and then closes the ring on
        // (2, 1) for player 1, not for player 2.
        let mut table = TileTable::new();
        for (x, y, owner) in [(1, 0, 1), (1, 2, 1), (2, 0, 1), (2, 2, 1), (3, 1, 1), (2, 1, 3)] {
            let mut tile = Tile::new(Coord::new(x, y), owner, at(0));
            tile.resolved = true;
            table.insert_tile(tile).unwrap();
        }
        table.insert(Coord::new(0, 1), 1, at(10)).unwrap();
        table.insert(Coord::new(1, 1), 2, at(11)).unwrap();

        let report = resolve_pass(&mut table, Range::new(0, 4, 0, 3).unwrap());

        assert_eq!(report.processed, 2);
        assert_eq!(
            report.captures,
            vec![
                Capture {
                    captor: 1,
                    previous_owner: 2,
                    cells: vec![Coord::new(1, 1)],
                },
                Capture {
                    captor: 1,
                    previous_owner: 3,
                    cells: vec![Coord::new(2, 1)],
                },
            ]
        );
        assert_eq!(owner(&table, 1, 1), 1);
        assert_eq!(owner(&table, 2, 1), 1);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut table = table_with(&[(1, 1, 2), (0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 1, 1)]);
        resolve_pass(&mut table, three_by_three());
        let before: Vec<_> = table.iter().cloned().collect();

        let report = resolve_pass(&mut table, three_by_three());
        assert_eq!(report, EvaluationReport::default());
        let after: Vec<_> = table.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut table = table_with(&[(0, 0, 1)]);
        let report = resolve_pass(&mut table, Range::new(0, 0, 0, 0).unwrap());
        assert_eq!(report.processed, 0);
        assert!(!table.get(Coord::new(0, 0)).unwrap().resolved);
    }
}
