//! Range history: the playable bounds only ever grow.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use log::{info, warn};

use crate::cache::{CacheInvalidator, CacheKey};
use crate::error::{GameError, GameResult};
use crate::grid::{Range, RangeRecord};

/// Owner of the append-only range history.
#[derive(Debug)]
pub struct RangeManager {
    history: RwLock<Vec<RangeRecord>>,
    max_cells: u64,
    cache: Arc<dyn CacheInvalidator>,
}

impl RangeManager {
    /// Create a manager with no range configured.
    #[must_use]
    pub fn new(max_cells: u64, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self::with_history(Vec::new(), max_cells, cache)
    }

    /// Create a manager from an existing history, oldest first.
    ///
    /// The caller is responsible for the history being expansion-only.
    #[must_use]
    pub fn with_history(
        history: Vec<RangeRecord>,
        max_cells: u64,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            history: RwLock::new(history),
            max_cells,
            cache,
        }
    }

    /// The current (most recently created) range.
    #[must_use]
    pub fn current(&self) -> Option<Range> {
        self.current_record().map(|record| record.range)
    }

    /// The current range record, with its id and creation time.
    #[must_use]
    pub fn current_record(&self) -> Option<RangeRecord> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// The full history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<RangeRecord> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current range with a superset of it.
    ///
    /// Always accepted when no range exists yet.
    ///
    /// # Errors
    ///
    /// Returns `RangeShrinkDisallowed` if any bound of `requested` lies
    /// inside the current range, or `InvalidInput` if it spans more than
    /// the configured cell limit.
    pub fn expand(&self, requested: Range) -> GameResult<RangeRecord> {
        if requested.cell_count() > self.max_cells {
            return Err(GameError::InvalidInput(format!(
                "range {requested} spans {} cells, limit is {}",
                requested.cell_count(),
                self.max_cells
            )));
        }

        let record = {
            let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
            let last = history.last().copied();
            if let Some(current) = last
                && !requested.covers(&current.range)
            {
                warn!("Rejected range {requested}: would shrink {}", current.range);
                return Err(GameError::RangeShrinkDisallowed {
                    current: current.range,
                    requested,
                });
            }
            let record = RangeRecord {
                id: last.map_or(1, |r| r.id + 1),
                range: requested,
                created_at: Utc::now(),
            };
            history.push(record);
            record
        };

        info!("Range {} is now {}", record.id, record.range);
        self.cache.invalidate(CacheKey::GridSnapshot);
        Ok(record)
    }
}
