//! Downstream cache invalidation.
//!
//! Renderers and leaderboards may memoize what they derive from the
//! engine. After every committed mutation the engine tells them which
//! derived artifacts went stale. Signals are fire-and-forget: an
//! invalidator cannot fail or block the mutation that triggered it, and
//! the engine never reads anything back from it.

use std::sync::Mutex;

/// A derived artifact a downstream consumer may cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The dense ownership grid (and any image rendered from it).
    GridSnapshot,
    /// Per-player tile counts.
    Standings,
}

/// Receiver of invalidation signals.
pub trait CacheInvalidator: Send + Sync + std::fmt::Debug {
    /// Mark `key` as stale.
    fn invalidate(&self, key: CacheKey);
}

/// Invalidator that drops every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn invalidate(&self, _key: CacheKey) {}
}

/// Invalidator that records every signal in order.
#[derive(Debug, Default)]
pub struct InvalidationLog {
    keys: Mutex<Vec<CacheKey>>,
}

impl InvalidationLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return the recorded keys.
    pub fn take(&self) -> Vec<CacheKey> {
        let mut keys = self.keys.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::take(&mut *keys)
    }
}

impl CacheInvalidator for InvalidationLog {
    fn invalidate(&self, key: CacheKey) {
        self.keys
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(key);
    }
}
