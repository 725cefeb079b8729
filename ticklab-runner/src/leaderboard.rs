//! Bounded top-K result set, ranked by PnL.
//!
//! Ties in PnL are broken by grid iteration order: the cell that appears
//! earlier in the grid wins. That makes the ranking reproducible across
//! worker counts and completion orders.

use serde::{Deserialize, Serialize};
use ticklab_core::domain::BacktestResult;

/// Default number of retained results.
pub const DEFAULT_CAPACITY: usize = 10;

/// One ranked result, tagged with the grid index it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub grid_index: usize,
    pub result: BacktestResult,
}

/// Outcome of an insert operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The entry made the cut.
    Inserted,
    /// Skipped: worse than the retained set, or a non-finite PnL.
    Skipped,
}

/// Fixed-capacity leaderboard, best PnL first.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<SweepEntry>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Inserts a result, keeping the set sorted and trimmed to capacity.
    ///
    /// Non-finite PnL values are rejected outright.
    pub fn insert(&mut self, grid_index: usize, result: BacktestResult) -> InsertOutcome {
        if !result.pnl.is_finite() {
            return InsertOutcome::Skipped;
        }

        self.entries.push(SweepEntry { grid_index, result });
        self.sort_entries();

        if self.entries.len() > self.capacity {
            let dropped = self.entries.pop();
            if dropped.map(|e| e.grid_index) == Some(grid_index) {
                return InsertOutcome::Skipped;
            }
        }
        InsertOutcome::Inserted
    }

    pub fn entries(&self) -> &[SweepEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&SweepEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn sort_entries(&mut self) {
        self.entries.sort_by(|a, b| {
            b.result
                .pnl
                .partial_cmp(&a.result.pnl)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.grid_index.cmp(&b.grid_index))
        });
    }
}
