//! Per-tick run trace for reporting and export.

use serde::{Deserialize, Serialize};

/// Snapshot of the engine at one tick, recorded after the tick's order has
/// been applied.
///
/// Undefined rolling averages are recorded as the tick's mid-price so the
/// exported columns stay numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    pub index: usize,
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
    pub spread: f64,
    pub short_avg: f64,
    pub long_avg: f64,
    pub position: i64,
    pub high_spread: bool,
}

/// Full per-tick history of one backtest run.
#[derive(Debug, Clone, Default)]
pub struct RunTrace {
    rows: Vec<TraceRow>,
}

impl RunTrace {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: TraceRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
