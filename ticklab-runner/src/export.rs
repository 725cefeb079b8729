//! Result export — leaderboard CSV, per-tick trace CSV, run manifest JSON.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ticklab_core::engine::RunTrace;

use crate::leaderboard::{Leaderboard, SweepEntry};

/// Errors from writing result files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json write failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct LeaderboardRow {
    rank: usize,
    grid_index: usize,
    short_window: usize,
    waiting_period: usize,
    hs_exit_change_threshold: f64,
    ma_turn_threshold: f64,
    pnl: f64,
    total_fees: f64,
}

/// Writes the leaderboard as a ranked CSV.
pub fn export_leaderboard_csv(board: &Leaderboard, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for (rank, entry) in board.entries().iter().enumerate() {
        let p = &entry.result.params;
        writer.serialize(LeaderboardRow {
            rank: rank + 1,
            grid_index: entry.grid_index,
            short_window: p.short_window,
            waiting_period: p.waiting_period,
            hs_exit_change_threshold: p.hs_exit_change_threshold,
            ma_turn_threshold: p.ma_turn_threshold,
            pnl: entry.result.pnl,
            total_fees: entry.result.total_fees,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the per-tick trace of one run as CSV.
pub fn export_trace_csv(trace: &RunTrace, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in trace.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Provenance sidecar written next to the leaderboard CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: NaiveDateTime,
    pub data_path: String,
    pub dataset_hash: String,
    pub tick_count: usize,
    pub grid_cells: usize,
    pub worker_count: usize,
    pub top: Vec<SweepEntry>,
}

/// Writes the manifest as pretty-printed JSON.
pub fn write_manifest(manifest: &RunManifest, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}
