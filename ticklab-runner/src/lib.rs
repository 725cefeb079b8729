//! TickLab Runner — sweep orchestration on top of `ticklab-core`.
//!
//! This crate turns one backtest into a grid search:
//! - Parameter grids fuzzed around a base configuration
//! - The parallel sweep scheduler (atomic work cursor + bounded leaderboard)
//! - CSV tick loading with dataset fingerprinting, and a synthetic
//!   tick generator for demos and tests
//! - TOML sweep configuration
//! - Result export (leaderboard CSV, trace CSV, run manifest JSON)

pub mod config;
pub mod data_loader;
pub mod export;
pub mod grid;
pub mod leaderboard;
pub mod sweep;

pub use config::{ConfigError, SweepConfig};
pub use data_loader::{compute_dataset_hash, load_ticks, synthetic_series, LoadError, LoadedSeries};
pub use export::{
    export_leaderboard_csv, export_trace_csv, write_manifest, ExportError, RunManifest,
};
pub use grid::{GridConfig, GridError, ParamGrid};
pub use leaderboard::{InsertOutcome, Leaderboard, SweepEntry, DEFAULT_CAPACITY};
pub use sweep::{
    default_worker_count, sweep, sweep_with_progress, SweepError, SweepSnapshot,
    DEFAULT_POLL_INTERVAL,
};
