//! Parallel parameter sweep — evaluates every grid cell exactly once.
//!
//! Workers claim cells through a lock-free atomic cursor rather than
//! pre-partitioned chunks: individual backtests have near-uniform cost, so
//! claim-by-index keeps all cores busy until the grid drains. Results land
//! in a slot reserved per grid index, under a mutex that is touched once per
//! completed backtest, never per tick.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use ticklab_core::domain::{BacktestResult, ParameterSet, PriceSeries};
use ticklab_core::engine::run_backtest;

use crate::grid::{GridConfig, GridError, ParamGrid};
use crate::leaderboard::{Leaderboard, SweepEntry, DEFAULT_CAPACITY};

/// How often the progress callback fires by default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors detected before any worker is spawned.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("parameter grid contains no valid cells")]
    EmptyGrid,

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Point-in-time view of a running sweep.
///
/// `completed` is monotonically non-decreasing across snapshots. The top
/// list only reflects results that had landed when the snapshot was taken;
/// completeness is only guaranteed for the final leaderboard.
#[derive(Debug, Clone)]
pub struct SweepSnapshot {
    pub completed: usize,
    pub total: usize,
    pub top: Vec<SweepEntry>,
}

/// Worker-thread count matching the hardware, with a small fallback when
/// parallelism cannot be detected.
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(2)
}

/// Runs the full grid around `base` and returns the final leaderboard.
///
/// `worker_count` of 0 means auto-detect. The returned leaderboard is
/// identical for any worker count: results are keyed by grid index, and the
/// ranking breaks PnL ties by that index.
pub fn sweep(
    base: &ParameterSet,
    grid_config: &GridConfig,
    series: &PriceSeries,
    worker_count: usize,
) -> Result<Leaderboard, SweepError> {
    sweep_with_progress(
        base,
        grid_config,
        series,
        worker_count,
        DEFAULT_POLL_INTERVAL,
        |_| {},
    )
}

/// Like [`sweep`], emitting a [`SweepSnapshot`] roughly once per
/// `poll_interval` while workers are running.
///
/// The callback runs on the calling thread; slow callbacks delay snapshots,
/// never the workers.
pub fn sweep_with_progress<F>(
    base: &ParameterSet,
    grid_config: &GridConfig,
    series: &PriceSeries,
    worker_count: usize,
    poll_interval: Duration,
    mut on_progress: F,
) -> Result<Leaderboard, SweepError>
where
    F: FnMut(&SweepSnapshot),
{
    if series.is_empty() {
        return Err(SweepError::EmptySeries);
    }
    let cells = ParamGrid::around(base, grid_config)?.cells();
    if cells.is_empty() {
        return Err(SweepError::EmptyGrid);
    }

    let workers = if worker_count == 0 {
        default_worker_count()
    } else {
        worker_count
    };
    let total = cells.len();
    let next_index = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<BacktestResult>>> = Mutex::new(vec![None; total]);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next_index.fetch_add(1, Ordering::Relaxed);
                if index >= total {
                    break;
                }
                let result = run_backtest(series, &cells[index]);
                {
                    let mut buffer = results.lock().expect("results lock poisoned");
                    buffer[index] = Some(result);
                }
                completed.fetch_add(1, Ordering::Release);
            });
        }

        // Monitor on the calling thread: one snapshot per interval until
        // every cell has reported in.
        let mut last_emit = Instant::now();
        while completed.load(Ordering::Acquire) < total {
            if last_emit.elapsed() >= poll_interval {
                on_progress(&take_snapshot(&results, &completed, total));
                last_emit = Instant::now();
            }
            thread::sleep(Duration::from_millis(10));
        }
    });

    let buffer = results.into_inner().expect("results lock poisoned");
    Ok(rank(buffer))
}

/// Ranking pass: fold completed results into a bounded leaderboard, keyed
/// by grid index so the tie-break survives any completion order.
fn rank(buffer: Vec<Option<BacktestResult>>) -> Leaderboard {
    let mut board = Leaderboard::new(DEFAULT_CAPACITY);
    for (index, result) in buffer.into_iter().enumerate() {
        if let Some(result) = result {
            board.insert(index, result);
        }
    }
    board
}

fn take_snapshot(
    results: &Mutex<Vec<Option<BacktestResult>>>,
    completed: &AtomicUsize,
    total: usize,
) -> SweepSnapshot {
    let buffer = results.lock().expect("results lock poisoned").clone();
    SweepSnapshot {
        completed: completed.load(Ordering::Acquire),
        total,
        top: rank(buffer).entries().to_vec(),
    }
}
