//! Simulation engine — rolling mean, strategy state machine, ledger, and
//! the tick-by-tick backtest loop.
//!
//! One backtest is a deterministic state machine: a price series and a
//! parameter set in, a realized PnL and fee total out. Everything here is
//! single-threaded and allocation-light; parallelism lives one crate up in
//! the sweep scheduler, which simply calls [`run_backtest`] once per cell.

pub mod ledger;
pub mod loop_runner;
pub mod rolling;
pub mod strategy;
pub mod trace;

pub use ledger::{Ledger, FEES_RATE, POSITION_LIMIT};
pub use loop_runner::{run_backtest, run_backtest_traced};
pub use rolling::rolling_mean;
pub use strategy::{StrategyState, HIGH_SPREAD_THRESHOLD, LONG_WINDOW, POSITION_SIZE};
pub use trace::{RunTrace, TraceRow};
