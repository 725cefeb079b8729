//! TickLab Core — tick-level strategy simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (price samples, series, parameter sets, results)
//! - Windowed rolling-mean query over a growing mid-price history
//! - Strategy state machine (high-spread regime exits, waiting-period
//!   entries, turn exits, forced closes)
//! - Position ledger with limit enforcement and fee accounting
//! - Tick loop with a final forced flatten, in plain and traced variants

pub mod domain;
pub mod engine;
