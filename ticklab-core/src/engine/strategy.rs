//! Strategy state machine — decides an order quantity each tick.
//!
//! The strategy trades mean-reversion around high-spread regimes: after a
//! high-spread stretch ends, it waits a configurable number of ticks, then
//! enters in the direction of the mid-price vs. the short rolling average if
//! the average has moved far enough from its level at the regime exit. It
//! exits when the short average turns against the position by a threshold,
//! and is force-closed the moment the spread widens back out.

use crate::domain::ParameterSet;

/// A tick is "high spread" at or above this quoted spread.
pub const HIGH_SPREAD_THRESHOLD: f64 = 1.3;

/// Fixed unit quantity for every entry.
pub const POSITION_SIZE: i64 = 100;

/// Fixed long rolling-average window, used only for trace output.
pub const LONG_WINDOW: usize = 500;

/// Per-run mutable strategy state.
///
/// Created fresh for every backtest and owned exclusively by that run. The
/// previous-tick spread flag lives here so the caller carries it across
/// ticks explicitly.
#[derive(Debug, Clone)]
pub struct StrategyState {
    in_position: bool,
    position_is_long: bool,
    /// Best short average seen since entry. Only meaningful while in position.
    current_extreme: f64,
    waiting_for_signal: bool,
    high_spread_exit_index: Option<usize>,
    baseline_short_avg_at_exit: f64,
    prev_tick_high_spread: bool,
}

impl Default for StrategyState {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyState {
    pub fn new() -> Self {
        Self {
            in_position: false,
            position_is_long: false,
            current_extreme: 0.0,
            waiting_for_signal: false,
            high_spread_exit_index: None,
            baseline_short_avg_at_exit: 0.0,
            prev_tick_high_spread: false,
        }
    }

    pub fn in_position(&self) -> bool {
        self.in_position
    }

    pub fn waiting_for_signal(&self) -> bool {
        self.waiting_for_signal
    }

    /// Evaluates one tick and returns the desired order quantity.
    ///
    /// `position` is the ledger position before this tick's order is applied.
    /// Checks run in fixed priority order; the forced high-spread close runs
    /// last and overwrites any quantity the earlier checks produced.
    pub fn on_tick(
        &mut self,
        params: &ParameterSet,
        index: usize,
        mid: f64,
        spread: f64,
        short_avg: f64,
        position: i64,
    ) -> i64 {
        let high_spread = spread >= HIGH_SPREAD_THRESHOLD;
        let mut order_quantity = 0i64;

        // 1) Turn exit: track the favorable extreme of the short average and
        //    close once it pulls back by the turn threshold.
        if self.in_position && !short_avg.is_nan() {
            if self.position_is_long {
                if short_avg > self.current_extreme {
                    self.current_extreme = short_avg;
                } else if self.current_extreme - short_avg >= params.ma_turn_threshold {
                    order_quantity = -position;
                    self.clear_position();
                }
            } else if short_avg < self.current_extreme {
                self.current_extreme = short_avg;
            } else if short_avg - self.current_extreme >= params.ma_turn_threshold {
                order_quantity = -position;
                self.clear_position();
            }
        }

        // 2) High-spread regime just ended: remember where, and the short
        //    average at this moment (mid-price while the average is undefined).
        if self.prev_tick_high_spread && !high_spread {
            self.high_spread_exit_index = Some(index.saturating_sub(1));
            self.baseline_short_avg_at_exit = if short_avg.is_nan() { mid } else { short_avg };
            self.waiting_for_signal = true;
        }

        // 3) Entry after the waiting period. The waiting phase ends once the
        //    delta threshold is met, even when mid == short_avg suppresses
        //    the trade itself.
        if self.waiting_for_signal && !high_spread && position == 0 && !short_avg.is_nan() {
            if let Some(exit_index) = self.high_spread_exit_index {
                if index - exit_index >= params.waiting_period {
                    let delta = (short_avg - self.baseline_short_avg_at_exit).abs();
                    if delta >= params.hs_exit_change_threshold {
                        if mid > short_avg {
                            order_quantity = POSITION_SIZE;
                            self.in_position = true;
                            self.position_is_long = true;
                            self.current_extreme = short_avg;
                        } else if mid < short_avg {
                            order_quantity = -POSITION_SIZE;
                            self.in_position = true;
                            self.position_is_long = false;
                            self.current_extreme = short_avg;
                        }
                        self.waiting_for_signal = false;
                    }
                }
            }
        }

        // 4) Forced close on a high-spread tick. Always evaluated last and
        //    wins over whatever the earlier checks decided.
        if high_spread && position != 0 {
            order_quantity = -position;
            self.clear_position();
        }

        self.prev_tick_high_spread = high_spread;
        order_quantity
    }

    fn clear_position(&mut self) {
        self.in_position = false;
        self.position_is_long = false;
        self.current_extreme = 0.0;
    }
}
