//! The backtest loop: drives one full simulation over a price series.

use crate::domain::{BacktestResult, ParameterSet, PriceSeries};
use crate::engine::ledger::Ledger;
use crate::engine::rolling::rolling_mean;
use crate::engine::strategy::{StrategyState, HIGH_SPREAD_THRESHOLD, LONG_WINDOW};
use crate::engine::trace::{RunTrace, TraceRow};

/// Runs one simulation of `params` over `series`.
///
/// Pure with respect to its inputs: all mutable state is stack-local, which
/// is what makes one call per grid cell safe to run concurrently. An empty
/// series yields a zero result rather than an error, so a single bad input
/// cannot sink a whole sweep.
pub fn run_backtest(series: &PriceSeries, params: &ParameterSet) -> BacktestResult {
    run(series, params, None)
}

/// Like [`run_backtest`], but also records a per-tick [`RunTrace`].
///
/// The traced run returns exactly the same result as the plain one; the
/// trace exists for export and inspection of a single interesting run, not
/// for the sweep hot path.
pub fn run_backtest_traced(
    series: &PriceSeries,
    params: &ParameterSet,
) -> (BacktestResult, RunTrace) {
    let mut trace = RunTrace::with_capacity(series.len());
    let result = run(series, params, Some(&mut trace));
    (result, trace)
}

fn run(
    series: &PriceSeries,
    params: &ParameterSet,
    mut trace: Option<&mut RunTrace>,
) -> BacktestResult {
    let mut history: Vec<f64> = Vec::with_capacity(series.len());
    let mut state = StrategyState::new();
    let mut ledger = Ledger::new();

    for (index, tick) in series.iter().enumerate() {
        let mid = tick.mid();
        let spread = tick.spread();

        // The window includes the current tick: push first, then query.
        history.push(mid);
        let short_avg = rolling_mean(&history, params.short_window);

        let order = state.on_tick(params, index, mid, spread, short_avg, ledger.position());
        ledger.apply(order, tick.bid, tick.ask);

        if let Some(trace) = trace.as_deref_mut() {
            let long_avg = rolling_mean(&history, LONG_WINDOW);
            trace.push(TraceRow {
                index,
                bid: tick.bid,
                ask: tick.ask,
                mid,
                spread,
                short_avg: if short_avg.is_nan() { mid } else { short_avg },
                long_avg: if long_avg.is_nan() { mid } else { long_avg },
                position: ledger.position(),
                high_spread: spread >= HIGH_SPREAD_THRESHOLD,
            });
        }
    }

    // Force-close whatever is left against the final quote.
    if let Some(last) = series.last() {
        ledger.flatten(last.bid, last.ask);
    }

    BacktestResult {
        params: *params,
        pnl: ledger.cash(),
        total_fees: ledger.total_fees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSample;

    fn params() -> ParameterSet {
        ParameterSet {
            short_window: 10,
            waiting_period: 20,
            hs_exit_change_threshold: 0.2,
            ma_turn_threshold: 0.9,
        }
    }

    #[test]
    fn empty_series_yields_zero_result() {
        let series = PriceSeries::default();
        let result = run_backtest(&series, &params());
        assert_eq!(result.pnl, 0.0);
        assert_eq!(result.total_fees, 0.0);
    }

    #[test]
    fn flat_zero_spread_series_never_trades() {
        let series: PriceSeries = std::iter::repeat(PriceSample::new(1.0, 1.0))
            .take(600)
            .collect();
        let result = run_backtest(&series, &params());
        assert_eq!(result.pnl, 0.0);
        assert_eq!(result.total_fees, 0.0);
    }

    #[test]
    fn traced_run_matches_plain_run() {
        // High-spread stretch, then a rising low-spread stretch: trades fire.
        let mut samples = Vec::new();
        for _ in 0..50 {
            samples.push(PriceSample::new(99.3, 100.7));
        }
        for i in 0..150 {
            let mid = 100.0 + i as f64 * 0.05;
            samples.push(PriceSample::new(mid - 0.5, mid + 0.5));
        }
        let series = PriceSeries::new(samples);
        let p = ParameterSet {
            short_window: 5,
            waiting_period: 10,
            hs_exit_change_threshold: 0.1,
            ma_turn_threshold: 0.5,
        };

        let plain = run_backtest(&series, &p);
        let (traced, trace) = run_backtest_traced(&series, &p);
        assert_eq!(plain, traced);
        assert_eq!(trace.len(), series.len());
    }

    #[test]
    fn trace_positions_stay_within_limit() {
        let mut samples = Vec::new();
        for _ in 0..30 {
            samples.push(PriceSample::new(99.3, 100.7));
        }
        for i in 0..200 {
            let mid = 100.0 + i as f64 * 0.1;
            samples.push(PriceSample::new(mid - 0.5, mid + 0.5));
        }
        let series = PriceSeries::new(samples);
        let p = ParameterSet {
            short_window: 5,
            waiting_period: 5,
            hs_exit_change_threshold: 0.1,
            ma_turn_threshold: 2.0,
        };

        let (_, trace) = run_backtest_traced(&series, &p);
        assert!(trace.rows().iter().all(|r| r.position.abs() <= 100));
    }
}
