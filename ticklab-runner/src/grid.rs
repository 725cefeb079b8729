//! Parameter grid — fuzzed values around a base configuration.
//!
//! Each of the four parameter dimensions gets a list of candidate values by
//! scaling the base value across a percent range, and the grid is the
//! Cartesian product of the four lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ticklab_core::domain::ParameterSet;

/// Floor for fuzzed float parameters that would otherwise scale to zero or
/// below.
const MIN_POSITIVE: f64 = 1e-6;

/// Errors from grid construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("pct_step must be positive")]
    ZeroStep,
}

/// Percent range and step of the fuzz around the base parameter set.
///
/// Defaults to ±10% in 1% steps, giving 21 candidate values per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub pct_range: u32,
    pub pct_step: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            pct_range: 10,
            pct_step: 1,
        }
    }
}

/// The per-dimension candidate values of one sweep.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    short_windows: Vec<usize>,
    waiting_periods: Vec<usize>,
    exit_thresholds: Vec<f64>,
    turn_thresholds: Vec<f64>,
}

impl ParamGrid {
    /// Builds the grid by fuzzing each dimension of `base` independently.
    pub fn around(base: &ParameterSet, config: &GridConfig) -> Result<Self, GridError> {
        if config.pct_step == 0 {
            return Err(GridError::ZeroStep);
        }
        Ok(Self {
            short_windows: fuzz_int(base.short_window, config),
            waiting_periods: fuzz_int(base.waiting_period, config),
            exit_thresholds: fuzz_float(base.hs_exit_change_threshold, config),
            turn_thresholds: fuzz_float(base.ma_turn_threshold, config),
        })
    }

    /// Total number of cells before validity filtering.
    pub fn size(&self) -> usize {
        self.short_windows.len()
            * self.waiting_periods.len()
            * self.exit_thresholds.len()
            * self.turn_thresholds.len()
    }

    /// Materializes every valid cell, in lexicographic dimension order.
    ///
    /// Cells that fail [`ParameterSet::validate`] are dropped here, before
    /// any scheduling happens.
    pub fn cells(&self) -> Vec<ParameterSet> {
        let mut cells = Vec::with_capacity(self.size());
        for &short_window in &self.short_windows {
            for &waiting_period in &self.waiting_periods {
                for &hs_exit_change_threshold in &self.exit_thresholds {
                    for &ma_turn_threshold in &self.turn_thresholds {
                        let params = ParameterSet {
                            short_window,
                            waiting_period,
                            hs_exit_change_threshold,
                            ma_turn_threshold,
                        };
                        if params.validate().is_ok() {
                            cells.push(params);
                        }
                    }
                }
            }
        }
        cells
    }

    pub fn short_windows(&self) -> &[usize] {
        &self.short_windows
    }

    pub fn waiting_periods(&self) -> &[usize] {
        &self.waiting_periods
    }

    pub fn exit_thresholds(&self) -> &[f64] {
        &self.exit_thresholds
    }

    pub fn turn_thresholds(&self) -> &[f64] {
        &self.turn_thresholds
    }
}

/// Scale factors (100 + i)/100 for i in [-range, +range] stepping by `pct_step`.
fn factors(config: &GridConfig) -> Vec<f64> {
    let range = config.pct_range as i64;
    (-range..=range)
        .step_by(config.pct_step as usize)
        .map(|i| (100 + i) as f64 / 100.0)
        .collect()
}

/// Integer dimension: round to nearest, clamp below 1, sort ascending.
fn fuzz_int(base: usize, config: &GridConfig) -> Vec<usize> {
    let mut values: Vec<usize> = factors(config)
        .into_iter()
        .map(|factor| {
            let scaled = (base as f64 * factor).round() as i64;
            scaled.max(1) as usize
        })
        .collect();
    values.sort_unstable();
    values
}

/// Float dimension: floor-clamp to a small positive epsilon, sort ascending.
fn fuzz_float(base: f64, config: &GridConfig) -> Vec<f64> {
    let mut values: Vec<f64> = factors(config)
        .into_iter()
        .map(|factor| {
            let scaled = base * factor;
            if scaled <= 0.0 {
                MIN_POSITIVE
            } else {
                scaled
            }
        })
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).expect("fuzzed values are finite"));
    values
}
