//! ParameterSet — the four tunable knobs of the strategy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parameter validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("short_window must be positive")]
    ZeroShortWindow,

    #[error("waiting_period must be positive")]
    ZeroWaitingPeriod,

    #[error("hs_exit_change_threshold must be positive, got {0}")]
    NonPositiveExitThreshold(f64),

    #[error("ma_turn_threshold must be positive, got {0}")]
    NonPositiveTurnThreshold(f64),
}

/// One point in the strategy's parameter space.
///
/// Value type: each grid cell gets its own copy, so parameter sets cross
/// thread boundaries freely without sharing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Length of the short rolling-average window, in ticks.
    pub short_window: usize,
    /// Minimum ticks after a high-spread exit before an entry is considered.
    pub waiting_period: usize,
    /// Minimum |short_avg - baseline| required to enter after the wait.
    pub hs_exit_change_threshold: f64,
    /// Minimum pullback from the position's favorable extreme that exits.
    pub ma_turn_threshold: f64,
}

impl ParameterSet {
    /// Rejects parameter sets that can never drive a meaningful run.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.short_window == 0 {
            return Err(ParamError::ZeroShortWindow);
        }
        if self.waiting_period == 0 {
            return Err(ParamError::ZeroWaitingPeriod);
        }
        if !(self.hs_exit_change_threshold > 0.0) {
            return Err(ParamError::NonPositiveExitThreshold(
                self.hs_exit_change_threshold,
            ));
        }
        if !(self.ma_turn_threshold > 0.0) {
            return Err(ParamError::NonPositiveTurnThreshold(self.ma_turn_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ParameterSet {
        ParameterSet {
            short_window: 80,
            waiting_period: 80,
            hs_exit_change_threshold: 0.2,
            ma_turn_threshold: 0.9,
        }
    }

    #[test]
    fn valid_params_pass() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn zero_window_rejected() {
        let p = ParameterSet {
            short_window: 0,
            ..base()
        };
        assert_eq!(p.validate(), Err(ParamError::ZeroShortWindow));
    }

    #[test]
    fn zero_waiting_period_rejected() {
        let p = ParameterSet {
            waiting_period: 0,
            ..base()
        };
        assert_eq!(p.validate(), Err(ParamError::ZeroWaitingPeriod));
    }

    #[test]
    fn non_positive_thresholds_rejected() {
        let p = ParameterSet {
            hs_exit_change_threshold: 0.0,
            ..base()
        };
        assert!(matches!(
            p.validate(),
            Err(ParamError::NonPositiveExitThreshold(_))
        ));

        let p = ParameterSet {
            ma_turn_threshold: -0.1,
            ..base()
        };
        assert!(matches!(
            p.validate(),
            Err(ParamError::NonPositiveTurnThreshold(_))
        ));
    }

    #[test]
    fn nan_threshold_rejected() {
        let p = ParameterSet {
            hs_exit_change_threshold: f64::NAN,
            ..base()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn serialization_roundtrip() {
        let p = base();
        let json = serde_json::to_string(&p).unwrap();
        let deser: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deser);
    }
}
