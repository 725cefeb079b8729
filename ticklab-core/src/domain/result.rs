//! BacktestResult — the output of one simulation run.

use serde::{Deserialize, Serialize};

use crate::domain::params::ParameterSet;

/// Realized outcome of running one parameter set over one price series.
///
/// Immutable after creation; cheap to copy into the sweep's shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub params: ParameterSet,
    /// Final realized cash after the end-of-series flatten.
    pub pnl: f64,
    /// Sum of all fees paid, including the final flatten.
    pub total_fees: f64,
}
