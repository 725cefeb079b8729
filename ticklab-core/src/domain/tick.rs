//! PriceSample — the fundamental market data unit.

use serde::{Deserialize, Serialize};

/// One bid/ask quote for the traded instrument.
///
/// Samples are immutable once loaded; the backtest loop only ever reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub bid: f64,
    pub ask: f64,
}

impl PriceSample {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    /// Mid-price: (bid + ask) / 2.
    pub fn mid(&self) -> f64 {
        0.5 * (self.bid + self.ask)
    }

    /// Quoted spread: ask - bid.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Basic quote sanity check: finite, positive prices, ask not below bid.
    pub fn is_sane(&self) -> bool {
        self.bid.is_finite()
            && self.ask.is_finite()
            && self.bid > 0.0
            && self.ask > 0.0
            && self.ask >= self.bid
    }
}
