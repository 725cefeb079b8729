//! Position ledger — limit enforcement and fee-inclusive cash accounting.

/// Proportional fee charged on every fill's notional.
pub const FEES_RATE: f64 = 0.002;

/// Maximum absolute position the ledger will ever hold.
pub const POSITION_LIMIT: i64 = 100;

/// Per-run cash, position, and fee tracker.
///
/// Orders that would breach the position limit are discarded whole; there is
/// no partial execution.
#[derive(Debug, Clone)]
pub struct Ledger {
    position: i64,
    cash: f64,
    total_fees: f64,
    fees_rate: f64,
    limit: i64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_costs(FEES_RATE, POSITION_LIMIT)
    }

    pub fn with_costs(fees_rate: f64, limit: i64) -> Self {
        Self {
            position: 0,
            cash: 0.0,
            total_fees: 0.0,
            fees_rate,
            limit,
        }
    }

    /// Applies an order and returns the filled quantity.
    ///
    /// A positive quantity buys at `ask`, a negative one sells at `bid`.
    /// Returns 0 when the order would push `|position|` past the limit.
    pub fn apply(&mut self, order_quantity: i64, bid: f64, ask: f64) -> i64 {
        let mut quantity = order_quantity;
        if quantity > 0 && self.position + quantity > self.limit {
            quantity = 0;
        }
        if quantity < 0 && self.position + quantity < -self.limit {
            quantity = 0;
        }

        if quantity > 0 {
            let notional = ask * quantity as f64;
            self.cash -= notional * (1.0 + self.fees_rate);
            self.total_fees += notional * self.fees_rate;
        } else if quantity < 0 {
            let notional = bid * (-quantity) as f64;
            self.cash += notional * (1.0 - self.fees_rate);
            self.total_fees += notional * self.fees_rate;
        }

        self.position += quantity;
        quantity
    }

    /// Closes any residual position against the given quote.
    pub fn flatten(&mut self, bid: f64, ask: f64) -> i64 {
        self.apply(-self.position, bid, ask)
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn total_fees(&self) -> f64 {
        self.total_fees
    }
}
