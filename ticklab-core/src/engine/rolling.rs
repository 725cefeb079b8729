//! Windowed-average query over a growing mid-price history.

/// Arithmetic mean of the last `window` elements of `history`, or NaN while
/// fewer than `window` elements exist.
///
/// Recomputed by full summation on every call. The O(window) per-query cost
/// is intentional: per-run cost stays flat and the sweep spreads it across
/// cores instead.
pub fn rolling_mean(history: &[f64], window: usize) -> f64 {
    if window == 0 || history.len() < window {
        return f64::NAN;
    }
    let tail = &history[history.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}
