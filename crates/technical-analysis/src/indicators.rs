use serde::{Deserialize, Serialize};

pub const RSI_DEFAULT_PERIOD: usize = 14;

/// Simple Moving Average of the last `period` values.
///
/// Returns `None` when fewer than `period` values exist; too little history
/// is a missing signal, not an error.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let slice = &values[values.len() - period..];
    Some(slice.iter().sum::<f64>() / period as f64)
}

/// Exponential Moving Average over the last `period` values.
///
/// Seeded with the value `period` positions from the end, then smoothed
/// forward to the most recent value with k = 2/(period + 1).
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let start = values.len() - period;
    let mut ema_prev = values[start];
    for &value in &values[start + 1..] {
        ema_prev = value * k + ema_prev * (1.0 - k);
    }
    Some(ema_prev)
}

/// Relative Strength Index over the last `period` consecutive differences.
///
/// A zero average loss means maximal strength, reported as 100 rather than
/// dividing by zero. Needs `period + 1` values for `period` differences.
pub fn rsi(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period + 1 {
        return None;
    }
    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in values.len() - period..values.len() {
        let diff = values[i] - values[i - 1];
        if diff >= 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }
    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// The per-ticker indicator bundle persisted to `analytics_latest`.
/// Each field is independently nullable: a short series can still yield
/// sma20 while sma50 stays empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub ema12: Option<f64>,
    pub rsi14: Option<f64>,
}

impl IndicatorSet {
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            sma20: sma(closes, 20),
            sma50: sma(closes, 50),
            ema12: ema(closes, 12),
            rsi14: rsi(closes, RSI_DEFAULT_PERIOD),
        }
    }
}
