use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close for a ticker. Series are ascending by date with no
/// duplicate dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Latest fundamentals for one ticker. Vendor feeds drop fields routinely,
/// so every metric is independently nullable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalRow {
    pub symbol: String,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub ps_ratio: Option<f64>,
    pub ev_ebitda: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_growth_3y: Option<f64>,
    pub eps_growth_3y: Option<f64>,
}

impl FundamentalRow {
    /// Whether the row contributes at least one valuation metric.
    pub fn has_valuation_metric(&self) -> bool {
        self.pe_ratio.is_some()
            || self.pb_ratio.is_some()
            || self.ps_ratio.is_some()
            || self.ev_ebitda.is_some()
    }
}

/// One historical fundamentals observation for a ticker, ascending by as_of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricHistoryRow {
    pub as_of: NaiveDate,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub ps_ratio: Option<f64>,
    pub ev_ebitda: Option<f64>,
}

/// Outcome counts for a per-symbol batch loop. Partial completion is a
/// success mode: failures are counted, not propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.errored
    }
}
