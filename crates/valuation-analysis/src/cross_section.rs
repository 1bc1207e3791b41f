//! Cross-sectional valuation z-scores: each ticker's multiples measured
//! against the whole universe's distribution at one point in time.

use scoring_core::{FundamentalRow, MetricStats};
use serde::{Deserialize, Serialize};

use crate::positive;

/// Below this many contributing tickers the distribution is too thin to
/// score against and the run writes nothing.
pub const MIN_UNIVERSE_SIZE: usize = 10;

/// Per-ticker valuation z-scores. Shared by the cross-sectional latest rows
/// and the time-series rows; every field is independently nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationZScores {
    pub pe_zscore: Option<f64>,
    pub pb_zscore: Option<f64>,
    pub ps_zscore: Option<f64>,
    pub ev_ebitda_zscore: Option<f64>,
}

/// Distribution stats per metric, logged after a run for inspection.
/// A metric with no positive observations has no stats.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniverseStats {
    pub pe: Option<MetricStats>,
    pub pb: Option<MetricStats>,
    pub ps: Option<MetricStats>,
    pub ev_ebitda: Option<MetricStats>,
}

#[derive(Debug, Clone)]
pub struct CrossSectionResult {
    pub scores: Vec<(String, ValuationZScores)>,
    pub stats: UniverseStats,
}

/// Score every contributing ticker against the universe distribution.
///
/// Only rows carrying at least one valuation metric count toward the
/// universe. Per metric, the distribution is built from strictly positive
/// values; tickers with a missing or non-positive value still get a result
/// row, with that metric left null. Returns `None` when fewer than
/// [`MIN_UNIVERSE_SIZE`] tickers contribute, which callers should surface
/// as a warning rather than an error.
pub fn score_universe(rows: &[FundamentalRow]) -> Option<CrossSectionResult> {
    let contributing: Vec<&FundamentalRow> =
        rows.iter().filter(|r| r.has_valuation_metric()).collect();

    if contributing.len() < MIN_UNIVERSE_SIZE {
        return None;
    }

    let collect = |field: fn(&FundamentalRow) -> Option<f64>| -> Vec<f64> {
        contributing.iter().filter_map(|&r| positive(field(r))).collect()
    };

    let stats = UniverseStats {
        pe: MetricStats::from_values(&collect(|r| r.pe_ratio)),
        pb: MetricStats::from_values(&collect(|r| r.pb_ratio)),
        ps: MetricStats::from_values(&collect(|r| r.ps_ratio)),
        ev_ebitda: MetricStats::from_values(&collect(|r| r.ev_ebitda)),
    };

    let scores = contributing
        .iter()
        .map(|r| {
            let z = |stats: Option<MetricStats>, value: Option<f64>| {
                stats.and_then(|s| s.zscore(positive(value)))
            };
            let scores = ValuationZScores {
                pe_zscore: z(stats.pe, r.pe_ratio),
                pb_zscore: z(stats.pb, r.pb_ratio),
                ps_zscore: z(stats.ps, r.ps_ratio),
                ev_ebitda_zscore: z(stats.ev_ebitda, r.ev_ebitda),
            };
            (r.symbol.clone(), scores)
        })
        .collect();

    Some(CrossSectionResult { scores, stats })
}
