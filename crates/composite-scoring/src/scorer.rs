//! Composite scoring: four normalized sub-scores blended into one ranking
//! figure per ticker.

use serde::{Deserialize, Serialize};
use valuation_analysis::ValuationZScores;

use crate::WeightConfig;

/// The per-ticker composite record upserted into `composite_scores_latest`.
/// Sub-scores live in [-1, 1]; the total is their weighted sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub valuation_score: f64,
    pub profitability_score: f64,
    pub growth_score: f64,
    pub risk_score: f64,
    pub total_score: f64,
}

/// Fundamental inputs for one ticker's composite score, all independently
/// nullable. Growth figures are fractional 3-year CAGRs; ROE is a
/// percentage number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeInputs {
    pub roe: Option<f64>,
    pub revenue_growth_3y: Option<f64>,
    pub eps_growth_3y: Option<f64>,
    pub beta: Option<f64>,
}

/// Weighted average over the available components, with weights
/// renormalized to whatever is present. `None` when nothing is available.
///
/// This is the one place the null-skipping/renormalization policy lives;
/// both the valuation and growth sub-scores go through it.
pub fn weighted_average_available(pairs: &[(Option<f64>, f64)]) -> Option<f64> {
    let mut sum = 0.0;
    let mut weight_sum = 0.0;
    for &(value, weight) in pairs {
        if let Some(v) = value {
            sum += v * weight;
            weight_sum += weight;
        }
    }
    if weight_sum == 0.0 {
        return None;
    }
    Some(sum / weight_sum)
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Compute one ticker's composite score.
///
/// Missing inputs never produce a missing score: an absent category scores
/// a real 0. At the sub-score level that zero is "absence of signal is
/// neutral"; at the total it deliberately weighs in as-is instead of
/// renormalizing the category weights, so thin data drags the total
/// slightly toward zero. Pure function of inputs + weights.
pub fn score(
    zscores: Option<&ValuationZScores>,
    inputs: &CompositeInputs,
    weights: &WeightConfig,
) -> CompositeScore {
    // Lower (more negative) z means more undervalued, so z-scores enter
    // negated: cheap relative to the universe scores high.
    let valuation_score = zscores
        .and_then(|z| {
            weighted_average_available(&[
                (z.pe_zscore.map(|v| -v), weights.val_pe),
                (z.pb_zscore.map(|v| -v), weights.val_pb),
                (z.ps_zscore.map(|v| -v), weights.val_ps),
                (z.ev_ebitda_zscore.map(|v| -v), weights.val_ev),
            ])
        })
        .unwrap_or(0.0);

    let profitability_score = clamp_unit(inputs.roe.map(|roe| roe / 100.0).unwrap_or(0.0));

    let growth_score = clamp_unit(
        weighted_average_available(&[
            (inputs.revenue_growth_3y, weights.growth_rev),
            (inputs.eps_growth_3y, weights.growth_eps),
        ])
        .unwrap_or(0.0),
    );

    // Lower beta is better: invert and scale, clamped.
    let risk_score = clamp_unit(inputs.beta.map(|beta| -beta / 10.0).unwrap_or(0.0));

    let total_score = valuation_score * weights.comp_valuation
        + profitability_score * weights.comp_profitability
        + growth_score * weights.comp_growth
        + risk_score * weights.comp_risk;

    CompositeScore {
        valuation_score,
        profitability_score,
        growth_score,
        risk_score,
        total_score,
    }
}
