use serde::{Deserialize, Serialize};

/// The ten scoring weights, each independently overridable through its
/// environment variable. Weights have safe defaults; unlike connectivity,
/// a missing weight never aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Valuation component weights (PE, PB, PS, EV/EBITDA).
    pub val_pe: f64,
    pub val_pb: f64,
    pub val_ps: f64,
    pub val_ev: f64,
    /// Growth component weights (revenue, EPS).
    pub growth_rev: f64,
    pub growth_eps: f64,
    /// Composite category weights.
    pub comp_valuation: f64,
    pub comp_profitability: f64,
    pub comp_growth: f64,
    pub comp_risk: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            val_pe: 1.0,
            val_pb: 1.0,
            val_ps: 1.0,
            val_ev: 1.0,
            growth_rev: 0.6,
            growth_eps: 0.4,
            comp_valuation: 0.4,
            comp_profitability: 0.3,
            comp_growth: 0.2,
            comp_risk: 0.1,
        }
    }
}

fn env_weight(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl WeightConfig {
    /// Read weights from the environment, falling back to the defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            val_pe: env_weight("VAL_PE_W", d.val_pe),
            val_pb: env_weight("VAL_PB_W", d.val_pb),
            val_ps: env_weight("VAL_PS_W", d.val_ps),
            val_ev: env_weight("VAL_EV_W", d.val_ev),
            growth_rev: env_weight("GROWTH_REV_W", d.growth_rev),
            growth_eps: env_weight("GROWTH_EPS_W", d.growth_eps),
            comp_valuation: env_weight("COMP_W_VAL", d.comp_valuation),
            comp_profitability: env_weight("COMP_W_PROF", d.comp_profitability),
            comp_growth: env_weight("COMP_W_GROW", d.comp_growth),
            comp_risk: env_weight("COMP_W_RISK", d.comp_risk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_documented_values() {
        let w = WeightConfig::default();
        assert_eq!(
            (w.val_pe, w.val_pb, w.val_ps, w.val_ev),
            (1.0, 1.0, 1.0, 1.0)
        );
        assert_eq!((w.growth_rev, w.growth_eps), (0.6, 0.4));
        assert_eq!(
            (w.comp_valuation, w.comp_profitability, w.comp_growth, w.comp_risk),
            (0.4, 0.3, 0.2, 0.1)
        );
    }

    #[test]
    fn category_weights_sum_to_one() {
        let w = WeightConfig::default();
        let sum = w.comp_valuation + w.comp_profitability + w.comp_growth + w.comp_risk;
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
