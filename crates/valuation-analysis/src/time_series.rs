//! Time-series valuation z-scores: each historical observation measured
//! against the ticker's own history rather than the cross-section.

use chrono::NaiveDate;
use scoring_core::{MetricHistoryRow, MetricStats};
use serde::{Deserialize, Serialize};

use crate::{positive, ValuationZScores};

/// A ticker needs this much history before self-referential scoring says
/// anything; below it the ticker is skipped for the run.
pub const MIN_HISTORY_ROWS: usize = 8;

/// Each individual metric additionally needs this many valid (positive)
/// observations to earn a mean/stddev.
pub const MIN_METRIC_OBSERVATIONS: usize = 5;

/// One scored history row, upserted by (symbol, as_of). Recomputation may
/// shift existing rows as more history accumulates, so updates in place are
/// expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesZScoreRow {
    pub as_of: NaiveDate,
    pub scores: ValuationZScores,
}

/// Score one ticker's metric history against itself.
///
/// Returns `None` when the ticker has fewer than [`MIN_HISTORY_ROWS`] rows
/// (skip, not error). Otherwise every input row yields an output row; a
/// metric's z-scores are null throughout when it lacks
/// [`MIN_METRIC_OBSERVATIONS`] positive values, and null for a single row
/// when that row's value is missing or non-positive.
pub fn score_history(rows: &[MetricHistoryRow]) -> Option<Vec<TimeSeriesZScoreRow>> {
    if rows.len() < MIN_HISTORY_ROWS {
        return None;
    }

    let stats_for = |field: fn(&MetricHistoryRow) -> Option<f64>| -> Option<MetricStats> {
        let values: Vec<f64> = rows.iter().filter_map(|r| positive(field(r))).collect();
        if values.len() < MIN_METRIC_OBSERVATIONS {
            return None;
        }
        MetricStats::from_values(&values)
    };

    let pe_stats = stats_for(|r| r.pe_ratio);
    let pb_stats = stats_for(|r| r.pb_ratio);
    let ps_stats = stats_for(|r| r.ps_ratio);
    let ev_stats = stats_for(|r| r.ev_ebitda);

    let scored = rows
        .iter()
        .map(|r| {
            let z = |stats: Option<MetricStats>, value: Option<f64>| {
                stats.and_then(|s| s.zscore(positive(value)))
            };
            TimeSeriesZScoreRow {
                as_of: r.as_of,
                scores: ValuationZScores {
                    pe_zscore: z(pe_stats, r.pe_ratio),
                    pb_zscore: z(pb_stats, r.pb_ratio),
                    ps_zscore: z(ps_stats, r.ps_ratio),
                    ev_ebitda_zscore: z(ev_stats, r.ev_ebitda),
                },
            }
        })
        .collect();

    Some(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    fn history(pe: &[Option<f64>], pb: &[Option<f64>]) -> Vec<MetricHistoryRow> {
        assert_eq!(pe.len(), pb.len());
        pe.iter()
            .zip(pb)
            .enumerate()
            .map(|(i, (&pe, &pb))| MetricHistoryRow {
                as_of: day(i as u32 + 1),
                pe_ratio: pe,
                pb_ratio: pb,
                ps_ratio: None,
                ev_ebitda: None,
            })
            .collect()
    }

    #[test]
    fn seven_rows_is_skipped_entirely() {
        let pe = vec![Some(10.0); 7];
        let rows = history(&pe, &vec![Some(2.0); 7]);
        assert!(score_history(&rows).is_none());
    }

    #[test]
    fn metric_below_observation_threshold_stays_null() {
        // 8 rows but only 4 positive PE values: pe z-scores null everywhere
        // while PB (8 valid, varying) still scores.
        let pe = vec![
            Some(10.0),
            Some(12.0),
            Some(-1.0),
            None,
            Some(14.0),
            None,
            Some(16.0),
            None,
        ];
        let pb: Vec<Option<f64>> = (1..=8).map(|i| Some(i as f64)).collect();
        let scored = score_history(&history(&pe, &pb)).unwrap();

        assert_eq!(scored.len(), 8);
        assert!(scored.iter().all(|r| r.scores.pe_zscore.is_none()));
        assert!(scored.iter().all(|r| r.scores.pb_zscore.is_some()));
    }

    #[test]
    fn every_row_is_scored_against_own_history() {
        let pe: Vec<Option<f64>> = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]
            .into_iter()
            .map(Some)
            .collect();
        let scored = score_history(&history(&pe, &vec![None; 8])).unwrap();

        // mean 45; the row at the mean has z 0, symmetry holds around it.
        let z: Vec<f64> = scored.iter().map(|r| r.scores.pe_zscore.unwrap()).collect();
        assert!((z[0] + z[7]).abs() < 1e-9);
        assert!(z[0] < 0.0 && z[7] > 0.0);
        assert!(scored.iter().all(|r| r.scores.pb_zscore.is_none()));
    }

    #[test]
    fn non_positive_row_value_is_null_without_breaking_others() {
        let mut pe: Vec<Option<f64>> = (1..=8).map(|i| Some(10.0 * i as f64)).collect();
        pe[3] = Some(-4.0);
        let scored = score_history(&history(&pe, &vec![None; 8])).unwrap();

        assert_eq!(scored[3].scores.pe_zscore, None);
        assert!(scored[0].scores.pe_zscore.is_some());
        assert!(scored[7].scores.pe_zscore.is_some());
    }

    #[test]
    fn constant_history_is_degenerate() {
        let pe = vec![Some(15.0); 8];
        let scored = score_history(&history(&pe, &vec![None; 8])).unwrap();
        assert!(scored.iter().all(|r| r.scores.pe_zscore.is_none()));
    }

    #[test]
    fn dates_are_preserved_in_order() {
        let pe: Vec<Option<f64>> = (1..=9).map(|i| Some(i as f64)).collect();
        let scored = score_history(&history(&pe, &vec![None; 9])).unwrap();
        let dates: Vec<NaiveDate> = scored.iter().map(|r| r.as_of).collect();
        assert_eq!(dates, (1..=9).map(day).collect::<Vec<_>>());
    }
}
