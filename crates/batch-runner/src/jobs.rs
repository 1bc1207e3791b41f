//! The four scoring jobs. Each job is a batch over symbols where partial
//! completion is a success mode: per-symbol failures are counted and
//! logged, never propagated. Only configuration/connection problems reach
//! the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cache::AnalyticsCache;
use composite_scoring::WeightConfig;
use scoring_core::{AnalyticsError, BatchReport};
use storage::Store;
use technical_analysis::IndicatorSet;
use tokio::sync::Semaphore;

/// Compute SMA/EMA/RSI for every active ticker and upsert
/// `analytics_latest`. Symbols are independent, so this job fans out with
/// bounded concurrency; each task owns its symbol's read, compute, and
/// write.
pub async fn run_indicators(
    store: &Store,
    analytics_cache: &AnalyticsCache,
    concurrency: usize,
) -> Result<BatchReport, AnalyticsError> {
    let symbols = store.active_symbols().await?;
    let total = symbols.len();
    tracing::info!("indicators: {} symbols, concurrency {}", total, concurrency);

    let processed = Arc::new(AtomicUsize::new(0));
    let skipped = Arc::new(AtomicUsize::new(0));
    let errored = Arc::new(AtomicUsize::new(0));
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let mut handles = Vec::with_capacity(total);

    for symbol in symbols {
        let store = store.clone();
        let analytics_cache = analytics_cache.clone();
        let processed = Arc::clone(&processed);
        let skipped = Arc::clone(&skipped);
        let errored = Arc::clone(&errored);
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.expect("semaphore closed");

            match process_symbol_indicators(&store, &analytics_cache, &symbol).await {
                Ok(true) => {
                    processed.fetch_add(1, Ordering::Relaxed);
                }
                Ok(false) => {
                    tracing::debug!("{}: no price history, skipped", symbol);
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!("{}: indicator run failed: {}", symbol, e);
                    errored.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        if handle.await.is_err() {
            errored.fetch_add(1, Ordering::Relaxed);
        }
    }

    Ok(BatchReport {
        processed: processed.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
        errored: errored.load(Ordering::Relaxed),
    })
}

/// Returns Ok(false) when the symbol has no price history to score.
async fn process_symbol_indicators(
    store: &Store,
    analytics_cache: &AnalyticsCache,
    symbol: &str,
) -> Result<bool, AnalyticsError> {
    let series = store.price_series(symbol).await?;
    if series.is_empty() {
        return Ok(false);
    }

    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let indicators = IndicatorSet::from_closes(&closes);
    store.upsert_indicators(symbol, &indicators).await?;
    analytics_cache.set_indicators(symbol, &indicators).await;
    Ok(true)
}

/// Cross-sectional valuation z-scores over the whole universe.
pub async fn run_valuation_zscores(store: &Store) -> Result<BatchReport, AnalyticsError> {
    let universe = store.fundamentals_universe().await?;

    let Some(result) = valuation_analysis::score_universe(&universe) else {
        tracing::warn!(
            "not enough data to compute z-scores ({} contributing tickers, need {})",
            universe.len(),
            valuation_analysis::MIN_UNIVERSE_SIZE
        );
        return Ok(BatchReport { skipped: universe.len(), ..Default::default() });
    };

    tracing::debug!("universe valuation stats: {:?}", result.stats);

    let mut report = BatchReport::default();
    for (symbol, scores) in &result.scores {
        match store.upsert_valuation_zscores(symbol, scores).await {
            Ok(()) => report.processed += 1,
            Err(e) => {
                tracing::warn!("{}: z-score upsert failed: {}", symbol, e);
                report.errored += 1;
            }
        }
    }
    Ok(report)
}

/// Time-series z-scores, one sequential pass over every symbol with
/// history. Tickers below the history threshold are skipped; a failure on
/// one ticker never aborts the rest.
pub async fn run_historical_zscores(store: &Store) -> Result<BatchReport, AnalyticsError> {
    let symbols = store.history_symbols().await?;
    tracing::info!("historical z-scores: {} symbols with history", symbols.len());

    let mut report = BatchReport::default();

    for symbol in &symbols {
        let history = match store.metric_history(symbol).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("{}: history query failed: {}", symbol, e);
                report.errored += 1;
                continue;
            }
        };

        let Some(scored) = valuation_analysis::score_history(&history) else {
            tracing::debug!("{}: only {} history rows, skipped", symbol, history.len());
            report.skipped += 1;
            continue;
        };

        let mut failed = false;
        for row in &scored {
            if let Err(e) = store.upsert_timeseries_zscores(symbol, row).await {
                tracing::warn!("{}: time-series upsert failed at {}: {}", symbol, row.as_of, e);
                failed = true;
                break;
            }
        }
        if failed {
            report.errored += 1;
        } else {
            report.processed += 1;
        }
    }

    Ok(report)
}

/// Composite scores for every known ticker from whatever inputs are
/// present.
pub async fn run_composite_scores(
    store: &Store,
    analytics_cache: &AnalyticsCache,
) -> Result<BatchReport, AnalyticsError> {
    let weights = WeightConfig::from_env();
    tracing::info!("computing composite scores with weights: {:?}", weights);

    let rows = store.composite_inputs().await?;
    let mut report = BatchReport::default();

    for row in &rows {
        let score = composite_scoring::score(Some(&row.zscores), &row.inputs, &weights);
        match store.upsert_composite_score(&row.symbol, &score).await {
            Ok(()) => {
                analytics_cache.set_composite(&row.symbol, &score).await;
                report.processed += 1;
            }
            Err(e) => {
                tracing::warn!("{}: composite upsert failed: {}", row.symbol, e);
                report.errored += 1;
            }
        }
    }

    Ok(report)
}
