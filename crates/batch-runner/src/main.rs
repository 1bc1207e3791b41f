//! batch-runner: compute and persist per-security analytics.
//!
//! Usage:
//!   cargo run -p batch-runner -- migrate
//!   cargo run -p batch-runner -- indicators [--concurrency N]
//!   cargo run -p batch-runner -- valuation-zscores
//!   cargo run -p batch-runner -- historical-zscores
//!   cargo run -p batch-runner -- composite-scores
//!   cargo run -p batch-runner -- all

mod jobs;

use anyhow::Context;
use cache::AnalyticsCache;
use scoring_core::BatchReport;
use storage::Store;

const DEFAULT_CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_runner=info,storage=warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = match args.get(1) {
        Some(cmd) => cmd.as_str(),
        None => usage(),
    };

    let concurrency: usize = args
        .iter()
        .position(|a| a == "--concurrency")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CONCURRENCY);

    // Missing connection configuration is the one fatal error class; it
    // surfaces here as a non-zero exit before any job runs.
    let store = Store::connect_from_env()
        .await
        .context("failed to connect to Postgres")?;
    let analytics_cache = AnalyticsCache::connect_from_env()
        .await
        .context("failed to connect to Redis")?;

    match command {
        "migrate" => {
            store.migrate().await?;
        }
        "indicators" => {
            let report = jobs::run_indicators(&store, &analytics_cache, concurrency).await?;
            log_report("indicators", &report);
        }
        "valuation-zscores" => {
            let report = jobs::run_valuation_zscores(&store).await?;
            log_report("valuation-zscores", &report);
        }
        "historical-zscores" => {
            let report = jobs::run_historical_zscores(&store).await?;
            log_report("historical-zscores", &report);
        }
        "composite-scores" => {
            let report = jobs::run_composite_scores(&store, &analytics_cache).await?;
            log_report("composite-scores", &report);
        }
        "all" => {
            // The nightly chain: indicators and both z-score passes feed
            // the composite scorer, so it runs last.
            let report = jobs::run_indicators(&store, &analytics_cache, concurrency).await?;
            log_report("indicators", &report);
            let report = jobs::run_valuation_zscores(&store).await?;
            log_report("valuation-zscores", &report);
            let report = jobs::run_historical_zscores(&store).await?;
            log_report("historical-zscores", &report);
            let report = jobs::run_composite_scores(&store, &analytics_cache).await?;
            log_report("composite-scores", &report);
        }
        other => {
            eprintln!("Unknown command: {other}");
            usage();
        }
    }

    Ok(())
}

fn log_report(job: &str, report: &BatchReport) {
    tracing::info!(
        "{}: {} processed, {} skipped, {} errored ({} total)",
        job,
        report.processed,
        report.skipped,
        report.errored,
        report.total()
    );
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  batch-runner migrate              Create tables (idempotent)");
    eprintln!("  batch-runner indicators           SMA/EMA/RSI for all active tickers");
    eprintln!("  batch-runner valuation-zscores    Cross-sectional valuation z-scores");
    eprintln!("  batch-runner historical-zscores   Per-ticker time-series z-scores");
    eprintln!("  batch-runner composite-scores     Weighted composite scores");
    eprintln!("  batch-runner all                  Run every job in order");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --concurrency N    Max parallel symbols for the indicator job (default: {DEFAULT_CONCURRENCY})");
    std::process::exit(1);
}
