//! Postgres adapter for the scoring jobs. All upserts are
//! `ON CONFLICT ... DO UPDATE`, so reruns overwrite the latest rows and
//! update time-series rows in place.

use composite_scoring::{CompositeInputs, CompositeScore};
use scoring_core::{AnalyticsError, FundamentalRow, MetricHistoryRow, PricePoint};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use technical_analysis::IndicatorSet;
use valuation_analysis::{TimeSeriesZScoreRow, ValuationZScores};

use crate::schema::MIGRATIONS;

fn db_err(e: sqlx::Error) -> AnalyticsError {
    AnalyticsError::Database(e.to_string())
}

/// Everything the composite scorer needs for one ticker, joined from the
/// latest z-score, fundamentals, and risk rows.
#[derive(Debug, Clone)]
pub struct CompositeInputRow {
    pub symbol: String,
    pub zscores: ValuationZScores,
    pub inputs: CompositeInputs,
}

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect using `DATABASE_URL` (or `POSTGRES_URL`). Absent
    /// configuration is fatal: the caller must not fall back to partial
    /// behavior for connectivity.
    pub async fn connect_from_env() -> Result<Self, AnalyticsError> {
        let url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("POSTGRES_URL"))
            .map_err(|_| {
                AnalyticsError::MissingConfiguration(
                    "DATABASE_URL or POSTGRES_URL is required".to_string(),
                )
            })?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(db_err)?;

        Ok(Self { pool })
    }

    /// Create the tables and indexes the jobs touch, idempotently.
    pub async fn migrate(&self) -> Result<(), AnalyticsError> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        }
        tracing::info!("schema migration complete ({} statements)", MIGRATIONS.len());
        Ok(())
    }

    /// Active tickers, the fan-out set for the indicator job.
    pub async fn active_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let rows = sqlx::query("SELECT symbol FROM tickers WHERE active ORDER BY symbol")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter()
            .map(|r| r.try_get("symbol").map_err(db_err))
            .collect()
    }

    /// One ticker's daily closes, ascending by date. The primary key on
    /// (symbol, date) guarantees the no-duplicate-dates invariant.
    pub async fn price_series(&self, symbol: &str) -> Result<Vec<PricePoint>, AnalyticsError> {
        let rows =
            sqlx::query("SELECT date, close FROM price_history WHERE symbol = $1 ORDER BY date")
                .bind(symbol)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        rows.iter()
            .map(|r| {
                Ok(PricePoint {
                    date: r.try_get("date").map_err(db_err)?,
                    close: r.try_get("close").map_err(db_err)?,
                })
            })
            .collect()
    }

    /// The cross-sectional universe: latest fundamentals rows carrying at
    /// least one valuation metric.
    pub async fn fundamentals_universe(&self) -> Result<Vec<FundamentalRow>, AnalyticsError> {
        let rows = sqlx::query(
            r#"
            SELECT symbol, pe_ratio, pb_ratio, ps_ratio, ev_ebitda,
                   roe, revenue_growth_3y, eps_growth_3y
            FROM fundamentals_latest
            WHERE pe_ratio IS NOT NULL
               OR pb_ratio IS NOT NULL
               OR ps_ratio IS NOT NULL
               OR ev_ebitda IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(fundamental_from_row).collect()
    }

    /// Symbols with any fundamentals history at all.
    pub async fn history_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let rows = sqlx::query("SELECT DISTINCT symbol FROM fundamentals_history ORDER BY symbol")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter()
            .map(|r| r.try_get("symbol").map_err(db_err))
            .collect()
    }

    /// One ticker's fundamentals history, ascending by as_of.
    pub async fn metric_history(
        &self,
        symbol: &str,
    ) -> Result<Vec<MetricHistoryRow>, AnalyticsError> {
        let rows = sqlx::query(
            r#"
            SELECT as_of, pe_ratio, pb_ratio, ps_ratio, ev_ebitda
            FROM fundamentals_history
            WHERE symbol = $1
            ORDER BY as_of
            "#,
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|r| {
                Ok(MetricHistoryRow {
                    as_of: r.try_get("as_of").map_err(db_err)?,
                    pe_ratio: r.try_get("pe_ratio").map_err(db_err)?,
                    pb_ratio: r.try_get("pb_ratio").map_err(db_err)?,
                    ps_ratio: r.try_get("ps_ratio").map_err(db_err)?,
                    ev_ebitda: r.try_get("ev_ebitda").map_err(db_err)?,
                })
            })
            .collect()
    }

    /// Per-ticker composite inputs: every known ticker, left-joined against
    /// the latest z-scores, fundamentals, and risk metrics.
    pub async fn composite_inputs(&self) -> Result<Vec<CompositeInputRow>, AnalyticsError> {
        let rows = sqlx::query(
            r#"
            SELECT t.symbol,
                   v.pe_zscore, v.pb_zscore, v.ps_zscore, v.ev_ebitda_zscore,
                   f.roe, f.revenue_growth_3y, f.eps_growth_3y,
                   r.beta
            FROM tickers t
            LEFT JOIN valuation_zscores_latest v ON v.symbol = t.symbol
            LEFT JOIN fundamentals_latest f ON f.symbol = t.symbol
            LEFT JOIN risk_metrics_latest r ON r.symbol = t.symbol
            ORDER BY t.symbol
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|r| {
                Ok(CompositeInputRow {
                    symbol: r.try_get("symbol").map_err(db_err)?,
                    zscores: ValuationZScores {
                        pe_zscore: r.try_get("pe_zscore").map_err(db_err)?,
                        pb_zscore: r.try_get("pb_zscore").map_err(db_err)?,
                        ps_zscore: r.try_get("ps_zscore").map_err(db_err)?,
                        ev_ebitda_zscore: r.try_get("ev_ebitda_zscore").map_err(db_err)?,
                    },
                    inputs: CompositeInputs {
                        roe: r.try_get("roe").map_err(db_err)?,
                        revenue_growth_3y: r.try_get("revenue_growth_3y").map_err(db_err)?,
                        eps_growth_3y: r.try_get("eps_growth_3y").map_err(db_err)?,
                        beta: r.try_get("beta").map_err(db_err)?,
                    },
                })
            })
            .collect()
    }

    pub async fn upsert_indicators(
        &self,
        symbol: &str,
        indicators: &IndicatorSet,
    ) -> Result<(), AnalyticsError> {
        sqlx::query(
            r#"
            INSERT INTO analytics_latest (symbol, sma20, sma50, ema12, rsi14, updated_at)
            VALUES ($1, $2, $3, $4, $5, now())
            ON CONFLICT (symbol) DO UPDATE SET
                sma20 = EXCLUDED.sma20,
                sma50 = EXCLUDED.sma50,
                ema12 = EXCLUDED.ema12,
                rsi14 = EXCLUDED.rsi14,
                updated_at = now()
            "#,
        )
        .bind(symbol)
        .bind(indicators.sma20)
        .bind(indicators.sma50)
        .bind(indicators.ema12)
        .bind(indicators.rsi14)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    pub async fn upsert_valuation_zscores(
        &self,
        symbol: &str,
        scores: &ValuationZScores,
    ) -> Result<(), AnalyticsError> {
        sqlx::query(
            r#"
            INSERT INTO valuation_zscores_latest
                (symbol, pe_zscore, pb_zscore, ps_zscore, ev_ebitda_zscore, updated_at)
            VALUES ($1, $2, $3, $4, $5, now())
            ON CONFLICT (symbol) DO UPDATE SET
                pe_zscore = EXCLUDED.pe_zscore,
                pb_zscore = EXCLUDED.pb_zscore,
                ps_zscore = EXCLUDED.ps_zscore,
                ev_ebitda_zscore = EXCLUDED.ev_ebitda_zscore,
                updated_at = now()
            "#,
        )
        .bind(symbol)
        .bind(scores.pe_zscore)
        .bind(scores.pb_zscore)
        .bind(scores.ps_zscore)
        .bind(scores.ev_ebitda_zscore)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    pub async fn upsert_timeseries_zscores(
        &self,
        symbol: &str,
        row: &TimeSeriesZScoreRow,
    ) -> Result<(), AnalyticsError> {
        sqlx::query(
            r#"
            INSERT INTO valuation_zscores_timeseries
                (symbol, as_of, pe_zscore_ts, pb_zscore_ts, ps_zscore_ts, ev_ebitda_zscore_ts)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (symbol, as_of) DO UPDATE SET
                pe_zscore_ts = EXCLUDED.pe_zscore_ts,
                pb_zscore_ts = EXCLUDED.pb_zscore_ts,
                ps_zscore_ts = EXCLUDED.ps_zscore_ts,
                ev_ebitda_zscore_ts = EXCLUDED.ev_ebitda_zscore_ts
            "#,
        )
        .bind(symbol)
        .bind(row.as_of)
        .bind(row.scores.pe_zscore)
        .bind(row.scores.pb_zscore)
        .bind(row.scores.ps_zscore)
        .bind(row.scores.ev_ebitda_zscore)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    pub async fn upsert_composite_score(
        &self,
        symbol: &str,
        score: &CompositeScore,
    ) -> Result<(), AnalyticsError> {
        sqlx::query(
            r#"
            INSERT INTO composite_scores_latest
                (symbol, valuation_score, profitability_score, growth_score,
                 risk_score, total_score, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            ON CONFLICT (symbol) DO UPDATE SET
                valuation_score = EXCLUDED.valuation_score,
                profitability_score = EXCLUDED.profitability_score,
                growth_score = EXCLUDED.growth_score,
                risk_score = EXCLUDED.risk_score,
                total_score = EXCLUDED.total_score,
                updated_at = now()
            "#,
        )
        .bind(symbol)
        .bind(score.valuation_score)
        .bind(score.profitability_score)
        .bind(score.growth_score)
        .bind(score.risk_score)
        .bind(score.total_score)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

fn fundamental_from_row(r: &PgRow) -> Result<FundamentalRow, AnalyticsError> {
    Ok(FundamentalRow {
        symbol: r.try_get("symbol").map_err(db_err)?,
        pe_ratio: r.try_get("pe_ratio").map_err(db_err)?,
        pb_ratio: r.try_get("pb_ratio").map_err(db_err)?,
        ps_ratio: r.try_get("ps_ratio").map_err(db_err)?,
        ev_ebitda: r.try_get("ev_ebitda").map_err(db_err)?,
        roe: r.try_get("roe").map_err(db_err)?,
        revenue_growth_3y: r.try_get("revenue_growth_3y").map_err(db_err)?,
        eps_growth_3y: r.try_get("eps_growth_3y").map_err(db_err)?,
    })
}
