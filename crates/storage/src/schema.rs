//! Idempotent schema for the tables the scoring jobs read and write.
//! `updated_at` on latest tables is always assigned by the writer in SQL.

pub const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tickers (
        symbol TEXT PRIMARY KEY,
        name TEXT,
        exchange TEXT,
        currency TEXT,
        region TEXT,
        active BOOLEAN DEFAULT true,
        first_seen TIMESTAMP DEFAULT now(),
        last_seen TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS price_history (
        symbol TEXT NOT NULL,
        date DATE NOT NULL,
        close DOUBLE PRECISION NOT NULL,
        PRIMARY KEY (symbol, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analytics_latest (
        symbol TEXT PRIMARY KEY,
        sma20 DOUBLE PRECISION,
        sma50 DOUBLE PRECISION,
        ema12 DOUBLE PRECISION,
        rsi14 DOUBLE PRECISION,
        updated_at TIMESTAMP DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_analytics_updated_at
    ON analytics_latest(updated_at DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fundamentals_latest (
        symbol TEXT PRIMARY KEY REFERENCES tickers(symbol),

        pe_ratio DOUBLE PRECISION,
        pb_ratio DOUBLE PRECISION,
        ps_ratio DOUBLE PRECISION,
        ev_ebitda DOUBLE PRECISION,

        roe DOUBLE PRECISION,

        revenue_growth_3y DOUBLE PRECISION,
        eps_growth_3y DOUBLE PRECISION,

        updated_at TIMESTAMP DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_fundamentals_updated_at
    ON fundamentals_latest(updated_at DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS risk_metrics_latest (
        symbol TEXT PRIMARY KEY REFERENCES tickers(symbol),
        beta DOUBLE PRECISION,
        updated_at TIMESTAMP DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fundamentals_history (
        symbol TEXT REFERENCES tickers(symbol),
        as_of DATE NOT NULL,

        pe_ratio DOUBLE PRECISION,
        pb_ratio DOUBLE PRECISION,
        ps_ratio DOUBLE PRECISION,
        ev_ebitda DOUBLE PRECISION,

        PRIMARY KEY (symbol, as_of)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS valuation_zscores_latest (
        symbol TEXT PRIMARY KEY REFERENCES tickers(symbol),

        pe_zscore DOUBLE PRECISION,
        pb_zscore DOUBLE PRECISION,
        ps_zscore DOUBLE PRECISION,
        ev_ebitda_zscore DOUBLE PRECISION,

        updated_at TIMESTAMP DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS valuation_zscores_timeseries (
        symbol TEXT NOT NULL,
        as_of DATE NOT NULL,

        pe_zscore_ts DOUBLE PRECISION,
        pb_zscore_ts DOUBLE PRECISION,
        ps_zscore_ts DOUBLE PRECISION,
        ev_ebitda_zscore_ts DOUBLE PRECISION,

        PRIMARY KEY (symbol, as_of)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS composite_scores_latest (
        symbol TEXT PRIMARY KEY REFERENCES tickers(symbol),

        valuation_score DOUBLE PRECISION,
        profitability_score DOUBLE PRECISION,
        growth_score DOUBLE PRECISION,
        risk_score DOUBLE PRECISION,

        total_score DOUBLE PRECISION,

        updated_at TIMESTAMP DEFAULT now()
    )
    "#,
];
