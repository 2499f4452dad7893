//! Database module for PostgreSQL persistence.
//!
//! PostgreSQL is the source of truth for company reference data and
//! detected signals.

mod repository;

pub use repository::*;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
pub async fn init_database(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if they don't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            ticker TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            name_normalized TEXT,
            market_cap BIGINT,
            avg_volume BIGINT,
            sector TEXT,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS signals (
            id BIGSERIAL PRIMARY KEY,
            contract_id TEXT NOT NULL UNIQUE,
            ticker TEXT NOT NULL REFERENCES companies(ticker),
            agency_name TEXT,
            contract_description TEXT,
            award_amount DOUBLE PRECISION NOT NULL,
            potential_ceiling DOUBLE PRECISION,
            market_cap_at_time DOUBLE PRECISION,
            impact_ratio DOUBLE PRECISION NOT NULL,
            contract_date TIMESTAMPTZ,
            sam_gov_url TEXT,
            detected_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            price_at_contract DOUBLE PRECISION,
            price_before_1h DOUBLE PRECISION,
            price_before_6h DOUBLE PRECISION,
            price_before_24h DOUBLE PRECISION,
            price_after_1m DOUBLE PRECISION,
            price_after_1h DOUBLE PRECISION,
            price_after_6h DOUBLE PRECISION,
            price_after_24h DOUBLE PRECISION
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the feed queries
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_companies_name_normalized ON companies(name_normalized)",
        "CREATE INDEX IF NOT EXISTS idx_signals_detected_at ON signals(detected_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_signals_contract_date ON signals(contract_date DESC)",
        "CREATE INDEX IF NOT EXISTS idx_signals_impact_ratio ON signals(impact_ratio DESC)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
