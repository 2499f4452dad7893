//! Database repository for company and signal operations.
//!
//! Uses prepared statements; signal insertion is idempotent per contract id.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::errors::AppError;
use crate::models::{Company, CompanySeed, NewSignal, PriceEvolution, Signal, SignalSort};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the database currently answers queries.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    // ==================== COMPANY OPERATIONS ====================

    pub async fn count_companies(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT count(*) AS count FROM companies")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Insert or refresh a company.
    pub async fn upsert_company(&self, company: &CompanySeed) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO companies (ticker, name, name_normalized, market_cap, avg_volume, sector, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            ON CONFLICT (ticker) DO UPDATE SET
                name = EXCLUDED.name,
                name_normalized = EXCLUDED.name_normalized,
                market_cap = EXCLUDED.market_cap,
                avg_volume = EXCLUDED.avg_volume,
                sector = EXCLUDED.sector,
                updated_at = now()
            "#,
        )
        .bind(&company.ticker)
        .bind(&company.name)
        .bind(&company.name_normalized)
        .bind(company.market_cap)
        .bind(company.avg_volume)
        .bind(&company.sector)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List all companies, for entity resolution and seeding checks.
    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let rows = sqlx::query(
            "SELECT ticker, name, name_normalized, market_cap, avg_volume, sector, updated_at \
             FROM companies ORDER BY ticker",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(company_from_row).collect())
    }

    /// Get a company by ticker.
    pub async fn get_company(&self, ticker: &str) -> Result<Option<Company>, AppError> {
        let row = sqlx::query(
            "SELECT ticker, name, name_normalized, market_cap, avg_volume, sector, updated_at \
             FROM companies WHERE ticker = $1",
        )
        .bind(ticker)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(company_from_row))
    }

    /// Substring search over ticker and name.
    pub async fn search_companies(&self, query: &str, limit: i64) -> Result<Vec<Company>, AppError> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query(
            "SELECT ticker, name, name_normalized, market_cap, avg_volume, sector, updated_at \
             FROM companies WHERE ticker ILIKE $1 OR name ILIKE $1 ORDER BY ticker LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(company_from_row).collect())
    }

    // ==================== SIGNAL OPERATIONS ====================

    /// Insert a signal unless the transaction was already recorded.
    /// Returns whether a row was actually inserted.
    pub async fn insert_signal(&self, signal: &NewSignal) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO signals (
                contract_id, ticker, agency_name, contract_description,
                award_amount, potential_ceiling, market_cap_at_time, impact_ratio,
                contract_date, sam_gov_url,
                price_at_contract, price_before_1h, price_before_6h, price_before_24h,
                price_after_1m, price_after_1h, price_after_6h, price_after_24h
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (contract_id) DO NOTHING
            "#,
        )
        .bind(&signal.contract_id)
        .bind(&signal.ticker)
        .bind(&signal.agency_name)
        .bind(&signal.contract_description)
        .bind(signal.award_amount)
        .bind(signal.potential_ceiling)
        .bind(signal.market_cap_at_time)
        .bind(signal.impact_ratio)
        .bind(signal.contract_date)
        .bind(&signal.sam_gov_url)
        .bind(signal.prices.price_at_contract)
        .bind(signal.prices.price_before_1h)
        .bind(signal.prices.price_before_6h)
        .bind(signal.prices.price_before_24h)
        .bind(signal.prices.price_after_1m)
        .bind(signal.prices.price_after_1h)
        .bind(signal.prices.price_after_6h)
        .bind(signal.prices.price_after_24h)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count signals matching the feed filters.
    pub async fn count_signals(
        &self,
        min_impact: Option<f64>,
        ticker: Option<&str>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT count(*) AS count FROM signals
            WHERE ($1::float8 IS NULL OR impact_ratio >= $1)
              AND ($2::text IS NULL OR ticker = $2)
            "#,
        )
        .bind(min_impact)
        .bind(ticker)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("count"))
    }

    /// Page through signals for the live feed, joined with company names.
    pub async fn list_signals(
        &self,
        min_impact: Option<f64>,
        ticker: Option<&str>,
        sort: SignalSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<(Signal, Option<String>)>, AppError> {
        // ORDER BY cannot be bound, so each sort key gets its own statement
        let sql = match sort {
            SignalSort::DetectedAt => {
                r#"
                SELECT s.*, c.name AS company_name
                FROM signals s LEFT JOIN companies c ON c.ticker = s.ticker
                WHERE ($1::float8 IS NULL OR s.impact_ratio >= $1)
                  AND ($2::text IS NULL OR s.ticker = $2)
                ORDER BY s.detected_at DESC
                OFFSET $3 LIMIT $4
                "#
            }
            SignalSort::ContractDate => {
                r#"
                SELECT s.*, c.name AS company_name
                FROM signals s LEFT JOIN companies c ON c.ticker = s.ticker
                WHERE ($1::float8 IS NULL OR s.impact_ratio >= $1)
                  AND ($2::text IS NULL OR s.ticker = $2)
                ORDER BY s.contract_date DESC NULLS LAST
                OFFSET $3 LIMIT $4
                "#
            }
        };

        let rows = sqlx::query(sql)
            .bind(min_impact)
            .bind(ticker)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| (signal_from_row(row), row.get("company_name")))
            .collect())
    }

    /// Get a signal by id.
    pub async fn get_signal(&self, id: i64) -> Result<Option<Signal>, AppError> {
        let row = sqlx::query("SELECT * FROM signals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(signal_from_row))
    }
}

// Helper functions for row conversion

fn company_from_row(row: &PgRow) -> Company {
    Company {
        ticker: row.get("ticker"),
        name: row.get("name"),
        name_normalized: row.get("name_normalized"),
        market_cap: row.get("market_cap"),
        avg_volume: row.get("avg_volume"),
        sector: row.get("sector"),
        updated_at: row.get("updated_at"),
    }
}

fn signal_from_row(row: &PgRow) -> Signal {
    Signal {
        id: row.get("id"),
        contract_id: row.get("contract_id"),
        ticker: row.get("ticker"),
        agency_name: row.get("agency_name"),
        contract_description: row.get("contract_description"),
        award_amount: row.get("award_amount"),
        potential_ceiling: row.get("potential_ceiling"),
        market_cap_at_time: row.get("market_cap_at_time"),
        impact_ratio: row.get("impact_ratio"),
        contract_date: row.get("contract_date"),
        sam_gov_url: row.get("sam_gov_url"),
        detected_at: row.get("detected_at"),
        prices: PriceEvolution {
            price_at_contract: row.get("price_at_contract"),
            price_before_1h: row.get("price_before_1h"),
            price_before_6h: row.get("price_before_6h"),
            price_before_24h: row.get("price_before_24h"),
            price_after_1m: row.get("price_after_1m"),
            price_after_1h: row.get("price_after_1h"),
            price_after_6h: row.get("price_after_6h"),
            price_after_24h: row.get("price_after_24h"),
        },
    }
}
