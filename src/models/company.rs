//! Company reference data: publicly traded companies that win federal contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company data for insertion; the database stamps `updated_at`.
#[derive(Debug, Clone)]
pub struct CompanySeed {
    pub ticker: String,
    pub name: String,
    pub name_normalized: String,
    pub market_cap: Option<i64>,
    pub avg_volume: Option<i64>,
    pub sector: Option<String>,
}

/// A publicly traded company tracked for contract signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub ticker: String,
    pub name: String,
    /// Normalized form of `name` used for entity resolution.
    #[serde(skip_serializing)]
    pub name_normalized: Option<String>,
    pub market_cap: Option<i64>,
    pub avg_volume: Option<i64>,
    pub sector: Option<String>,
    pub updated_at: DateTime<Utc>,
}
