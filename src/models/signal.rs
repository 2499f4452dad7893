//! Signal models: high-impact government contract wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Company;

/// Impact tier buckets for the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    /// >= 20% of market cap
    Nuclear,
    /// 10-20%
    High,
    /// below 10%
    Moderate,
}

impl ImpactTier {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 20.0 {
            ImpactTier::Nuclear
        } else if ratio >= 10.0 {
            ImpactTier::High
        } else {
            ImpactTier::Moderate
        }
    }
}

/// Sort order for the signal feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSort {
    /// When the contract was signed
    #[default]
    ContractDate,
    /// When the pipeline found it
    DetectedAt,
}

/// Stock price reaction around the contract announcement. All `before_*` and
/// `after_*` fields are percentage changes relative to the announcement price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceEvolution {
    pub price_at_contract: Option<f64>,
    pub price_before_1h: Option<f64>,
    pub price_before_6h: Option<f64>,
    pub price_before_24h: Option<f64>,
    pub price_after_1m: Option<f64>,
    pub price_after_1h: Option<f64>,
    pub price_after_6h: Option<f64>,
    pub price_after_24h: Option<f64>,
}

/// A detected signal as stored in the database.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub id: i64,
    pub contract_id: String,
    pub ticker: String,
    pub agency_name: Option<String>,
    pub contract_description: Option<String>,
    pub award_amount: f64,
    pub potential_ceiling: Option<f64>,
    pub market_cap_at_time: Option<f64>,
    pub impact_ratio: f64,
    pub contract_date: Option<DateTime<Utc>>,
    pub sam_gov_url: Option<String>,
    pub detected_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prices: PriceEvolution,
}

/// A signal ready for insertion; the database assigns `id` and `detected_at`.
#[derive(Debug, Clone)]
pub struct NewSignal {
    pub contract_id: String,
    pub ticker: String,
    pub agency_name: Option<String>,
    pub contract_description: Option<String>,
    pub award_amount: f64,
    pub potential_ceiling: Option<f64>,
    pub market_cap_at_time: Option<f64>,
    pub impact_ratio: f64,
    pub contract_date: Option<DateTime<Utc>>,
    pub sam_gov_url: Option<String>,
    pub prices: PriceEvolution,
}

/// Compact signal for the live feed table.
#[derive(Debug, Clone, Serialize)]
pub struct SignalListItem {
    pub id: i64,
    pub ticker: String,
    pub company_name: Option<String>,
    pub impact_ratio: f64,
    pub impact_tier: ImpactTier,
    pub award_amount: f64,
    pub market_cap_at_time: Option<f64>,
    pub agency_name: Option<String>,
    pub contract_date: Option<DateTime<Utc>>,
    pub detected_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prices: PriceEvolution,
}

impl SignalListItem {
    pub fn from_signal(signal: Signal, company_name: Option<String>) -> Self {
        Self {
            id: signal.id,
            ticker: signal.ticker,
            company_name,
            impact_ratio: signal.impact_ratio,
            impact_tier: ImpactTier::from_ratio(signal.impact_ratio),
            award_amount: signal.award_amount,
            market_cap_at_time: signal.market_cap_at_time,
            agency_name: signal.agency_name,
            contract_date: signal.contract_date,
            detected_at: signal.detected_at,
            prices: signal.prices,
        }
    }
}

/// Full signal details for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct SignalDetail {
    #[serde(flatten)]
    pub signal: Signal,
    pub impact_tier: ImpactTier,
    pub company: Option<Company>,
}

/// Paginated signal feed response.
#[derive(Debug, Clone, Serialize)]
pub struct SignalListResponse {
    pub items: Vec<SignalListItem>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_tier_boundaries() {
        assert_eq!(ImpactTier::from_ratio(25.0), ImpactTier::Nuclear);
        assert_eq!(ImpactTier::from_ratio(20.0), ImpactTier::Nuclear);
        assert_eq!(ImpactTier::from_ratio(19.99), ImpactTier::High);
        assert_eq!(ImpactTier::from_ratio(10.0), ImpactTier::High);
        assert_eq!(ImpactTier::from_ratio(9.99), ImpactTier::Moderate);
        assert_eq!(ImpactTier::from_ratio(5.0), ImpactTier::Moderate);
    }

    #[test]
    fn test_impact_tier_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ImpactTier::Nuclear).unwrap(),
            "\"nuclear\""
        );
        assert_eq!(
            serde_json::to_string(&ImpactTier::Moderate).unwrap(),
            "\"moderate\""
        );
    }
}
