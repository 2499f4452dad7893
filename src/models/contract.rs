//! Normalized contract transaction as produced by the ingestion parser.

use chrono::{DateTime, Utc};

/// A single contract transaction (modification/payment) normalized from the
/// USASpending.gov transaction feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    /// Unique per transaction, including the modification number.
    pub contract_id: String,
    pub awardee_name: String,
    pub agency_name: String,
    /// Human-readable action type (New, Continuation, Modification, ...).
    pub action_type: String,
    pub description: Option<String>,
    pub award_amount: f64,
    /// Ceiling for IDV contracts; transactions usually carry none.
    pub potential_ceiling: Option<f64>,
    pub contract_date: Option<DateTime<Utc>>,
    /// Link to the award on USASpending.gov.
    pub sam_gov_url: Option<String>,
}
