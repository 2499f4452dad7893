//! Ingestion of recent contract transactions from USASpending.gov.
//!
//! Transaction-level search: individual modifications/payments, not lifetime
//! contract totals. The API is open and requires no key. Without a configured
//! SAM.gov API key the client serves an embedded fixture instead (mock mode).

mod fixture;

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::Contract;

/// Transaction search endpoint, relative to the configured base URL.
const TRANSACTION_SEARCH_PATH: &str = "/api/v2/search/spending_by_transaction/";

/// Award type codes for contracts only (not grants, loans, etc.).
const CONTRACT_AWARD_TYPES: [&str; 4] = ["A", "B", "C", "D"];

/// Fields requested from the transaction search.
const FIELDS_TO_RETRIEVE: [&str; 10] = [
    "Recipient Name",
    "Award ID",
    "Mod",
    "Action Date",
    "Transaction Amount",
    "Awarding Agency",
    "Awarding Sub Agency",
    "Action Type",
    "Transaction Description",
    "generated_internal_id",
];

/// Rows per page and maximum pages fetched per run.
const PAGE_SIZE: usize = 100;
const MAX_PAGES: u32 = 5;

#[derive(Debug, Deserialize)]
struct TransactionPage {
    #[serde(default)]
    results: Vec<Value>,
}

enum Mode {
    Live {
        http: reqwest::Client,
        base_url: String,
    },
    Mock,
}

/// Client for the USASpending.gov transaction feed.
pub struct IngestClient {
    mode: Mode,
}

impl IngestClient {
    pub fn from_config(config: &Config) -> Self {
        if config.mock_mode() {
            Self::mock()
        } else {
            Self::live(&config.usaspending_base_url)
        }
    }

    pub fn live(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            mode: Mode::Live {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
            },
        }
    }

    pub fn mock() -> Self {
        Self { mode: Mode::Mock }
    }

    /// Fetch recent contract transactions, largest first, filtered to those
    /// at or above `min_award_amount`.
    pub async fn fetch_recent(
        &self,
        days_back: i64,
        min_award_amount: f64,
    ) -> Result<Vec<Value>, AppError> {
        match &self.mode {
            Mode::Mock => {
                let transactions: Vec<Value> = fixture::sample_transactions()
                    .into_iter()
                    .filter(|raw| transaction_amount(raw) >= min_award_amount)
                    .collect();
                tracing::info!(
                    count = transactions.len(),
                    "Serving fixture transactions (mock mode)"
                );
                Ok(transactions)
            }
            Mode::Live { http, base_url } => {
                self.fetch_live(http, base_url, days_back, min_award_amount)
                    .await
            }
        }
    }

    async fn fetch_live(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        days_back: i64,
        min_award_amount: f64,
    ) -> Result<Vec<Value>, AppError> {
        let end_date = Utc::now().date_naive();
        let start_date = end_date - Duration::days(days_back);
        let url = format!("{}{}", base_url, TRANSACTION_SEARCH_PATH);

        let mut all_transactions = Vec::new();

        for page in 1..=MAX_PAGES {
            let payload = json!({
                "filters": {
                    "time_period": [{
                        "start_date": start_date.format("%Y-%m-%d").to_string(),
                        "end_date": end_date.format("%Y-%m-%d").to_string(),
                    }],
                    "award_type_codes": CONTRACT_AWARD_TYPES,
                },
                "fields": FIELDS_TO_RETRIEVE,
                "limit": PAGE_SIZE,
                "page": page,
                "sort": "Transaction Amount",
                "order": "desc",
            });

            tracing::debug!(page, "Fetching transactions from USASpending.gov");

            let response = http
                .post(&url)
                .json(&payload)
                .send()
                .await?
                .error_for_status()?;

            let body: TransactionPage = response.json().await?;
            if body.results.is_empty() {
                break;
            }

            let page_len = body.results.len();
            all_transactions.extend(
                body.results
                    .into_iter()
                    .filter(|raw| transaction_amount(raw) >= min_award_amount),
            );

            if page_len < PAGE_SIZE {
                break;
            }
        }

        tracing::info!(
            count = all_transactions.len(),
            days_back,
            "Fetched transactions from USASpending.gov"
        );

        Ok(all_transactions)
    }
}

/// Parse a raw transaction into a normalized contract record.
///
/// Returns `None` when the row should be filtered: missing recipient,
/// amount below the minimum, or no derivable contract id.
pub fn parse_contract(raw: &Value, min_award_amount: f64) -> Option<Contract> {
    let awardee_name = raw
        .get("Recipient Name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?
        .to_string();

    let award_amount = transaction_amount(raw);
    if award_amount < min_award_amount {
        return None;
    }

    let award_id = string_field(raw, "Award ID").unwrap_or_default();
    let mod_number = string_field(raw, "Mod").unwrap_or_else(|| "0".to_string());
    let action_date = string_field(raw, "Action Date").unwrap_or_default();
    let internal_id = string_field(raw, "generated_internal_id").filter(|s| !s.is_empty());

    // Unique per transaction: base id plus the modification number
    let base_id = match &internal_id {
        Some(id) => id.clone(),
        None if award_id.is_empty() => return None,
        None => format!("{}_{}_{}", award_id, mod_number, action_date),
    };
    let contract_id = format!("{}_MOD{}", base_id, mod_number);

    let agency = string_field(raw, "Awarding Agency").unwrap_or_default();
    let sub_agency = string_field(raw, "Awarding Sub Agency").unwrap_or_default();
    let mut agency_name = agency.clone();
    if !sub_agency.is_empty() && sub_agency != agency {
        if agency_name.is_empty() {
            agency_name = sub_agency;
        } else {
            agency_name = format!("{} - {}", agency, sub_agency);
        }
    }
    if agency_name.is_empty() {
        agency_name = "Unknown Agency".to_string();
    }

    let contract_date = NaiveDate::parse_from_str(&action_date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());

    let sam_gov_url = internal_id
        .as_deref()
        .map(|id| format!("https://www.usaspending.gov/award/{}", id));

    let action_type = match string_field(raw, "Action Type").unwrap_or_default().as_str() {
        "A" => "New".to_string(),
        "B" => "Continuation".to_string(),
        "C" => "Modification".to_string(),
        "D" => "Deletion".to_string(),
        "G" => "Grant".to_string(),
        other => other.to_string(),
    };

    let description = string_field(raw, "Transaction Description").filter(|s| !s.is_empty());

    Some(Contract {
        contract_id,
        awardee_name,
        agency_name,
        action_type,
        description,
        award_amount,
        potential_ceiling: None,
        contract_date,
        sam_gov_url,
    })
}

/// Transaction amount as f64; tolerates formatted strings ("$1,234.56").
fn transaction_amount(raw: &Value) -> f64 {
    match raw.get("Transaction Amount") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.replace([',', '$'], "").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String-or-number field as a String.
fn string_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const MIN_AWARD: f64 = 1_000_000.0;

    #[test]
    fn test_parse_complete_transaction() {
        let raw = json!({
            "Recipient Name": "KRATOS DEFENSE & SECURITY SOLUTIONS, INC.",
            "Award ID": "FA861724C0001",
            "Mod": "P00003",
            "Action Date": "2025-07-30",
            "Transaction Amount": 150_000_000.0,
            "Awarding Agency": "Department of Defense",
            "Awarding Sub Agency": "Department of the Air Force",
            "Action Type": "C",
            "Transaction Description": "HYPERSONIC TEST VEHICLE PRODUCTION",
            "generated_internal_id": "CONT_AWD_FA861724C0001",
        });

        let contract = parse_contract(&raw, MIN_AWARD).unwrap();
        assert_eq!(contract.contract_id, "CONT_AWD_FA861724C0001_MODP00003");
        assert_eq!(contract.awardee_name, "KRATOS DEFENSE & SECURITY SOLUTIONS, INC.");
        assert_eq!(
            contract.agency_name,
            "Department of Defense - Department of the Air Force"
        );
        assert_eq!(contract.action_type, "Modification");
        assert_eq!(contract.award_amount, 150_000_000.0);
        assert_eq!(
            contract.sam_gov_url.as_deref(),
            Some("https://www.usaspending.gov/award/CONT_AWD_FA861724C0001")
        );
        let date = contract.contract_date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 7, 30));
    }

    #[test]
    fn test_parse_drops_missing_recipient() {
        let raw = json!({
            "Award ID": "W9128F25C0042",
            "Transaction Amount": 5_000_000.0,
        });
        assert!(parse_contract(&raw, MIN_AWARD).is_none());
    }

    #[test]
    fn test_parse_drops_small_amounts() {
        let raw = json!({
            "Recipient Name": "SMALL WIDGETS LLC",
            "Award ID": "SP060025P0101",
            "Transaction Amount": 500_000.0,
        });
        assert!(parse_contract(&raw, MIN_AWARD).is_none());
    }

    #[test]
    fn test_parse_accepts_formatted_string_amounts() {
        let raw = json!({
            "Recipient Name": "LEIDOS, INC.",
            "Award ID": "HHSN316201200033W",
            "Transaction Amount": "$12,500,000.00",
        });
        let contract = parse_contract(&raw, MIN_AWARD).unwrap();
        assert_eq!(contract.award_amount, 12_500_000.0);
    }

    #[test]
    fn test_parse_composite_id_without_internal_id() {
        let raw = json!({
            "Recipient Name": "PARSONS GOVERNMENT SERVICES INC.",
            "Award ID": "W912DY20D0023",
            "Mod": 4,
            "Action Date": "2025-08-01",
            "Transaction Amount": 30_000_000.0,
        });
        let contract = parse_contract(&raw, MIN_AWARD).unwrap();
        assert_eq!(contract.contract_id, "W912DY20D0023_4_2025-08-01_MOD4");
    }

    #[test]
    fn test_parse_drops_rows_without_any_id() {
        let raw = json!({
            "Recipient Name": "MYSTERY VENDOR",
            "Transaction Amount": 2_000_000.0,
        });
        assert!(parse_contract(&raw, MIN_AWARD).is_none());
    }

    #[test]
    fn test_agency_name_fallbacks() {
        let raw = json!({
            "Recipient Name": "BOOZ ALLEN HAMILTON INC.",
            "Award ID": "GS00Q14OADU208",
            "Transaction Amount": 45_000_000.0,
            "Awarding Agency": "General Services Administration",
            "Awarding Sub Agency": "General Services Administration",
        });
        // Sub agency equal to agency is not repeated
        let contract = parse_contract(&raw, MIN_AWARD).unwrap();
        assert_eq!(contract.agency_name, "General Services Administration");

        let raw = json!({
            "Recipient Name": "BOOZ ALLEN HAMILTON INC.",
            "Award ID": "GS00Q14OADU208",
            "Transaction Amount": 45_000_000.0,
        });
        let contract = parse_contract(&raw, MIN_AWARD).unwrap();
        assert_eq!(contract.agency_name, "Unknown Agency");
    }

    #[test]
    fn test_malformed_action_date_is_none_not_error() {
        let raw = json!({
            "Recipient Name": "CACI INTERNATIONAL INC",
            "Award ID": "N0017819D8663",
            "Action Date": "07/30/2025",
            "Transaction Amount": 8_000_000.0,
        });
        let contract = parse_contract(&raw, MIN_AWARD).unwrap();
        assert!(contract.contract_date.is_none());
    }

    #[tokio::test]
    async fn test_mock_fetch_applies_minimum_amount() {
        let client = IngestClient::mock();
        let transactions = client.fetch_recent(7, MIN_AWARD).await.unwrap();
        assert!(!transactions.is_empty());
        assert!(transactions
            .iter()
            .all(|raw| transaction_amount(raw) >= MIN_AWARD));
    }
}
