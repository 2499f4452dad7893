//! Company API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::ApiResult;
use crate::errors::AppError;
use crate::models::Company;
use crate::AppState;

/// Maximum number of search results allowed.
const MAX_SEARCH_LIMIT: i64 = 50;

/// Company search query parameters.
#[derive(Debug, Deserialize)]
pub struct CompanySearchQuery {
    /// Search query over ticker and name.
    pub q: String,
    /// Maximum number of results (default: 10).
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// GET /api/companies - Search companies by name or ticker.
pub async fn search_companies(
    State(state): State<AppState>,
    Query(params): Query<CompanySearchQuery>,
) -> ApiResult<Vec<Company>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Search query is required".to_string()));
    }

    let limit = params.limit.clamp(1, MAX_SEARCH_LIMIT);
    let companies = state.repo.search_companies(query, limit).await?;

    Ok(Json(companies))
}

/// GET /api/companies/:ticker - Get company details by ticker.
pub async fn get_company(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> ApiResult<Company> {
    let ticker = ticker.trim().to_uppercase();

    state
        .repo
        .get_company(&ticker)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", ticker)))
}
