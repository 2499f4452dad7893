//! Signal API endpoints: the live feed and the detail view.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{ImpactTier, SignalDetail, SignalListItem, SignalListResponse, SignalSort};
use crate::AppState;

/// Maximum number of feed items per page.
const MAX_PAGE_SIZE: u32 = 100;

/// Signal feed query parameters.
#[derive(Debug, Deserialize)]
pub struct SignalListQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Minimum impact ratio filter.
    #[serde(default)]
    pub min_impact: Option<f64>,
    /// Filter by a specific ticker.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Sort key (default: contract_date).
    #[serde(default)]
    pub sort_by: SignalSort,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// GET /api/signals - Paginated list of signals for the live feed.
pub async fn list_signals(
    State(state): State<AppState>,
    Query(params): Query<SignalListQuery>,
) -> ApiResult<SignalListResponse> {
    if params.min_impact.is_some_and(|m| m < 0.0) {
        return Err(AppError::Validation(
            "min_impact must be non-negative".to_string(),
        ));
    }

    let page = params.page.max(1);
    let page_size = params.page_size.clamp(1, MAX_PAGE_SIZE);
    let ticker = params
        .ticker
        .as_deref()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty());

    let total = state
        .repo
        .count_signals(params.min_impact, ticker.as_deref())
        .await?;

    let offset = (page as i64 - 1) * page_size as i64;
    let rows = state
        .repo
        .list_signals(
            params.min_impact,
            ticker.as_deref(),
            params.sort_by,
            page_size as i64,
            offset,
        )
        .await?;

    let items: Vec<SignalListItem> = rows
        .into_iter()
        .map(|(signal, company_name)| SignalListItem::from_signal(signal, company_name))
        .collect();

    let pages = if total == 0 {
        0
    } else {
        (total + page_size as i64 - 1) / page_size as i64
    };

    Ok(Json(SignalListResponse {
        items,
        total,
        page,
        page_size,
        pages,
    }))
}

/// GET /api/signals/:id - Full signal details, including the company record.
pub async fn get_signal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<SignalDetail> {
    let signal = state
        .repo
        .get_signal(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Signal {} not found", id)))?;

    let company = state.repo.get_company(&signal.ticker).await?;
    let impact_tier = ImpactTier::from_ratio(signal.impact_ratio);

    Ok(Json(SignalDetail {
        signal,
        impact_tier,
        company,
    }))
}
