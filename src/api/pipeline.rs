//! Pipeline control endpoints: manual trigger and scheduler status.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::{PipelineRunStats, PipelineStatusResponse};
use crate::AppState;

/// POST /api/pipeline/run - Run the pipeline now and return its stats.
pub async fn run_pipeline(State(state): State<AppState>) -> ApiResult<PipelineRunStats> {
    Ok(Json(state.pipeline.run().await))
}

/// GET /api/pipeline/status - Last run stats and the next scheduled run.
pub async fn pipeline_status(State(state): State<AppState>) -> ApiResult<PipelineStatusResponse> {
    Ok(Json(state.pipeline.status().await))
}
