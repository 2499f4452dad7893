//! Pipeline run statistics and status reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Error => "error",
        }
    }
}

/// Statistics gathered over a single pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRunStats {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub contracts_fetched: usize,
    pub contracts_parsed: usize,
    pub entities_matched: usize,
    pub signals_created: usize,
    pub errors: Vec<String>,
}

impl PipelineRunStats {
    pub fn begin() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            contracts_fetched: 0,
            contracts_parsed: 0,
            entities_matched: 0,
            signals_created: 0,
            errors: Vec::new(),
        }
    }
}

/// Scheduler status exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatusResponse {
    /// `idle` until the first run finishes, then the last run's status.
    pub status: String,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<PipelineRunStats>,
}
