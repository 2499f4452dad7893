//! The detection pipeline: fetch, resolve, score, enrich, store.
//!
//! Runs on a fixed interval and on demand via the API. Runs are serialized;
//! a manual trigger during a scheduled run waits its turn.

pub mod prices;
pub mod valuation;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;
use crate::ingest::{self, IngestClient};
use crate::market::MarketClient;
use crate::models::{
    Contract, NewSignal, PipelineRunStats, PipelineStatusResponse, PriceEvolution, RunStatus,
};
use crate::resolve::EntityResolver;
use valuation::ScoreLimits;

/// Orchestrates the full pipeline and tracks scheduler state.
pub struct Pipeline {
    repo: Arc<Repository>,
    ingest: IngestClient,
    market: MarketClient,
    config: Arc<Config>,
    limits: ScoreLimits,
    run_lock: Mutex<()>,
    last_run: RwLock<Option<PipelineRunStats>>,
    next_run: RwLock<Option<DateTime<Utc>>>,
}

impl Pipeline {
    pub fn new(
        repo: Arc<Repository>,
        ingest: IngestClient,
        market: MarketClient,
        config: Arc<Config>,
    ) -> Self {
        let limits = ScoreLimits::from_config(&config);
        Self {
            repo,
            ingest,
            market,
            config,
            limits,
            run_lock: Mutex::new(()),
            last_run: RwLock::new(None),
            next_run: RwLock::new(None),
        }
    }

    /// Execute one full pipeline run. Never panics the caller: failures end
    /// up in the returned stats.
    pub async fn run(&self) -> PipelineRunStats {
        let _guard = self.run_lock.lock().await;

        let mut stats = PipelineRunStats::begin();
        tracing::info!(run_id = %stats.run_id, "Starting pipeline run");

        match self.run_inner(&mut stats).await {
            Ok(()) => {
                stats.status = RunStatus::Completed;
                tracing::info!(
                    run_id = %stats.run_id,
                    contracts_fetched = stats.contracts_fetched,
                    signals_created = stats.signals_created,
                    "Pipeline run completed"
                );
            }
            Err(e) => {
                stats.status = RunStatus::Error;
                stats.errors.push(e.to_string());
                tracing::error!(run_id = %stats.run_id, error = %e, "Pipeline run failed");
            }
        }

        *self.last_run.write().await = Some(stats.clone());
        stats
    }

    async fn run_inner(&self, stats: &mut PipelineRunStats) -> Result<(), AppError> {
        // Snapshot the company table for entity resolution
        let companies = self.repo.list_companies().await?;
        let resolver = EntityResolver::new(&companies, self.config.fuzzy_match_threshold);

        // Step 1: fetch. An unreachable upstream degrades to an empty run.
        let raw = match self
            .ingest
            .fetch_recent(self.config.pipeline_days_back, self.config.min_award_amount)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Transaction fetch failed");
                stats.errors.push(e.to_string());
                Vec::new()
            }
        };
        stats.contracts_fetched = raw.len();

        // Step 2: parse and filter
        let contracts: Vec<Contract> = raw
            .iter()
            .filter_map(|r| ingest::parse_contract(r, self.config.min_award_amount))
            .collect();
        stats.contracts_parsed = contracts.len();

        // Steps 3-5: match, score and store
        for contract in &contracts {
            if let Err(e) = self.process_contract(&resolver, contract, stats).await {
                tracing::warn!(
                    contract_id = %contract.contract_id,
                    error = %e,
                    "Failed to process contract"
                );
                stats.errors.push(format!("{}: {}", contract.contract_id, e));
            }
        }

        Ok(())
    }

    async fn process_contract(
        &self,
        resolver: &EntityResolver,
        contract: &Contract,
        stats: &mut PipelineRunStats,
    ) -> Result<(), AppError> {
        let Some(resolved) = resolver.resolve(&contract.awardee_name) else {
            return Ok(());
        };
        stats.entities_matched += 1;
        tracing::debug!(
            awardee = %contract.awardee_name,
            ticker = %resolved.ticker,
            confidence = resolved.confidence,
            "Matched awardee"
        );

        let Some(quote) = self.market.quote(&resolved.ticker).await? else {
            tracing::debug!(ticker = %resolved.ticker, "No quote available, skipping");
            return Ok(());
        };

        let Some(score) = valuation::score_signal(
            &quote,
            contract.award_amount,
            contract.potential_ceiling,
            &self.limits,
        ) else {
            return Ok(());
        };

        // Price reaction is best-effort; a signal without it is still a signal
        let price_evolution = match self.market.price_series(&resolved.ticker).await {
            Ok(series) => prices::evolution(&series),
            Err(e) => {
                tracing::warn!(ticker = %resolved.ticker, error = %e, "Price history unavailable");
                PriceEvolution::default()
            }
        };

        let signal = NewSignal {
            contract_id: contract.contract_id.clone(),
            ticker: resolved.ticker.clone(),
            agency_name: Some(contract.agency_name.clone()),
            contract_description: contract.description.clone(),
            award_amount: contract.award_amount,
            potential_ceiling: contract.potential_ceiling,
            market_cap_at_time: Some(score.market_cap as f64),
            impact_ratio: score.impact_ratio,
            contract_date: contract.contract_date,
            sam_gov_url: contract.sam_gov_url.clone(),
            prices: price_evolution,
        };

        // Re-ingesting the same transaction is a no-op
        if self.repo.insert_signal(&signal).await? {
            stats.signals_created += 1;
            tracing::info!(
                ticker = %resolved.ticker,
                award_amount = contract.award_amount,
                impact_ratio = score.impact_ratio,
                "New signal detected"
            );
        }

        Ok(())
    }

    /// Scheduler status for the API.
    pub async fn status(&self) -> PipelineStatusResponse {
        let last = self.last_run.read().await.clone();
        let next_run = *self.next_run.read().await;

        PipelineStatusResponse {
            status: last
                .as_ref()
                .map(|s| s.status.as_str().to_string())
                .unwrap_or_else(|| "idle".to_string()),
            last_run: last.as_ref().map(|s| s.started_at),
            next_run,
            last_result: last,
        }
    }

    /// Spawn the periodic scheduler. The first run fires one interval after
    /// startup.
    pub fn spawn_scheduler(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = std::time::Duration::from_secs(self.config.pipeline_interval_minutes * 60);
            let chrono_period = Duration::minutes(self.config.pipeline_interval_minutes as i64);

            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            *self.next_run.write().await = Some(Utc::now() + chrono_period);

            tracing::info!(
                interval_minutes = self.config.pipeline_interval_minutes,
                "Pipeline scheduler started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run().await;
                        *self.next_run.write().await = Some(Utc::now() + chrono_period);
                    }
                    _ = shutdown.cancelled() => {
                        tracing::info!("Pipeline scheduler received shutdown signal");
                        break;
                    }
                }
            }
        })
    }
}
