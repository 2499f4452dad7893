//! Government Contract Signal Detection Backend
//!
//! Polls the USASpending.gov transaction feed, resolves awardees to stock
//! tickers, scores contract impact against market cap and serves qualifying
//! signals over a REST API backed by PostgreSQL.

mod api;
mod config;
mod db;
mod errors;
mod ingest;
mod market;
mod models;
mod pipeline;
mod resolve;
mod seed;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use ingest::IngestClient;
use market::MarketClient;
use pipeline::Pipeline;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Government Contract Signal Detection Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.mock_mode() {
        tracing::warn!(
            "No SAM_GOV_API_KEY configured. Running in mock mode against embedded fixtures!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.database_url).await?;
    let repo = Arc::new(Repository::new(pool));
    let config = Arc::new(config);

    // Seed company reference data on first boot
    let market = MarketClient::from_config(&config);
    let seeded = seed::seed_if_empty(&repo, &market).await?;
    if seeded > 0 {
        tracing::info!(seeded, "Company table seeded");
    }

    // Assemble the pipeline and start the scheduler
    let ingest = IngestClient::from_config(&config);
    let pipeline = Arc::new(Pipeline::new(repo.clone(), ingest, market, config.clone()));

    let shutdown = CancellationToken::new();
    let scheduler = pipeline.clone().spawn_scheduler(shutdown.clone());
    tracing::info!(
        "Pipeline auto-fetching every {} minutes",
        config.pipeline_interval_minutes
    );

    // Create application state
    let state = AppState {
        repo,
        config: config.clone(),
        pipeline,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    let _ = scheduler.await;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Signals
        .route("/signals", get(api::list_signals))
        .route("/signals/{id}", get(api::get_signal))
        // Companies
        .route("/companies", get(api::search_companies))
        .route("/companies/{ticker}", get(api::get_company))
        // Pipeline
        .route("/pipeline/run", post(api::run_pipeline))
        .route("/pipeline/status", get(api::pipeline_status));

    // Service descriptor and health check
    let service_routes = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(service_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service descriptor returned at the root.
#[derive(Debug, Serialize)]
struct ServiceInfo {
    name: &'static str,
    status: &'static str,
    version: &'static str,
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "govcontract-backend",
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check payload.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        database: state.repo.ping().await,
    })
}

#[cfg(test)]
mod tests;
