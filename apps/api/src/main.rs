mod config;
mod errors;
mod github;
mod interview;
mod llm_client;
mod pipeline;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::github::GitHubClient;
use crate::interview::store::ResultStore;
use crate::llm_client::build_model;
use crate::pipeline::PipelineOrchestrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing model API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model capability (provider + retry policy)
    let model = build_model(&config.llm).context("Failed to build LLM client")?;
    info!(
        "LLM client initialized ({:?}, model: {}, attempts: {})",
        config.llm.provider,
        model.model_id(),
        config.llm.max_attempts
    );

    // Initialize GitHub fetcher
    let github = GitHubClient::new(config.github_api_url.clone(), config.github_timeout)
        .context("Failed to build GitHub client")?;
    info!(
        "GitHub client initialized ({}, timeout {}s)",
        config.github_api_url,
        config.github_timeout.as_secs()
    );

    let orchestrator = PipelineOrchestrator::new(model, Arc::new(github))?;

    let results = config
        .persist_results
        .then(|| ResultStore::new(config.results_dir.clone()));
    if results.is_some() {
        info!("Persisting results to {}", config.results_dir.display());
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        orchestrator: Arc::new(orchestrator),
        results,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
