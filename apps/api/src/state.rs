use std::sync::Arc;

use crate::config::Config;
use crate::interview::store::ResultStore;
use crate::pipeline::PipelineOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-run data; every request gets its own pipeline run.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<PipelineOrchestrator>,
    /// `None` when PERSIST_RESULTS=false.
    pub results: Option<ResultStore>,
}
