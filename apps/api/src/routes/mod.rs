pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::interview::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form posts from the browser page and JSON API clients share one handler.
        .route("/generate", post(handlers::handle_generate))
        .route("/api/generate", post(handlers::handle_generate))
        .fallback(not_found)
        .with_state(state)
}
