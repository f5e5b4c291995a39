//! LLM Client: the single point of entry for all model calls in the interview service.
//!
//! ARCHITECTURAL RULE: No other module may call a model provider directly.
//! Pipeline stages only see `Arc<dyn CompletionModel>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{LlmProvider, LlmSettings};

pub mod anthropic;
pub mod gemini;
pub mod prompts;
pub mod retry;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use retry::{RetryPolicy, RetryingModel, TokioSleeper};

/// Per-request timeout for provider calls. Long answers take a while.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    /// Network failures, rate limits and provider-side 5xx are worth another attempt.
    /// Everything else (bad key, bad request, malformed body) fails fast.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Text-completion capability the pipeline depends on.
///
/// Implementations make one attempt per call; retrying lives in [`RetryingModel`].
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model identifier, for logging.
    fn model_id(&self) -> &str;

    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

/// Builds the configured provider wrapped in the default retry policy.
pub fn build_model(settings: &LlmSettings) -> Result<Arc<dyn CompletionModel>, LlmError> {
    let policy = RetryPolicy::linear(settings.max_attempts, Duration::from_secs(5));

    let model: Arc<dyn CompletionModel> = match settings.provider {
        LlmProvider::Gemini => {
            let client = GeminiClient::new(
                settings.base_url.clone(),
                settings.model.clone(),
                settings.api_key.clone(),
            )?;
            Arc::new(RetryingModel::new(client, policy, TokioSleeper))
        }
        LlmProvider::Anthropic => {
            let client = AnthropicClient::new(
                settings.base_url.clone(),
                settings.model.clone(),
                settings.api_key.clone(),
            )?;
            Arc::new(RetryingModel::new(client, policy, TokioSleeper))
        }
    };

    Ok(model)
}
