//! Retrying wrapper around any `CompletionModel`.
//!
//! Only transient errors (see `LlmError::is_transient`) are retried. The sleep is
//! injected so the schedule can be tested without waiting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{CompletionModel, LlmError};

/// How long to wait before attempt `n + 1`, given the 1-based attempt `n` that just failed.
pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    backoff: BackoffFn,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: BackoffFn) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// `step * n` after the n-th failure: 5s, 10s, ... for a 5s step.
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self::new(max_attempts, Arc::new(move |attempt| step * attempt))
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        (self.backoff)(attempt)
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct RetryingModel<M, S = TokioSleeper> {
    inner: M,
    policy: RetryPolicy,
    sleeper: S,
}

impl<M, S> RetryingModel<M, S>
where
    M: CompletionModel,
    S: Sleeper,
{
    pub fn new(inner: M, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }
}

#[async_trait]
impl<M, S> CompletionModel for RetryingModel<M, S>
where
    M: CompletionModel,
    S: Sleeper,
{
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let mut attempt = 1;
        loop {
            let err = match self.inner.complete(prompt, system).await {
                Ok(text) => return Ok(text),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => e,
            };

            if attempt >= self.policy.max_attempts {
                return Err(LlmError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                "Model call attempt {}/{} failed ({}), retrying in {}s",
                attempt,
                self.policy.max_attempts,
                err,
                delay.as_secs()
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
