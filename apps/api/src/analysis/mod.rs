//! Analysis Client — the single point of entry for all inference calls.
//!
//! No other module may talk to the hosted inference API directly; everything
//! goes through [`AnalysisClient`], which owns prompt construction, input
//! truncation, and the retry/backoff policy. The remote call itself sits
//! behind the [`TextGenerator`] trait so tests can script deterministic
//! 503/timeout/success sequences against a fake.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub mod fallback;
pub mod handlers;
pub mod hf;
pub mod prompts;

/// Failure classes for a single generation attempt. The retry machine keys
/// off these: `Warming` and the transport/HTTP classes are retryable,
/// `Malformed` is terminal (a structurally wrong 200 body will not improve
/// on retry).
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request timed out")]
    Timeout,

    #[error("service warming up (HTTP 503)")]
    Warming,

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response format: {0}")]
    Malformed(String),
}

/// Generation parameters forwarded to the inference API. Deterministic
/// decoding (`do_sample = false`) and a bounded `max_length` keep output
/// reproducible and short enough to parse.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_length: u32,
    pub temperature: Option<f32>,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 500,
            temperature: None,
            do_sample: false,
        }
    }
}

/// The remote text-generation seam. Production uses [`hf::HfTextGenerator`];
/// tests substitute a scripted fake.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerateError>;
}

/// Terminal outcome of an analysis request, after retries are spent.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no text to analyze")]
    EmptyInput,

    #[error("analysis request timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("inference service returned HTTP {status} after {attempts} attempts: {message}")]
    Http {
        status: u16,
        message: String,
        attempts: u32,
    },

    #[error("could not reach inference service after {attempts} attempts: {message}")]
    Transport { message: String, attempts: u32 },

    #[error("inference service still warming up after {attempts} attempts")]
    StillWarming { attempts: u32 },

    #[error("unexpected response format from inference service: {0}")]
    Malformed(String),
}

/// Upper bound on a single backoff sleep. The doubling sequence has no
/// natural ceiling, and a misconfigured retry count must not turn into
/// minute-long stalls.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Call budget for retryable errors; also the cap on 503 warming waits.
    pub max_retries: u32,
    /// First backoff delay; doubles on every subsequent wait.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exact exponential doubling: initial, 2×initial, 4×initial, ...,
    /// capped at [`MAX_BACKOFF`].
    fn delay(&self, step: u32) -> Duration {
        self.initial_backoff
            .checked_mul(2u32.saturating_pow(step))
            .map(|d| d.min(MAX_BACKOFF))
            .unwrap_or(MAX_BACKOFF)
    }
}

#[derive(Clone)]
pub struct AnalysisClient {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
    policy: RetryPolicy,
    prompt_char_budget: usize,
}

impl AnalysisClient {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        params: GenerationParams,
        policy: RetryPolicy,
        prompt_char_budget: usize,
    ) -> Self {
        Self {
            generator,
            params,
            policy,
            prompt_char_budget,
        }
    }

    /// Runs one analysis: builds the prompt from `text` (truncated to the
    /// configured budget) and drives the generator through the retry policy.
    /// Empty or whitespace-only input short-circuits before any network call.
    pub async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let prompt = prompts::build_prompt(text, self.prompt_char_budget);
        self.call_with_retry(&prompt).await
    }

    /// The retry/backoff state machine.
    ///
    /// Two budgets share one doubling backoff sequence: retryable errors
    /// (timeout, transport, HTTP) may consume up to `max_retries` calls in
    /// total, while 503 warming waits have their own `max_retries` budget —
    /// a model being loaded is expected behavior, not a failure, and must
    /// not eat the budget reserved for real errors.
    async fn call_with_retry(&self, prompt: &str) -> Result<String, AnalysisError> {
        let mut error_attempts: u32 = 0;
        let mut warming_waits: u32 = 0;
        let mut backoff_step: u32 = 0;

        loop {
            let attempt = error_attempts + warming_waits + 1;
            match self.generator.generate(prompt, &self.params).await {
                Ok(body) => {
                    debug!(attempt, "analysis generation succeeded");
                    return Ok(body);
                }
                Err(GenerateError::Malformed(message)) => {
                    return Err(AnalysisError::Malformed(message));
                }
                Err(GenerateError::Warming) => {
                    if warming_waits >= self.policy.max_retries {
                        return Err(AnalysisError::StillWarming { attempts: attempt });
                    }
                    let delay = self.policy.delay(backoff_step);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "inference service warming up, waiting before retry"
                    );
                    tokio::time::sleep(delay).await;
                    warming_waits += 1;
                    backoff_step += 1;
                }
                Err(err) => {
                    error_attempts += 1;
                    if error_attempts >= self.policy.max_retries {
                        return Err(exhausted(err, attempt));
                    }
                    let delay = self.policy.delay(backoff_step);
                    warn!(
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "analysis attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    backoff_step += 1;
                }
            }
        }
    }
}

fn exhausted(last: GenerateError, attempts: u32) -> AnalysisError {
    match last {
        GenerateError::Timeout => AnalysisError::Timeout { attempts },
        GenerateError::Http { status, message } => AnalysisError::Http {
            status,
            message,
            attempts,
        },
        GenerateError::Transport(message) => AnalysisError::Transport { message, attempts },
        GenerateError::Warming => AnalysisError::StillWarming { attempts },
        GenerateError::Malformed(message) => AnalysisError::Malformed(message),
    }
}
