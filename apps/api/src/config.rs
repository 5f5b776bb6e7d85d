use anyhow::{Context, Result};
use std::time::Duration;

/// Application configuration loaded from environment variables.
/// Startup fails if the inference credential is missing — a request made
/// with empty auth would only surface later as a confusing upstream 401.
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_api_token: String,
    pub hf_model: String,
    pub hf_api_base: String,
    pub port: u16,
    pub rust_log: String,
    /// Total call budget for retryable failures (timeout, transport, HTTP error).
    pub max_retries: u32,
    /// Per-attempt HTTP timeout.
    pub request_timeout: Duration,
    /// First backoff delay; doubles on every subsequent wait.
    pub initial_backoff: Duration,
    /// CV text beyond this many characters is not sent to the model.
    /// Lossy: a cost/latency control, not a correctness one.
    pub prompt_char_budget: usize,
    /// `max_length` generation parameter passed to the inference API.
    pub max_length: u32,
    /// Synthesize a templated analysis when the model output lacks the
    /// score marker. Off by default; see `analysis::fallback`.
    pub enable_fallback_analysis: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            hf_api_token: require_env("HF_API_TOKEN")?,
            hf_model: env_or("HF_MODEL", "google/flan-t5-xxl"),
            hf_api_base: env_or("HF_API_BASE", "https://api-inference.huggingface.co"),
            port: parse_env("PORT", 8080u16)?,
            rust_log: env_or("RUST_LOG", "info"),
            max_retries: parse_env("ANALYSIS_MAX_RETRIES", 3u32)?,
            request_timeout: Duration::from_secs(parse_env("ANALYSIS_TIMEOUT_SECS", 30u64)?),
            initial_backoff: Duration::from_secs(parse_env(
                "ANALYSIS_INITIAL_BACKOFF_SECS",
                1u64,
            )?),
            prompt_char_budget: parse_env("PROMPT_CHAR_BUDGET", 3500usize)?,
            max_length: parse_env("GENERATION_MAX_LENGTH", 500u32)?,
            enable_fallback_analysis: parse_env("ENABLE_FALLBACK_ANALYSIS", false)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
