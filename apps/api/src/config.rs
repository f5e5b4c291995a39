use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{anthropic, gemini};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Which hosted model answers the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Anthropic,
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => bail!("Unknown LLM_PROVIDER '{other}' (expected 'gemini' or 'anthropic')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub max_attempts: u32,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the model API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub github_api_url: String,
    pub github_timeout: Duration,
    pub pipeline_timeout: Duration,
    pub results_dir: PathBuf,
    pub persist_results: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider: LlmProvider = var("LLM_PROVIDER")
            .unwrap_or_else(|| "gemini".to_string())
            .parse()?;

        let (key_var, default_model, default_base_url) = match provider {
            LlmProvider::Gemini => (
                "GOOGLE_API_KEY",
                gemini::DEFAULT_MODEL,
                gemini::DEFAULT_BASE_URL,
            ),
            LlmProvider::Anthropic => (
                "ANTHROPIC_API_KEY",
                anthropic::DEFAULT_MODEL,
                anthropic::DEFAULT_BASE_URL,
            ),
        };

        let api_key = var(key_var)
            .with_context(|| format!("Required environment variable '{key_var}' is not set"))?;

        let llm = LlmSettings {
            provider,
            model: var("LLM_MODEL").unwrap_or_else(|| default_model.to_string()),
            api_key,
            base_url: var("LLM_BASE_URL").unwrap_or_else(|| default_base_url.to_string()),
            max_attempts: parse_or(var("LLM_MAX_ATTEMPTS"), 3, "LLM_MAX_ATTEMPTS")?,
        };

        Ok(Config {
            llm,
            github_api_url: var("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_timeout: Duration::from_secs(parse_or(
                var("GITHUB_TIMEOUT_SECS"),
                10,
                "GITHUB_TIMEOUT_SECS",
            )?),
            pipeline_timeout: Duration::from_secs(parse_or(
                var("PIPELINE_TIMEOUT_SECS"),
                600,
                "PIPELINE_TIMEOUT_SECS",
            )?),
            results_dir: PathBuf::from(var("RESULTS_DIR").unwrap_or_else(|| "results".to_string())),
            persist_results: parse_or(var("PERSIST_RESULTS"), true, "PERSIST_RESULTS")?,
            port: parse_or(var("PORT"), 5000, "PORT")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{v}'")),
        None => Ok(default),
    }
}
