use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MINI_MODEL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model_generation: String,
    pub model_generation_mini: String,
    pub request_timeout_seconds: u64,
    /// Firecrawl is skipped entirely when no key is configured.
    pub firecrawl_api_key: Option<String>,
    pub scrape_timeout_seconds: u64,
    pub user_agent: String,
    pub config_cache_ttl_seconds: u64,
    pub data_dir: String,
    pub cors_allow_origins: String,
    pub enable_llm_page_scoring: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model_generation: env_or("MODEL_GENERATION", DEFAULT_MODEL),
            model_generation_mini: env_or("MODEL_GENERATION_MINI", DEFAULT_MINI_MODEL),
            request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECONDS", 20)?,
            firecrawl_api_key: std::env::var("FIRECRAWL_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            scrape_timeout_seconds: parse_env("SCRAPE_TIMEOUT_SECONDS", 6)?,
            user_agent: env_or("USER_AGENT", "RH-Edu-Ads-Bot/1.0"),
            config_cache_ttl_seconds: parse_env("CONFIG_CACHE_TTL_SECONDS", 600)?,
            data_dir: env_or("DATA_DIR", "data"),
            cors_allow_origins: env_or("CORS_ALLOW_ORIGINS", "http://localhost:3000"),
            enable_llm_page_scoring: parse_env("ENABLE_LLM_PAGE_SCORING", false)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_seconds)
    }

    pub fn config_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config_cache_ttl_seconds)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allow_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
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
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
