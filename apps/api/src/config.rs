use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// What the generator does when no completion could be obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Surface the error to the caller.
    #[default]
    Propagate,
    /// Substitute the static sample questions and log a warning.
    Fallback,
}

impl FromStr for FailureMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(FailureMode::Propagate),
            "fallback" => Ok(FailureMode::Fallback),
            other => bail!("unknown failure mode '{other}' (expected 'propagate' or 'fallback')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Optional so the service can boot without it; every generation call then
    /// fails with a configuration error (or falls back, per `failure_mode`).
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub failure_mode: FailureMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            failure_mode: std::env::var("ASSESSMENT_ON_FAILURE")
                .map(|v| v.parse::<FailureMode>())
                .unwrap_or(Ok(FailureMode::default()))
                .context("ASSESSMENT_ON_FAILURE is invalid")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
