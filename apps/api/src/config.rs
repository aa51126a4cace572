use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    /// Flat JSON file holding every curriculum record.
    pub curricula_file: PathBuf,
    /// Fixed export target. Every PDF export overwrites it.
    pub pdf_output_path: PathBuf,
    /// A session idle for longer than this is dropped.
    pub session_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            curricula_file: optional_env("CURRICULA_FILE", "curricula.json").into(),
            pdf_output_path: optional_env("PDF_OUTPUT_PATH", "curriculum.pdf").into(),
            session_idle_ttl: Duration::from_secs(
                optional_env("SESSION_IDLE_TTL_SECS", "3600")
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            ),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
