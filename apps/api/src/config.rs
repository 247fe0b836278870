use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables at startup.
/// Every value has a default suitable for local development, so the service
/// runs with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub resumes_dir: PathBuf,
    /// Age-based retention for stored resumes, in days. `None` keeps them
    /// forever.
    pub resume_retention_days: Option<u32>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.2:3b-instruct-q4_K_M"),
            resumes_dir: PathBuf::from(env_or("RESUMES_DIR", "./data/resumes")),
            resume_retention_days: match std::env::var("RESUME_RETENTION_DAYS") {
                Ok(days) => Some(
                    days.parse::<u32>()
                        .context("RESUME_RETENTION_DAYS must be a whole number of days")?,
                ),
                Err(_) => None,
            },
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
