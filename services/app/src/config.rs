//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Cloud project the note collection lives in.
    pub project_id: String,
    /// API key sent with every backend request.
    pub api_key: String,
    /// Bucket the photo blobs are uploaded to.
    pub storage_bucket: String,
    pub log_level: Level,
    /// How often the live-query poller re-runs the owner's query.
    pub feed_poll_interval: Duration,
    /// Credentials the binary signs in with.
    pub email: String,
    pub password: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let project_id = std::env::var("DAILY_MEMO_PROJECT_ID")
            .map_err(|_| ConfigError::MissingVar("DAILY_MEMO_PROJECT_ID".to_string()))?;

        let api_key = std::env::var("DAILY_MEMO_API_KEY")
            .map_err(|_| ConfigError::MissingVar("DAILY_MEMO_API_KEY".to_string()))?;

        let storage_bucket = std::env::var("DAILY_MEMO_STORAGE_BUCKET")
            .unwrap_or_else(|_| format!("{}.appspot.com", project_id));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let poll_ms_str =
            std::env::var("DAILY_MEMO_POLL_INTERVAL_MS").unwrap_or_else(|_| "2000".to_string());
        let poll_ms = poll_ms_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("DAILY_MEMO_POLL_INTERVAL_MS".to_string(), e.to_string())
        })?;

        let email = std::env::var("DAILY_MEMO_EMAIL")
            .map_err(|_| ConfigError::MissingVar("DAILY_MEMO_EMAIL".to_string()))?;
        let password = std::env::var("DAILY_MEMO_PASSWORD")
            .map_err(|_| ConfigError::MissingVar("DAILY_MEMO_PASSWORD".to_string()))?;

        Ok(Self {
            project_id,
            api_key,
            storage_bucket,
            log_level,
            feed_poll_interval: Duration::from_millis(poll_ms),
            email,
            password,
        })
    }
}
