//! services/meter_service/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_FORMATTING_ENDPOINT: &str = "https://apihub.staging.appply.link/chatgpt";
pub const DEFAULT_FORMATTING_PROMPT: &str = "Sie sind ein hilfreicher Assistent. Bitte formatieren Sie die folgenden Daten für eine Google-Tabelle.";

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
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub cors_origin: String,
    pub formatting_endpoint: String,
    pub formatting_model: String,
    pub formatting_prompt: String,
    pub formatting_api_key: Option<String>,
    /// Overall request timeout; the HTTP client default when unset.
    pub formatting_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server and Storage Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://meter_capture.db?mode=rwc".to_string());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Formatting Endpoint ---
        let formatting_endpoint = lookup("FORMATTING_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_FORMATTING_ENDPOINT.to_string());
        if formatting_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingVar("FORMATTING_ENDPOINT".to_string()));
        }
        let formatting_model =
            lookup("FORMATTING_MODEL").unwrap_or_else(|| "gpt-4o".to_string());
        let formatting_prompt = lookup("FORMATTING_PROMPT")
            .unwrap_or_else(|| DEFAULT_FORMATTING_PROMPT.to_string());
        let formatting_api_key = lookup("FORMATTING_API_KEY").filter(|k| !k.is_empty());

        let formatting_timeout = lookup("FORMATTING_TIMEOUT_SECS")
            .map(|timeout_str| {
                timeout_str.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    ConfigError::InvalidValue(
                        "FORMATTING_TIMEOUT_SECS".to_string(),
                        format!("'{}' is not a number of seconds", timeout_str),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            formatting_endpoint,
            formatting_model,
            formatting_prompt,
            formatting_api_key,
            formatting_timeout,
        })
    }
}
