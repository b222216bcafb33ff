//! Oracle settings read from the environment.

use dpdpa_core::oracle::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use dpdpa_core::oracle::OracleConfig;
use url::Url;

/// Variables:
/// - `OPENAI_API_KEY` (required)
/// - `DPDPA_ORACLE_BASE_URL` (default: `https://api.openai.com/v1`)
/// - `DPDPA_ORACLE_MODEL` (default: `gpt-3.5-turbo`)
/// - `DPDPA_ORACLE_TIMEOUT_SECS` (default: 60)
pub fn oracle_config_from_env() -> Result<OracleConfig, ConfigError> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)?;
    Ok(OracleConfig {
        base_url: env_url("DPDPA_ORACLE_BASE_URL", DEFAULT_BASE_URL)?,
        api_key,
        model: std::env::var("DPDPA_ORACLE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        timeout_secs: env_u64("DPDPA_ORACLE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
    })
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_u64(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
}
