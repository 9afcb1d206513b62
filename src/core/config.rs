//! Application configuration loaded from the environment (and `.env` via dotenv).

use std::env;
use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9090";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_HISTORY: u32 = 200;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the AI service, without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    /// Maximum number of history entries kept on disk (0 = unlimited).
    pub max_history: u32,
    pub save_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_history: DEFAULT_MAX_HISTORY,
            save_history: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AVIDIA_BASE_URL is not a valid http(s) URL: {0}")]
    InvalidBaseUrl(String),
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("AVIDIA_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
    #[error("{var} must be true or false, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Load configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|key| env::var(key).ok())
}

/// Build a config from an arbitrary variable lookup. Empty values count as unset.
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let defaults = Config::default();

    let base_url = match get("AVIDIA_BASE_URL") {
        Some(url) => validate_base_url(&url)?,
        None => defaults.base_url,
    };

    let timeout = match get("AVIDIA_TIMEOUT_SECS") {
        Some(v) => {
            let secs: u64 = parse_number("AVIDIA_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout);
            }
            Duration::from_secs(secs)
        }
        None => defaults.timeout,
    };

    let max_history = match get("AVIDIA_MAX_HISTORY") {
        Some(v) => parse_number("AVIDIA_MAX_HISTORY", &v)?,
        None => defaults.max_history,
    };

    let save_history = match get("AVIDIA_SAVE_HISTORY") {
        Some(v) => parse_bool("AVIDIA_SAVE_HISTORY", &v)?,
        None => defaults.save_history,
    };

    Ok(Config {
        base_url,
        timeout,
        max_history,
        save_history,
    })
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl(format!("{} ({})", raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
