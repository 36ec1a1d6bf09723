use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::DEFAULT_API_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Posts API
    pub api_base_url: String,
    pub request_timeout: Duration,

    // Session storage
    pub session_store_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub load_refresh: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default, so an empty environment yields a
    /// usable local setup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Posts API
            api_base_url: env_or_default("API_BASE_URL", DEFAULT_API_BASE_URL),
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),

            // Session storage
            session_store_path: PathBuf::from(env_or_default(
                "SESSION_STORE_PATH",
                "./data/session.json",
            )),

            // Web Server
            web_host: env_or_default("WEB_HOST", "127.0.0.1"),
            web_port: parse_env_u16("WEB_PORT", 3000)?,
            load_refresh: Duration::from_secs(parse_env_u64("LOAD_REFRESH_SECS", 1)?),
        })
    }

    /// Configuration with local defaults, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(5),
            session_store_path: PathBuf::from("./data/test-session.json"),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            load_refresh: Duration::from_secs(1),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.api_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    name: "API_BASE_URL".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    name: "API_BASE_URL".to_string(),
                    message: e.to_string(),
                });
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.load_refresh.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "LOAD_REFRESH_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
