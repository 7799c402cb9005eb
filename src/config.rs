//! Server configuration from environment variables.
//!
//! `HOST` (default 0.0.0.0), `PORT` (default 8000), `TOKEN_TTL_HOURS` (default 24).
//! Log filtering goes through `RUST_LOG` and is handled by env_logger.

use chrono::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// How long a login token stays valid.
    pub token_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            token_ttl: Duration::hours(24),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
                expected: "a port number",
            })?,
            None => defaults.port,
        };
        let token_ttl = match lookup("TOKEN_TTL_HOURS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .and_then(Duration::try_hours)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "TOKEN_TTL_HOURS",
                    value,
                    expected: "a positive number of hours",
                })?,
            None => defaults.token_ttl,
        };
        Ok(Self {
            host,
            port,
            token_ttl,
        })
    }
}
