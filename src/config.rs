//! Client configuration from the environment

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
/// Answer evaluation is LLM-backed and can take a while
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Configuration for talking to the Question Service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub service_url: String,
    /// Session cookie value issued by the backend after login
    pub session_token: String,
    pub request_timeout: Duration,
    /// Attempts for `getQuestion`, the only retried operation
    pub fetch_attempts: u32,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let service_url = lookup("QUIZ_SERVICE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        let session_token = lookup("QUIZ_SESSION_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("QUIZ_SESSION_TOKEN"))?;

        let timeout_secs = parse_positive(
            "QUIZ_REQUEST_TIMEOUT_SECS",
            lookup("QUIZ_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let fetch_attempts = parse_positive(
            "QUIZ_FETCH_ATTEMPTS",
            lookup("QUIZ_FETCH_ATTEMPTS"),
            DEFAULT_FETCH_ATTEMPTS,
        )?;

        Ok(Self {
            service_url,
            session_token,
            request_timeout: Duration::from_secs(timeout_secs),
            fetch_attempts,
        })
    }
}

fn parse_positive<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value >= T::from(1) => Ok(value),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}
