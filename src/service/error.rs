//! Question Service error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Question Service error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Network, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::InvalidRequest, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unknown, message)
    }
}

/// Error classification for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    /// Network issues, timeouts - retryable
    Network,
    /// Server error (5xx) - retryable
    ServerError,
    /// Session cookie rejected (401, 403) - not retryable
    Auth,
    /// Bad request, unknown session (4xx) - not retryable
    InvalidRequest,
    /// Response did not have the expected shape
    Malformed,
    /// Unknown error
    Unknown,
}

impl ServiceErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::ServerError)
    }
}
