//! API-specific error types
//!
//! Provides error classification for Data API operations.

use fmdata_core::TokenManagerError;
use fmdata_domain::{FmDataError, RemoteError};
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// No usable session token could be obtained
    Authentication,
    /// The server answered with an error body
    Remote,
    /// Network/connection errors
    Network,
    /// A payload could not be encoded or decoded
    Protocol,
    /// Configuration errors
    Config,
}

/// Data API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Error body returned by the server, unchanged.
    #[error("Remote error: {0}")]
    Remote(RemoteError),

    #[error("Network error: {0}")]
    Network(String),

    /// Request body could not be encoded, or the response is not the
    /// expected Data API shape.
    #[error("Malformed payload: {0}")]
    Protocol(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Remote(_) | Self::NotFound(_) => ApiErrorCategory::Remote,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Protocol(_) => ApiErrorCategory::Protocol,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// The server's error body, when the server produced one.
    #[must_use]
    pub const fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

impl From<FmDataError> for ApiError {
    fn from(err: FmDataError) -> Self {
        match err {
            FmDataError::Remote(remote) => Self::Remote(remote),
            FmDataError::Network(message) => Self::Network(message),
            FmDataError::Auth(message) => Self::Auth(message),
            FmDataError::Config(message) => Self::Config(message),
            FmDataError::NotFound(message) => Self::NotFound(message),
            FmDataError::InvalidInput(message) => Self::Protocol(message),
            FmDataError::Database(message) | FmDataError::Internal(message) => {
                Self::Config(message)
            }
        }
    }
}

impl From<TokenManagerError> for ApiError {
    fn from(err: TokenManagerError) -> Self {
        match err {
            TokenManagerError::Authentication(inner) => Self::Auth(inner.to_string()),
            TokenManagerError::ProbeFailed(inner) => Self::from(inner),
        }
    }
}

impl From<ApiError> for FmDataError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => Self::Auth(message),
            ApiError::Remote(remote) => Self::Remote(remote),
            ApiError::Network(message) => Self::Network(message),
            ApiError::Protocol(message) => Self::InvalidInput(message),
            ApiError::NotFound(message) => Self::NotFound(message),
            ApiError::Config(message) => Self::Config(message),
        }
    }
}
