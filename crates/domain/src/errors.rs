//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RemoteError;

/// Main error type for fmdata
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FmDataError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The Data API answered with an error payload.
    #[error("Remote error: {0}")]
    Remote(RemoteError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for fmdata operations
pub type Result<T> = std::result::Result<T, FmDataError>;
