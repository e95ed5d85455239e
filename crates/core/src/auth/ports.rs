//! Port interfaces for session token management
//!
//! These traits define the boundaries between the token manager and the
//! infrastructure it drives: a persistent store of issued tokens and the
//! remote session endpoints.

use async_trait::async_trait;
use fmdata_domain::{Result, TokenRecord};

/// Append-only persistence for issued session tokens.
///
/// Implementations own their connection lifecycle; callers never open or
/// close anything explicitly.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The most recently inserted record, or `None` when the store is empty.
    ///
    /// # Errors
    /// Returns error if the store cannot be read
    async fn find_latest(&self) -> Result<Option<TokenRecord>>;

    /// Append a new token record.
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    async fn insert(&self, token: &str) -> Result<TokenRecord>;
}

/// Result of probing a session token against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionProbe {
    /// The server authenticated the request.
    Accepted,
    /// The server reported the token as invalid (code 952).
    Invalid,
}

/// Remote session endpoints.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Create a session with the configured credentials and return its token.
    ///
    /// # Errors
    /// Returns error if the credentials are rejected or the server is
    /// unreachable
    async fn create_session(&self) -> Result<String>;

    /// Check whether `token` is still accepted.
    ///
    /// A probe the server answers (with or without an error code) yields a
    /// [`SessionProbe`]; only transport failures are errors.
    ///
    /// # Errors
    /// Returns error if the server could not be reached
    async fn probe_session(&self, token: &str) -> Result<SessionProbe>;
}
