//! Session token manager
//!
//! Manages the Data API session token lifecycle:
//! - Lookup of the most recently issued token in the token store
//! - Session creation when no token is stored
//! - Validation of the token against the server before handing it out
//! - Replacement of tokens the server reports as invalid (code 952)
//!
//! Acquisitions are serialized: while one caller is creating a session the
//! others wait and then pick up the freshly stored token instead of creating
//! sessions of their own.

use std::sync::Arc;
use std::time::Duration;

use fmdata_domain::utils::redact;
use fmdata_domain::FmDataError;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::ports::{SessionGateway, SessionProbe, TokenStore};

/// Error type for token manager operations
#[derive(Debug, Error)]
pub enum TokenManagerError {
    /// The server refused to create a session (or could not be reached).
    #[error("session creation failed: {0}")]
    Authentication(FmDataError),

    /// The validation probe did not reach the server.
    #[error("session probe failed: {0}")]
    ProbeFailed(FmDataError),
}

impl From<TokenManagerError> for FmDataError {
    fn from(err: TokenManagerError) -> Self {
        match err {
            TokenManagerError::Authentication(inner) => {
                Self::Auth(format!("session creation failed: {inner}"))
            }
            TokenManagerError::ProbeFailed(inner) => inner,
        }
    }
}

#[derive(Clone)]
struct ValidatedToken {
    token: String,
    validated_at: Instant,
}

/// Token manager producing tokens the server currently accepts.
///
/// Owns no connection state: the store and the gateway are injected once and
/// shared for the lifetime of the manager.
pub struct TokenManager<G: SessionGateway + 'static, S: TokenStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    slot: Mutex<Option<ValidatedToken>>,
    validation_ttl: Duration,
}

impl<G: SessionGateway + 'static, S: TokenStore + 'static> TokenManager<G, S> {
    /// Create a new token manager
    ///
    /// # Arguments
    /// * `gateway` - Remote session endpoints
    /// * `store` - Persistent token store
    #[must_use]
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self { gateway, store, slot: Mutex::new(None), validation_ttl: Duration::ZERO }
    }

    /// Skip the probe for tokens validated less than `ttl` ago.
    ///
    /// The default of zero probes on every acquisition.
    #[must_use]
    pub const fn with_validation_ttl(mut self, ttl: Duration) -> Self {
        self.validation_ttl = ttl;
        self
    }

    /// Get a token the server accepts right now
    ///
    /// This is the primary method for retrieving tokens. Looks up the latest
    /// stored token (creating a session when there is none), probes it and
    /// replaces it once if the server reports it as invalid.
    ///
    /// # Errors
    /// Returns error if:
    /// - A session had to be created and the server refused it
    /// - The probe could not reach the server
    pub async fn acquire_valid_token(&self) -> Result<String, TokenManagerError> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) =
            slot.as_ref().filter(|cached| cached.validated_at.elapsed() < self.validation_ttl)
        {
            debug!(token = %redact(&cached.token), "reusing recently validated session token");
            return Ok(cached.token.clone());
        }

        let resolved = self.resolve().await;

        // A failed acquisition never leaves a rejected token behind.
        *slot = resolved
            .as_ref()
            .ok()
            .map(|token| ValidatedToken { token: token.clone(), validated_at: Instant::now() });
        drop(slot);

        resolved
    }

    /// Forget the cached token so the next acquisition runs every phase.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
        debug!("cached session token invalidated");
    }

    /// The last token handed out, if any (without validation).
    pub async fn cached_token(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|cached| cached.token.clone())
    }

    /// Get the validation ttl
    #[must_use]
    pub const fn validation_ttl(&self) -> Duration {
        self.validation_ttl
    }

    /// Lookup, create if needed, then probe and replace once on 952.
    async fn resolve(&self) -> Result<String, TokenManagerError> {
        let token = match self.lookup().await {
            Some(token) => token,
            None => self.create().await?,
        };

        match self.gateway.probe_session(&token).await {
            Ok(SessionProbe::Accepted) => Ok(token),
            Ok(SessionProbe::Invalid) => {
                warn!(token = %redact(&token), "session token rejected by server, creating a new session");
                self.create().await
            }
            Err(err) => {
                error!(error = %err, "session probe failed");
                Err(TokenManagerError::ProbeFailed(err))
            }
        }
    }

    /// Latest usable stored token. Store failures degrade to `None`.
    async fn lookup(&self) -> Option<String> {
        match self.store.find_latest().await {
            Ok(Some(record)) if record.is_usable() => {
                debug!(record_id = record.id, "found stored session token");
                Some(record.token)
            }
            Ok(Some(record)) => {
                warn!(record_id = record.id, "latest stored session token is empty");
                None
            }
            Ok(None) => {
                debug!("no stored session token");
                None
            }
            Err(err) => {
                warn!(error = %err, "token store lookup failed");
                None
            }
        }
    }

    /// Create a session and append its token to the store.
    ///
    /// A failed insert is logged; the token is still returned.
    async fn create(&self) -> Result<String, TokenManagerError> {
        let token = self.gateway.create_session().await.map_err(|err| {
            error!(error = %err, "failed to create session");
            TokenManagerError::Authentication(err)
        })?;

        if token.trim().is_empty() {
            error!("server issued an empty session token");
            return Err(TokenManagerError::Authentication(FmDataError::Auth(
                "server issued an empty session token".into(),
            )));
        }

        match self.store.insert(&token).await {
            Ok(record) => {
                info!(record_id = record.id, token = %redact(&token), "new session token stored");
            }
            Err(err) => warn!(error = %err, "failed to persist new session token"),
        }

        Ok(token)
    }
}
