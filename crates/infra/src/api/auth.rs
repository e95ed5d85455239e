//! Data API session handling
//!
//! Provides the HTTP side of the session token lifecycle: creating sessions
//! with account credentials and probing tokens against the auth layout.

use async_trait::async_trait;
use fmdata_core::{SessionGateway, SessionProbe, TokenManager, TokenStore};
use fmdata_domain::constants::{PROBE_RANGE, TOKEN_HEADER};
use fmdata_domain::utils::redact;
use fmdata_domain::{FmDataError, FmsConfig};
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info};

use super::endpoints::FmsEndpoints;
use super::errors::ApiError;
use super::response::read_envelope;
use crate::http::HttpClient;

/// Trait for providing session tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a token the server currently accepts.
    async fn access_token(&self) -> Result<String, ApiError>;

    /// Called after the server rejected a token handed out by this provider.
    async fn invalidate(&self) {}
}

#[async_trait]
impl<G, S> AccessTokenProvider for TokenManager<G, S>
where
    G: SessionGateway + 'static,
    S: TokenStore + 'static,
{
    async fn access_token(&self) -> Result<String, ApiError> {
        self.acquire_valid_token().await.map_err(ApiError::from)
    }

    async fn invalidate(&self) {
        TokenManager::invalidate(self).await;
    }
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    user: &'a str,
    password: &'a str,
    layout: &'a str,
}

/// Session endpoints of one solution, authenticated with one account.
pub struct FmsSessionGateway {
    http: HttpClient,
    endpoints: FmsEndpoints,
    username: String,
    password: String,
    auth_layout: String,
}

impl FmsSessionGateway {
    #[must_use]
    pub fn new(
        http: HttpClient,
        endpoints: FmsEndpoints,
        username: impl Into<String>,
        password: impl Into<String>,
        auth_layout: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoints,
            username: username.into(),
            password: password.into(),
            auth_layout: auth_layout.into(),
        }
    }

    /// Build a gateway from the `[fms]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the HTTP client cannot be built
    pub fn from_config(config: &FmsConfig) -> Result<Self, ApiError> {
        let endpoints = FmsEndpoints::new(&config.fms_url, config.solution.clone())?;
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .accept_invalid_certs(config.accept_invalid_certs)
            .system_proxy(config.use_system_proxy)
            .build()?;

        Ok(Self::new(
            http,
            endpoints,
            config.username.clone(),
            config.password.clone(),
            config.auth_layout.clone(),
        ))
    }

    async fn request_session(&self) -> Result<String, ApiError> {
        let body = SessionRequest {
            user: &self.username,
            password: &self.password,
            layout: &self.auth_layout,
        };
        let request = self.http.request(Method::POST, self.endpoints.auth()).json(&body);

        let response = self.http.send(request).await?;
        let envelope = read_envelope(response).await?;

        envelope
            .get("token")
            .and_then(serde_json::Value::as_str)
            .filter(|token| !token.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| ApiError::Protocol("session response carried no token".into()))
    }
}

#[async_trait]
impl SessionGateway for FmsSessionGateway {
    async fn create_session(&self) -> fmdata_domain::Result<String> {
        debug!(user = %self.username, solution = %self.endpoints.solution(), "creating session");

        let token = self.request_session().await.map_err(FmDataError::from)?;
        info!(token = %redact(&token), "session created");

        Ok(token)
    }

    async fn probe_session(&self, token: &str) -> fmdata_domain::Result<SessionProbe> {
        let request = self
            .http
            .request(Method::GET, self.endpoints.layout(&self.auth_layout))
            .query(&[("range", PROBE_RANGE)])
            .header(TOKEN_HEADER, token);

        let response = self.http.send(request).await?;

        match read_envelope(response).await {
            Ok(_) => Ok(SessionProbe::Accepted),
            Err(ApiError::Remote(remote)) if remote.is_invalid_token() => Ok(SessionProbe::Invalid),
            Err(ApiError::Remote(remote)) => {
                // The server authenticated the request before failing it.
                debug!(error = %remote, "probe answered with a non-session error");
                Ok(SessionProbe::Accepted)
            }
            Err(other) => Err(other.into()),
        }
    }
}
