//! Thin wrapper over `reqwest` shared by the session gateway and the
//! record client.

use std::time::Duration;

use fmdata_domain::constants::DEFAULT_TIMEOUT_SECONDS;
use fmdata_domain::FmDataError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("fmdata/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a per-request timeout.
///
/// Every request is attempted exactly once; failures are reported to the
/// caller instead of being retried. The timeout covers the whole exchange,
/// body included.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised
    pub fn new() -> Result<Self, FmDataError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Non-success statuses are returned as responses; only transport
    /// failures become errors.
    ///
    /// # Errors
    ///
    /// Returns [`FmDataError::Network`] if the request cannot be sent or
    /// times out, [`FmDataError::Config`] if it cannot be built
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, FmDataError> {
        let request = builder.build().map_err(|err| FmDataError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %url.path(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, url = %url.path(), %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, url = %url.path(), error = %err, "HTTP request failed");
                Err(FmDataError::from(InfraError::from(err)))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    accept_invalid_certs: bool,
    system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            accept_invalid_certs: false,
            system_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow self-signed or otherwise unverifiable server certificates.
    #[must_use]
    pub const fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Route requests through the proxies named by `HTTP_PROXY`,
    /// `HTTPS_PROXY` and `NO_PROXY` (on by default).
    #[must_use]
    pub const fn system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised
    pub fn build(self) -> Result<HttpClient, FmDataError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(USER_AGENT);

        if !self.system_proxy {
            builder = builder.no_proxy();
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| FmDataError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
