//! Record client for the Data API
//!
//! Each operation fetches a session token from the configured
//! [`AccessTokenProvider`], issues exactly one HTTP request and unwraps the
//! response payload. Remote error bodies are returned unchanged as
//! [`ApiError::Remote`].

use std::sync::Arc;
use std::time::Duration;

use fmdata_domain::constants::{DEFAULT_TIMEOUT_SECONDS, TOKEN_HEADER};
use fmdata_domain::{FmsConfig, Pagination, Record, RecordAck, RecordId};
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::auth::AccessTokenProvider;
use super::endpoints::FmsEndpoints;
use super::errors::ApiError;
use super::response::{ack, read_envelope, records};
use crate::http::HttpClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECONDS);

/// Data API client bound to one solution.
pub struct FmsClient {
    http: HttpClient,
    endpoints: FmsEndpoints,
    auth: Arc<dyn AccessTokenProvider>,
}

impl FmsClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - Server, solution and transport settings
    /// * `auth` - Session token provider
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the HTTP client cannot be built
    pub fn new(config: &FmsConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self, ApiError> {
        Self::builder()
            .fms_url(&config.fms_url)
            .solution(&config.solution)
            .timeout(config.timeout())
            .accept_invalid_certs(config.accept_invalid_certs)
            .system_proxy(config.use_system_proxy)
            .auth(auth)
            .build()
    }

    /// Create a builder for fluent configuration
    #[must_use]
    pub fn builder() -> FmsClientBuilder {
        FmsClientBuilder::default()
    }

    /// Create a record and return the id assigned by the server.
    ///
    /// # Errors
    ///
    /// Returns error if no token is available, the request fails or the
    /// server rejects the record
    #[instrument(skip(self, data), fields(layout = %layout))]
    pub async fn new_record<T>(&self, layout: &str, data: &T) -> Result<RecordId, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = json!({ "data": encode(data)? });
        let response = self.execute(Method::POST, self.endpoints.layout(layout), Some(body)).await?;

        let id = ack(response)?
            .record_id
            .ok_or_else(|| ApiError::Protocol("create response has no recordId".into()))?;

        info!(record_id = %id, "record created");
        Ok(id)
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the server answers with an empty
    /// data array, otherwise as [`FmsClient::new_record`]
    #[instrument(skip(self), fields(layout = %layout, id = %id))]
    pub async fn get_record(&self, layout: &str, id: &RecordId) -> Result<Record, ApiError> {
        let response =
            self.execute(Method::GET, self.endpoints.record(layout, id.as_str()), None).await?;

        records(response)?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("record {id} in layout {layout}")))
    }

    /// List the records of a layout.
    ///
    /// # Errors
    ///
    /// Same as [`FmsClient::new_record`]
    #[instrument(skip(self), fields(layout = %layout))]
    pub async fn get_records(
        &self,
        layout: &str,
        page: Pagination,
    ) -> Result<Vec<Record>, ApiError> {
        let url = with_page(self.endpoints.layout(layout), page);
        let records = records(self.execute(Method::GET, url, None).await?)?;

        debug!(count = records.len(), "records fetched");
        Ok(records)
    }

    /// Replace field values of one record.
    ///
    /// # Errors
    ///
    /// Same as [`FmsClient::new_record`]
    #[instrument(skip(self, data), fields(layout = %layout, id = %id))]
    pub async fn edit_record<T>(
        &self,
        layout: &str,
        id: &RecordId,
        data: &T,
    ) -> Result<RecordAck, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = json!({ "data": encode(data)? });
        let url = self.endpoints.record(layout, id.as_str());

        ack(self.execute(Method::PUT, url, Some(body)).await?)
    }

    /// Delete one record.
    ///
    /// # Errors
    ///
    /// Same as [`FmsClient::new_record`]
    #[instrument(skip(self), fields(layout = %layout, id = %id))]
    pub async fn delete_record(&self, layout: &str, id: &RecordId) -> Result<RecordAck, ApiError> {
        let url = self.endpoints.record(layout, id.as_str());

        ack(self.execute(Method::DELETE, url, None).await?)
    }

    /// Run a find request. `query` is passed to the server as is.
    ///
    /// # Errors
    ///
    /// Same as [`FmsClient::new_record`]; a find without matches is reported
    /// by the server as error code 401
    #[instrument(skip(self, query), fields(layout = %layout))]
    pub async fn find_records<Q>(
        &self,
        layout: &str,
        query: &Q,
        page: Pagination,
    ) -> Result<Vec<Record>, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let body = json!({ "query": encode(query)? });
        let url = with_page(self.endpoints.find(layout), page);
        let records = records(self.execute(Method::POST, url, Some(body)).await?)?;

        debug!(count = records.len(), "find matched records");
        Ok(records)
    }

    /// Set global field values for the session.
    ///
    /// # Errors
    ///
    /// Same as [`FmsClient::new_record`]
    #[instrument(skip(self, globals), fields(layout = %layout))]
    pub async fn set_globals<T>(&self, layout: &str, globals: &T) -> Result<RecordAck, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = json!({ "globalFields": encode(globals)? });

        ack(self.execute(Method::PUT, self.endpoints.global(layout), Some(body)).await?)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let token = self.auth.access_token().await?;

        let mut request = self.http.request(method, url).header(TOKEN_HEADER, token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = self.http.send(request).await?;

        match read_envelope(response).await {
            Err(ApiError::Remote(remote)) if remote.is_invalid_token() => {
                warn!("server rejected the session token");
                self.auth.invalidate().await;
                Err(ApiError::Remote(remote))
            }
            other => other,
        }
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::Protocol(format!("failed to serialize request body: {e}")))
}

fn with_page(mut url: Url, page: Pagination) -> Url {
    let pairs = page.query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}

/// Builder for [`FmsClient`]
pub struct FmsClientBuilder {
    fms_url: Option<String>,
    solution: Option<String>,
    timeout: Duration,
    accept_invalid_certs: bool,
    system_proxy: bool,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl Default for FmsClientBuilder {
    fn default() -> Self {
        Self {
            fms_url: None,
            solution: None,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            system_proxy: true,
            auth: None,
        }
    }
}

impl FmsClientBuilder {
    /// Set the Data API base URL (e.g. `https://fms.example.com/fmi/rest/api/`)
    #[must_use]
    pub fn fms_url(mut self, url: impl Into<String>) -> Self {
        self.fms_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    /// Set request timeout, covering connect, send and body read
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Honour `HTTP_PROXY` / `HTTPS_PROXY` (on by default)
    #[must_use]
    pub const fn system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }

    /// Set authentication provider (required)
    #[must_use]
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns error if a required setting is missing or invalid
    pub fn build(self) -> Result<FmsClient, ApiError> {
        let auth = self
            .auth
            .ok_or_else(|| ApiError::Config("Authentication provider is required".to_string()))?;
        let fms_url =
            self.fms_url.ok_or_else(|| ApiError::Config("fms_url is required".to_string()))?;
        let solution =
            self.solution.ok_or_else(|| ApiError::Config("solution is required".to_string()))?;
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .accept_invalid_certs(self.accept_invalid_certs)
            .system_proxy(self.system_proxy)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(FmsClient { http, endpoints: FmsEndpoints::new(&fms_url, solution)?, auth })
    }
}
