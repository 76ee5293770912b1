//! Core HTTP client with cookie-backed sessions, per-kind timeouts and
//! opt-in retry of idempotent requests.

use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::Response;
use crate::retry::RetryPolicy;

/// HTTP client for ADT endpoints.
///
/// Holds a cookie store, so the SAP session cookie issued with the CSRF token
/// is replayed on every following request made through the same client.
#[derive(Debug, Clone)]
pub struct AdtHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl AdtHttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        if config.compression.accept_compressed {
            builder = builder.gzip(true).deflate(true);
        } else {
            builder = builder.gzip(false).deflate(false);
        }

        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Create a PUT request builder.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Put, url)
    }

    /// Execute a request and map non-success statuses to errors.
    pub async fn send(&self, request: &RequestBuilder) -> Result<Response> {
        self.execute(request).await?.check_adt_error().await
    }

    /// Execute a request, returning the raw response whatever its status.
    ///
    /// Only 429 is turned into an error here. Callers that need to inspect
    /// the status (CSRF replay, token refresh) use this directly.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: &RequestBuilder) -> Result<Response> {
        let mut retry_policy = match &self.config.retry {
            Some(config) if request.method.is_idempotent() => {
                Some(RetryPolicy::new(config.clone()))
            }
            _ => None,
        };

        loop {
            let result = match self.execute_once(request).await {
                Ok(response) if is_retryable_status(response.status()) => {
                    if retry_policy.is_none() {
                        return Ok(response);
                    }
                    Err(Error::new(ErrorKind::Http {
                        status: response.status(),
                        message: format!("Server error: {}", response.status()),
                    }))
                }
                other => other,
            };

            match result {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() => {
                    let Some(ref mut policy) = retry_policy else {
                        return Err(err);
                    };
                    match policy.next_delay(err.retry_after()) {
                        Some(delay) => {
                            warn!(
                                attempt = policy.attempt(),
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "Request failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            return Err(Error::with_source(
                                ErrorKind::RetriesExhausted {
                                    attempts: policy.attempt(),
                                },
                                err,
                            ));
                        }
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute a single request without retry logic.
    async fn execute_once(&self, request: &RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url)
            .timeout(self.config.timeouts.get(request.timeout));

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if !request.query_params.is_empty() {
            req = req.query(&request.query_params);
        }

        if let Some(ref body) = request.body {
            req = match body {
                RequestBody::Text(text) => req.body(text.clone()),
                RequestBody::Bytes(bytes) => req.body(bytes.clone()),
            };
        }

        if self.config.enable_tracing {
            debug!(method = ?request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        let response = Response::new(response);
        if response.status() == 429 {
            return Err(Error::new(ErrorKind::RateLimited {
                retry_after: response.retry_after(),
            }));
        }

        Ok(response)
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 502 | 503 | 504)
}
