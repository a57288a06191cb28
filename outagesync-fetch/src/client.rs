//! Authenticated API client with retry on server errors.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{FetchError, UpstreamBody};
use crate::request::{auth_headers, endpoint_url, parse_base_url, QueryParams};
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for outagesync.
const USER_AGENT: &str = concat!("outagesync/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    api_key: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    user_agent: String,
}

impl std::fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ApiClientBuilder {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets how the client waits between attempts.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Overrides the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<ApiClient, FetchError> {
        let base_url = parse_base_url(&self.base_url)?;
        let headers = auth_headers(&self.api_key)?;

        let inner = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(ApiClient {
            inner,
            base_url,
            headers,
            retry_policy: self.retry_policy,
            sleeper: self.sleeper,
        })
    }
}

// ============================================================================
// API Client
// ============================================================================

/// HTTP client bound to one API base URL and key.
///
/// Every request carries `Accept: application/json` and `X-API-Key`. Only a
/// 200 response counts as success; any other final status becomes
/// [`FetchError::Upstream`]. Statuses in the retry policy (500 by default)
/// and network failures are retried with exponential backoff before that.
///
/// POST requests are resent as-is on retry, so the upstream endpoint must
/// tolerate duplicates.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: Url,
    headers: HeaderMap,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ApiClient {
    /// Creates a client with the default timeout and retry policy.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        Self::builder(base_url, api_key).build()
    }

    /// Starts building a client.
    pub fn builder(base_url: impl Into<String>, api_key: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Performs a GET request and returns the decoded JSON body.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get(&self, path: &str, query: &QueryParams) -> Result<Value, FetchError> {
        let url = endpoint_url(&self.base_url, path, query)?;
        self.execute(Method::GET, url, None).await
    }

    /// Performs a POST request with a JSON body and returns the decoded body.
    #[instrument(skip(self, body, query), fields(path = %path))]
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        query: &QueryParams,
    ) -> Result<Value, FetchError> {
        let url = endpoint_url(&self.base_url, path, query)?;
        let body = serde_json::to_value(body).map_err(FetchError::Encode)?;
        self.execute(Method::POST, url, Some(&body)).await
    }

    /// Performs a GET request and decodes the body into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, FetchError> {
        let value = self.get(path, query).await?;
        decode_value(path, value)
    }

    /// Sends the request, retrying per policy, until a terminal outcome.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            debug!(method = %method, url = %url, attempt = attempt + 1, "Sending request");

            let mut request = self
                .inner
                .request(method.clone(), url.clone())
                .headers(self.headers.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(status = %status, "Response received");

                    if status == StatusCode::OK {
                        return decode_response(&url, response, attempt).await;
                    }

                    if self.retry_policy.should_retry_status(status.as_u16())
                        && self.retry_policy.has_attempts_left(attempt)
                    {
                        let delay = self.retry_policy.delay_for_attempt(attempt);
                        warn!(
                            status = status.as_u16(),
                            attempt = attempt + 1,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "Server error, retrying"
                        );
                        self.sleeper.sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(upstream_error(&url, response, attempt).await);
                }
                Err(source) => {
                    let err = FetchError::Transport {
                        attempts: attempt + 1,
                        source,
                    };
                    if err.is_retryable(&self.retry_policy)
                        && self.retry_policy.has_attempts_left(attempt)
                    {
                        let delay = self.retry_policy.delay_for_attempt(attempt);
                        warn!(
                            error = %err,
                            attempt = attempt + 1,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "Request failed, retrying"
                        );
                        self.sleeper.sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(err);
                }
            }
        }
    }
}

// ============================================================================
// Response Handling
// ============================================================================

/// Reads a response body; a failure mid-body is a transport failure.
async fn read_body(response: Response, attempt: u32) -> Result<Vec<u8>, FetchError> {
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|source| FetchError::Transport {
            attempts: attempt + 1,
            source,
        })
}

/// Decodes a 200 body. An empty body decodes to `null`.
async fn decode_response(url: &Url, response: Response, attempt: u32) -> Result<Value, FetchError> {
    let bytes = read_body(response, attempt).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|source| {
        warn!(url = %url, error = %source, "Response is not valid JSON");
        FetchError::Decode {
            context: url.to_string(),
            source,
        }
    })
}

/// Converts a non-200 response into [`FetchError::Upstream`].
async fn upstream_error(url: &Url, response: Response, attempt: u32) -> FetchError {
    let status = response.status();
    let body = match read_body(response, attempt).await {
        Ok(bytes) => UpstreamBody::from_bytes(&bytes),
        Err(e) => return e,
    };

    FetchError::Upstream {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        url: url.to_string(),
        body,
    }
}

fn decode_value<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|source| FetchError::Decode {
        context: path.to_string(),
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================
