//! Request assembly: query parameters, endpoint URLs, and auth headers.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use url::Url;

use crate::error::FetchError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// Query Parameters
// ============================================================================

/// Query-string parameters for a request.
///
/// Values are rendered with `ToString`, so strings, numbers and booleans can
/// be mixed. Optional values that are `None` are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    /// Adds a parameter when `value` is present.
    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |params, (k, v)| params.with(k, v))
    }
}

// ============================================================================
// URLs
// ============================================================================

/// Parses and normalizes the API base URL.
///
/// The path always ends with `/` so endpoints are resolved beneath it.
pub fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url.trim())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}' in {}",
            url.scheme(),
            base_url
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Joins `path` onto `base` and appends `query`.
///
/// Empty query sets produce no `?` at all.
pub fn endpoint_url(base: &Url, path: &str, query: &QueryParams) -> Result<Url, FetchError> {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        return Err(FetchError::InvalidRequest("endpoint path is empty".to_string()));
    }

    let mut url = base.join(relative)?;
    if !url.as_str().starts_with(base.as_str()) {
        return Err(FetchError::InvalidRequest(format!(
            "endpoint '{}' resolves outside {}",
            path, base
        )));
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    Ok(url)
}

// ============================================================================
// Headers
// ============================================================================

/// Builds the headers attached to every request.
pub fn auth_headers(api_key: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut key = HeaderValue::from_str(api_key)
        .map_err(|e| FetchError::InvalidRequest(format!("API key is not a valid header value: {}", e)))?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

    Ok(headers)
}
