//! Fetch error types.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::retry::RetryPolicy;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a status other than 200 on the final attempt.
    #[error("{status} {reason} for url {url}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
        /// Requested URL.
        url: String,
        /// Response payload.
        body: UpstreamBody,
    },

    /// Network-level failure (connect, timeout, DNS) after all attempts.
    #[error("Transport error after {attempts} attempt(s): {source}")]
    Transport {
        /// Number of attempts made.
        attempts: u32,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// A 200 response whose body is not the expected JSON.
    #[error("Failed to decode response from {context}: {source}")]
    Decode {
        /// Endpoint or URL the body came from.
        context: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Base URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request could not be assembled (empty path, bad header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying HTTP client could not be created.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Returns the HTTP status for upstream errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if `policy` retries this failure.
    pub fn is_retryable(&self, policy: &RetryPolicy) -> bool {
        match self {
            Self::Upstream { status, .. } => policy.should_retry_status(*status),
            Self::Transport { source, .. } => policy.should_retry_error(source),
            _ => false,
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

// ============================================================================
// Upstream Body
// ============================================================================

/// Payload of a non-success response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    /// Body was valid JSON.
    Json(Value),
    /// Body was not JSON; kept as (lossy UTF-8) text.
    Raw(String),
    /// No body.
    Empty,
}

impl UpstreamBody {
    /// Decodes a response body, preferring JSON.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Returns the JSON payload, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for UpstreamBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Raw(text) => f.write_str(text),
            Self::Empty => f.write_str("<empty body>"),
        }
    }
}
