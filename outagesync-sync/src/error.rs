//! Repository and sync error types.

use std::fmt;

use outagesync_fetch::FetchError;
use thiserror::Error;

/// Broad failure class, used for exit codes and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid configuration or input.
    Config,
    /// Network-level failure.
    Transport,
    /// Non-success response from the API.
    Upstream,
    /// Payload could not be decoded.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Transport => "transport",
            Self::Upstream => "upstream",
            Self::Decode => "decode",
        };
        f.write_str(label)
    }
}

/// Classifies a transport error.
pub fn fetch_error_kind(err: &FetchError) -> ErrorKind {
    match err {
        FetchError::Upstream { .. } => ErrorKind::Upstream,
        FetchError::Transport { .. } | FetchError::ClientBuild(_) => ErrorKind::Transport,
        FetchError::Decode { .. } => ErrorKind::Decode,
        FetchError::Encode(_) | FetchError::InvalidUrl(_) | FetchError::InvalidRequest(_) => {
            ErrorKind::Config
        }
    }
}

// ============================================================================
// API Error
// ============================================================================

/// Errors from [`crate::OutageApi`] operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The API returned JSON that is not a valid record.
    #[error("Invalid {what} payload: {source}")]
    Decode {
        /// Which payload failed.
        what: &'static str,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A site id that cannot be used in a request.
    #[error("Invalid site id: {0:?}")]
    InvalidSiteId(String),
}

impl ApiError {
    /// Returns the failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(err) => fetch_error_kind(err),
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidSiteId(_) => ErrorKind::Config,
        }
    }
}

// ============================================================================
// Sync Error
// ============================================================================

/// Step of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStage {
    /// `GET site-info/{site_id}`.
    SiteLookup,
    /// `GET outages`.
    Retrieval,
    /// `POST site-outages/{site_id}`.
    Posting,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SiteLookup => "site lookup",
            Self::Retrieval => "outage retrieval",
            Self::Posting => "posting outages",
        };
        f.write_str(label)
    }
}

/// A sync run failed at `stage`.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct SyncError {
    /// Step that failed.
    pub stage: SyncStage,
    /// Cause.
    #[source]
    pub source: ApiError,
}

impl SyncError {
    /// Returns the failure class of the cause.
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
