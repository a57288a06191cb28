// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # outagesync Fetch
//!
//! HTTP transport for the outage API.
//!
//! - [`client::ApiClient`] - GET/POST against a base URL with auth headers
//! - [`retry::RetryPolicy`] - Which failures are retried and how long to wait
//! - [`request::QueryParams`] - Query-string parameters
//! - [`error::FetchError`] - Upstream, transport, and decode failures
//!
//! ## Example
//!
//! ```ignore
//! use outagesync_fetch::{ApiClient, QueryParams, RetryPolicy};
//!
//! let client = ApiClient::builder("https://api.example.com/v1", api_key)
//!     .retry_policy(RetryPolicy::new(5).with_backoff_factor(0.5))
//!     .build()?;
//!
//! let outages = client.get("outages", &QueryParams::new()).await?;
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod retry;

pub use client::{ApiClient, ApiClientBuilder, DEFAULT_TIMEOUT_SECS};
pub use error::{FetchError, UpstreamBody};
pub use request::{auth_headers, QueryParams, API_KEY_HEADER};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES};
