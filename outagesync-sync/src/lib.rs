// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # outagesync Sync
//!
//! The outage API repository and the site sync job.
//!
//! - [`OutageApi`] - Operations on the outage API, as a trait
//! - [`OutageRepository`] - [`OutageApi`] over [`outagesync_fetch::ApiClient`]
//! - [`SyncJob`] - Site info, outages, filter, post
//!
//! ## Usage
//!
//! ```ignore
//! use outagesync_core::TracingObserver;
//! use outagesync_fetch::ApiClient;
//! use outagesync_sync::{OutageRepository, SyncJob};
//!
//! let repo = OutageRepository::new(ApiClient::new(&api_url, &api_key)?);
//! let report = SyncJob::new("norwich-pear-tree", cutoff)
//!     .run(&repo, &TracingObserver)
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod job;

pub use api::{OutageApi, OutageRepository};
pub use error::{fetch_error_kind, ApiError, ErrorKind, SyncError, SyncStage};
pub use job::{SyncJob, SyncReport};
