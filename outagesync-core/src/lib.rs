// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `outagesync` Core
//!
//! Core types, filtering, and traits for `outagesync`.
//!
//! This crate holds everything that does not touch the network:
//!
//! - Domain models (outages, sites, devices) validated at the parse boundary
//! - The outage filter that selects a site's outages after a cutoff
//! - The [`SyncObserver`] trait used to report progress
//! - Error types
//!
//! ## Key Types
//!
//! - [`Outage`] - A device downtime window with parsed timestamps
//! - [`SiteInfo`] / [`Device`] - Site metadata
//! - [`SiteOutage`] - One record of the per-site post body
//! - [`FilterOutcome`] / [`FilterStats`] - Result of [`filter_outages`]

pub mod error;
pub mod filter;
pub mod models;
pub mod traits;

pub use error::CoreError;
pub use filter::{filter_outages, FilterOutcome, FilterStats};
pub use models::{parse_timestamp, Device, Outage, OutageRecord, SiteInfo, SiteOutage};
pub use traits::{NoopObserver, SyncObserver, TracingObserver};
