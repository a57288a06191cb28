//! Domain models for outagesync.
//!
//! ## Submodules
//!
//! - [`outage`] - Outage records as reported by the API
//! - [`site`] - Sites, their devices, and the per-site outage body
//! - [`time`] - Timestamp parsing shared by records and the CLI

mod outage;
mod site;
mod time;

pub use outage::{Outage, OutageRecord};
pub use site::{Device, SiteInfo, SiteOutage};
pub use time::parse_timestamp;
