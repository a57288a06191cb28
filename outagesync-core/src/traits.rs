//! Trait definitions for outagesync.
//!
//! [`SyncObserver`] is handed explicitly to the components that report
//! progress, instead of them reaching for a process-wide logger.

use tracing::{debug, info};

use crate::filter::FilterStats;

/// Receives progress events from a sync run.
///
/// Every method has a no-op default, so implementors only override the
/// events they care about.
pub trait SyncObserver: Send + Sync {
    /// Site information was retrieved.
    fn site_info_retrieved(&self, _site_id: &str, _device_count: usize) {}

    /// The outage list was retrieved.
    fn outages_retrieved(&self, _count: usize) {}

    /// Outages were filtered for the site.
    fn outages_filtered(&self, _site_id: &str, _stats: &FilterStats) {}

    /// Outages are about to be posted.
    fn outages_posting(&self, _site_id: &str, _count: usize) {}

    /// Outages were posted successfully.
    fn outages_posted(&self, _site_id: &str, _count: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}

/// Observer that reports events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn site_info_retrieved(&self, site_id: &str, device_count: usize) {
        info!(site_id, device_count, "Retrieved site info");
    }

    fn outages_retrieved(&self, count: usize) {
        info!(count, "Retrieved outages");
    }

    fn outages_filtered(&self, site_id: &str, stats: &FilterStats) {
        info!(site_id, kept = stats.kept, total = stats.total, "Filtered outages");
        if stats.dropped() > 0 {
            debug!(
                unknown_device = stats.unknown_device,
                before_cutoff = stats.before_cutoff,
                "Dropped outages"
            );
        }
    }

    fn outages_posting(&self, site_id: &str, count: usize) {
        info!(site_id, count, "Posting outages");
    }

    fn outages_posted(&self, site_id: &str, count: usize) {
        info!(site_id, count, "Posted successfully");
    }
}
