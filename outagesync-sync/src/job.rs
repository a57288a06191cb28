//! The site outage sync job.
//!
//! One run fetches the site's devices, fetches every outage, keeps the
//! site's outages that begin at or after the cutoff, and posts them back
//! under the site. Steps run strictly one after another; the first failure
//! ends the run.

use chrono::{DateTime, Utc};
use outagesync_core::{filter_outages, FilterStats, SiteOutage, SyncObserver};
use serde::Serialize;
use tracing::instrument;

use crate::api::OutageApi;
use crate::error::{SyncError, SyncStage};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Site that was synced.
    pub site_id: String,
    /// Site display name.
    pub site_name: String,
    /// Number of devices at the site.
    pub device_count: usize,
    /// Outages returned by the API.
    pub outages_retrieved: usize,
    /// Filter counters.
    pub stats: FilterStats,
    /// Records posted (or that would have been posted in a dry run).
    pub outages: Vec<SiteOutage>,
    /// Whether posting was skipped.
    pub dry_run: bool,
}

/// Configuration of a sync run.
#[derive(Debug, Clone)]
pub struct SyncJob {
    site_id: String,
    cutoff: DateTime<Utc>,
    dry_run: bool,
}

impl SyncJob {
    /// Creates a job for `site_id` keeping outages that begin at or after `cutoff`.
    pub fn new(site_id: impl Into<String>, cutoff: DateTime<Utc>) -> Self {
        Self {
            site_id: site_id.into(),
            cutoff,
            dry_run: false,
        }
    }

    /// Skips the final post when enabled.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Site this job syncs.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Runs the job.
    #[instrument(skip(self, api, observer), fields(site_id = %self.site_id, dry_run = self.dry_run))]
    pub async fn run<A, O>(&self, api: &A, observer: &O) -> Result<SyncReport, SyncError>
    where
        A: OutageApi + ?Sized,
        O: SyncObserver + ?Sized,
    {
        let site = api
            .get_site_info(&self.site_id)
            .await
            .map_err(|source| SyncError {
                stage: SyncStage::SiteLookup,
                source,
            })?;
        observer.site_info_retrieved(&self.site_id, site.devices.len());

        let outages = api.list_outages().await.map_err(|source| SyncError {
            stage: SyncStage::Retrieval,
            source,
        })?;
        observer.outages_retrieved(outages.len());

        let outcome = filter_outages(&outages, &site.devices, self.cutoff);
        observer.outages_filtered(&self.site_id, &outcome.stats);

        if !self.dry_run {
            observer.outages_posting(&self.site_id, outcome.outages.len());
            api.post_outages(&self.site_id, &outcome.outages)
                .await
                .map_err(|source| SyncError {
                    stage: SyncStage::Posting,
                    source,
                })?;
            observer.outages_posted(&self.site_id, outcome.outages.len());
        }

        Ok(SyncReport {
            site_id: self.site_id.clone(),
            site_name: site.name,
            device_count: site.devices.len(),
            outages_retrieved: outages.len(),
            stats: outcome.stats,
            outages: outcome.outages,
            dry_run: self.dry_run,
        })
    }
}
