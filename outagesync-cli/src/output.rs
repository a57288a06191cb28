//! Output formatting.

use anyhow::Result;
use outagesync_core::SiteOutage;
use outagesync_sync::SyncReport;

/// Renders the body a run posts (or would post) as pretty JSON.
pub fn post_body_json(outages: &[SiteOutage]) -> Result<String> {
    Ok(serde_json::to_string_pretty(outages)?)
}

/// One-line human summary of a run.
pub fn summary(report: &SyncReport) -> String {
    let verb = if report.dry_run { "Would post" } else { "Posted" };
    format!(
        "{verb} {} of {} outages for {} ({}): {} unknown device, {} before cutoff",
        report.stats.kept,
        report.outages_retrieved,
        report.site_name,
        report.site_id,
        report.stats.unknown_device,
        report.stats.before_cutoff,
    )
}
