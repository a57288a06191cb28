//! The sync command.

use std::time::Duration;

use anyhow::Result;
use outagesync_core::TracingObserver;
use outagesync_fetch::{ApiClient, RetryPolicy};
use outagesync_store::Credentials;
use outagesync_sync::{OutageRepository, SyncJob, SyncReport};
use tracing::debug;

use crate::output;
use crate::Cli;

/// Runs one sync with the options in `cli`.
pub async fn run(cli: &Cli) -> Result<SyncReport> {
    let credentials = Credentials::load(cli.credentials.as_deref())?;

    let policy = RetryPolicy::new(cli.max_retries).with_backoff_factor(cli.backoff);
    debug!(api_url = %credentials.api_url, ?policy, timeout = cli.timeout, "Building client");

    let client = ApiClient::builder(credentials.api_url.as_str(), credentials.api_key.as_str())
        .timeout(Duration::from_secs(cli.timeout))
        .retry_policy(policy)
        .build()?;
    let repository = OutageRepository::new(client);

    let report = SyncJob::new(cli.site_id.as_str(), cli.start_date)
        .dry_run(cli.dry_run)
        .run(&repository, &TracingObserver)
        .await?;

    if cli.dry_run {
        println!("{}", output::post_body_json(&report.outages)?);
    } else if !cli.quiet {
        println!("{}", output::summary(&report));
    }

    Ok(report)
}
