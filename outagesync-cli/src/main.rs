// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! outagesync CLI - sync a site's outages with the outage API.
//!
//! # Examples
//!
//! ```bash
//! # Sync the default site from the default start date
//! outagesync
//!
//! # Another site, later cutoff
//! outagesync --site-id kingfisher --start-date 2023-06-01T00:00:00Z
//!
//! # Show what would be posted without posting it
//! outagesync --dry-run
//! ```

mod args;
mod commands;
mod output;

use anyhow::Error;
use chrono::{DateTime, Utc};
use clap::Parser;
use outagesync_fetch::{FetchError, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use outagesync_store::ConfigError;
use outagesync_sync::{fetch_error_kind, ErrorKind, SyncError};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Default site to sync.
pub const DEFAULT_SITE_ID: &str = "norwich-pear-tree";

/// Default outage cutoff.
pub const DEFAULT_START_DATE: &str = "2022-01-01T00:00:00.000Z";

/// outagesync CLI - site outage sync.
#[derive(Debug, Parser)]
#[command(name = "outagesync")]
#[command(about = "Sync a site's outages with the outage API")]
#[command(long_about = r#"
Fetches the site's devices and every outage from the outage API, keeps the
outages for the site's devices that begin on or after the start date, and
posts them back under the site.

Unknown arguments are ignored.

Exit codes:
  0  success
  1  general error
  2  configuration or usage error
  3  network failure
  4  error response from the API
  5  undecodable API payload
"#)]
#[command(version)]
pub struct Cli {
    /// Site whose outages are synced.
    #[arg(long, default_value = DEFAULT_SITE_ID)]
    pub site_id: String,

    /// Keep outages that begin at or after this time (RFC 3339).
    #[arg(long, default_value = DEFAULT_START_DATE, value_parser = parse_start_date)]
    pub start_date: DateTime<Utc>,

    /// Credential file (JSON with api_key and api_url).
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Retries after the first attempt for server and network errors.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Backoff factor in seconds; retry n waits backoff * 2^n.
    #[arg(long, default_value_t = DEFAULT_BACKOFF_FACTOR, value_parser = parse_backoff)]
    pub backoff: f64,

    /// Retrieve and filter, then print the post body instead of posting.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    pub verbose: bool,

    /// Quiet mode (no logging).
    #[arg(long, short)]
    pub quiet: bool,
}

fn parse_start_date(value: &str) -> Result<DateTime<Utc>, String> {
    outagesync_core::parse_timestamp("start-date", value).map_err(|e| e.to_string())
}

fn parse_backoff(value: &str) -> Result<f64, String> {
    let secs: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("backoff must be a non-negative number of seconds, got {value}"));
    }
    Ok(secs)
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Bad credentials file or arguments.
    Config = 2,
    /// Network failure.
    Transport = 3,
    /// The API answered with an error status.
    Upstream = 4,
    /// The API answered with an unusable payload.
    Decode = 5,
}

impl From<ErrorKind> for ExitCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Config => Self::Config,
            ErrorKind::Transport => Self::Transport,
            ErrorKind::Upstream => Self::Upstream,
            ErrorKind::Decode => Self::Decode,
        }
    }
}

/// Picks the exit code for a failed run from the first typed error in the chain.
fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCode::Config;
        }
        if let Some(e) = cause.downcast_ref::<SyncError>() {
            return e.kind().into();
        }
        if let Some(e) = cause.downcast_ref::<FetchError>() {
            return fetch_error_kind(e).into();
        }
    }
    ExitCode::Error
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("outagesync=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("outagesync=info,warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = args::retain_known_args::<Cli, _, _>(std::env::args());
    let cli = Cli::parse_from(args.kept);

    setup_logging(cli.verbose, cli.quiet);

    if !args.ignored.is_empty() {
        debug!(ignored = ?args.ignored, "Ignoring unknown arguments");
    }

    if let Err(e) = commands::sync::run(&cli).await {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(exit_code_for(&e) as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}
