//! End-to-end sync runs against a mock outage API.

use std::time::Duration;

use httpmock::prelude::*;
use outagesync_core::{parse_timestamp, NoopObserver};
use outagesync_fetch::{ApiClient, RetryPolicy};
use outagesync_sync::{ErrorKind, OutageRepository, SyncJob, SyncStage};
use serde_json::json;

const API_KEY: &str = "e2e-key";

fn repository(server: &MockServer, policy: RetryPolicy) -> OutageRepository {
    let client = ApiClient::builder(server.base_url(), API_KEY)
        .retry_policy(policy)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    OutageRepository::new(client)
}

#[tokio::test]
async fn test_sync_posts_enriched_outages() {
    let server = MockServer::start();
    let outages = server.mock(|when, then| {
        when.method(GET).path("/outages").header("x-api-key", API_KEY);
        then.status(200).json_body(json!([
            {"id": "d1", "begin": "2021-01-01T00:00:00Z", "end": "2021-01-02T00:00:00Z"}
        ]));
    });
    let site_info = server.mock(|when, then| {
        when.method(GET).path("/site-info/s1").header("x-api-key", API_KEY);
        then.status(200).json_body(json!({
            "id": "s1",
            "name": "Site",
            "devices": [{"id": "d1", "name": "Device1"}]
        }));
    });
    let post = server.mock(|when, then| {
        when.method(POST)
            .path("/site-outages/s1")
            .header("x-api-key", API_KEY)
            .header("accept", "application/json")
            .json_body(json!([
                {"id": "d1", "name": "Device1", "begin": "2021-01-01T00:00:00Z", "end": "2021-01-02T00:00:00Z"}
            ]));
        then.status(200);
    });

    let cutoff = parse_timestamp("start_date", "2020-01-01T00:00:00Z").unwrap();
    let report = SyncJob::new("s1", cutoff)
        .run(&repository(&server, RetryPolicy::none()), &NoopObserver)
        .await
        .unwrap();

    outages.assert();
    site_info.assert();
    post.assert();
    assert_eq!(report.stats.kept, 1);
    assert_eq!(report.site_name, "Site");
}

#[tokio::test]
async fn test_sync_retries_server_error_then_fails_with_stage() {
    let server = MockServer::start();
    let site_info = server.mock(|when, then| {
        when.method(GET).path("/site-info/s1");
        then.status(500).json_body(json!({"message": "An internal server error occurred."}));
    });

    let policy = RetryPolicy::new(2).with_backoff_factor(0.0);
    let cutoff = parse_timestamp("start_date", "2020-01-01T00:00:00Z").unwrap();
    let err = SyncJob::new("s1", cutoff)
        .run(&repository(&server, policy), &NoopObserver)
        .await
        .unwrap_err();

    site_info.assert_hits(3);
    assert_eq!(err.stage, SyncStage::SiteLookup);
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.to_string().contains("An internal server error occurred."));
}

#[tokio::test]
async fn test_sync_post_rejected_without_retry() {
    let server = MockServer::start();
    let _site_info = server.mock(|when, then| {
        when.method(GET).path("/site-info/s1");
        then.status(200)
            .json_body(json!({"id": "s1", "name": "Site", "devices": []}));
    });
    let _outages = server.mock(|when, then| {
        when.method(GET).path("/outages");
        then.status(200).json_body(json!([]));
    });
    let post = server.mock(|when, then| {
        when.method(POST).path("/site-outages/s1");
        then.status(400).json_body(json!({"message": "Bad request body"}));
    });

    let policy = RetryPolicy::new(5).with_backoff_factor(0.0);
    let cutoff = parse_timestamp("start_date", "2020-01-01T00:00:00Z").unwrap();
    let err = SyncJob::new("s1", cutoff)
        .run(&repository(&server, policy), &NoopObserver)
        .await
        .unwrap_err();

    post.assert_hits(1);
    assert_eq!(err.stage, SyncStage::Posting);
    let message = err.to_string();
    assert!(message.contains("400"), "message: {}", message);
    assert!(message.contains("Bad request body"), "message: {}", message);
}

#[tokio::test]
async fn test_dry_run_never_posts() {
    let server = MockServer::start();
    let _site_info = server.mock(|when, then| {
        when.method(GET).path("/site-info/s1");
        then.status(200).json_body(
            json!({"id": "s1", "name": "Site", "devices": [{"id": "d1", "name": "Device1"}]}),
        );
    });
    let _outages = server.mock(|when, then| {
        when.method(GET).path("/outages");
        then.status(200).json_body(json!([
            {"id": "d1", "begin": "2022-03-01T00:00:00Z", "end": "2022-03-02T00:00:00Z"}
        ]));
    });
    let post = server.mock(|when, then| {
        when.method(POST).path("/site-outages/s1");
        then.status(200);
    });

    let cutoff = parse_timestamp("start_date", "2022-01-01T00:00:00.000Z").unwrap();
    let report = SyncJob::new("s1", cutoff)
        .dry_run(true)
        .run(&repository(&server, RetryPolicy::none()), &NoopObserver)
        .await
        .unwrap();

    post.assert_hits(0);
    assert_eq!(report.outages.len(), 1);
}
