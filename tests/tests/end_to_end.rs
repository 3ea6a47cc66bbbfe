mod utils;
#[allow(unused)]
use utils::*;

use stampede::prelude::*;
use std::time::Duration;

fn base_config(port: u16) -> RunConfig {
    RunConfig::new()
        .virtual_users(4)
        .duration(Duration::from_millis(400))
        .pause(Duration::ZERO)
        .request_timeout(Duration::from_secs(2))
        .base_url(format!("http://127.0.0.1:{port}"))
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn open_backend_passes_all_checks() {
    init().await;

    let summary = stampede::run_http(base_config(OPEN_PORT)).await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.passed_checks, summary.total_requests);
    assert_eq!(summary.failed_checks, 0);
    assert_eq!(summary.error_count, 0);
    assert_eq!(
        summary.bucket_count(StatusBucket::Success),
        summary.total_requests
    );
    assert_eq!(summary.bucket_total(), summary.total_requests);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn auth_rejection_still_passes_checks() {
    init().await;

    // No key against a keyed backend: every response is a 401, and 401 is
    // in the accepted status set.
    let summary = stampede::run_http(base_config(KEYED_PORT)).await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.passed_checks, summary.total_requests);
    assert_eq!(
        summary.bucket_count(StatusBucket::ClientError),
        summary.total_requests
    );
    assert_eq!(summary.error_count, 0);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn matching_api_key_gets_200() {
    init().await;

    let config = base_config(KEYED_PORT).api_key(API_KEY);
    let summary = stampede::run_http(config).await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(
        summary.bucket_count(StatusBucket::Success),
        summary.total_requests
    );
    assert_eq!(summary.passed_checks, summary.total_requests);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn unreachable_backend_records_transport_failures() {
    init().await;

    // Discard port; nothing listens there.
    let config = base_config(9)
        .duration(Duration::from_millis(300))
        .request_timeout(Duration::from_millis(500));
    let summary = stampede::run_http(config).await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.error_count, summary.total_requests);
    assert_eq!(summary.failed_checks, summary.total_requests);
    assert_eq!(summary.passed_checks, 0);
    assert_eq!(
        summary.bucket_count(StatusBucket::Transport),
        summary.total_requests
    );
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn pause_throttles_request_rate() {
    init().await;

    let config = base_config(OPEN_PORT)
        .virtual_users(1)
        .duration(Duration::from_millis(450))
        .pause(Duration::from_millis(100));
    let summary = stampede::run_http(config).await.unwrap();

    // One worker pausing 100ms per iteration fits only a handful of
    // requests into 450ms.
    assert!(summary.total_requests >= 2);
    assert!(summary.total_requests <= 10);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn run_completes_within_duration_plus_timeout() {
    init().await;

    let config = base_config(OPEN_PORT).duration(Duration::from_millis(300));
    let start = std::time::Instant::now();
    let summary = stampede::run_http(config).await.unwrap();
    let elapsed = start.elapsed();

    assert!(summary.total_requests > 0);
    assert!(elapsed < Duration::from_millis(300) + Duration::from_secs(2) + Duration::from_secs(1));
}
