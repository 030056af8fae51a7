//! Tests for the lifecycle of a prepared download.

use splitfetch::{Download, Error, Status, WorkerState};
use std::time::{Duration, Instant};

mod common;
use common::helpers::*;

async fn prepared(body: Vec<u8>, workers: usize) -> (wiremock::MockServer, tempfile::TempDir, Download) {
    let server = start_fixture_server(body, Behavior::Ranged).await;
    let temp_dir = create_temp_dir();
    let download = create_test_builder(temp_dir.path())
        .workers(workers)
        .build()
        .prepare(&fixture_url(&server), Some(temp_dir.path().join("data.bin")))
        .await
        .expect("prepare failed");
    (server, temp_dir, download)
}

#[tokio::test]
async fn test_outcome_before_start() {
    let (_server, _dir, download) = prepared(create_test_content(1_000), 4).await;

    let summary = download.outcome();
    assert_eq!(summary.status(), &Status::NotStarted);
    assert_eq!(summary.bytes_written(), 0);
    assert_eq!(download.overall_fraction(), 0.0);
    assert!(!download.is_done());
}

#[tokio::test]
async fn test_join_without_start() {
    let (_server, _dir, mut download) = prepared(create_test_content(1_000), 2).await;

    let summary = download.join().await;
    assert_eq!(summary.status(), &Status::NotStarted);
    assert!(!download.target().exists());
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let (_server, _dir, mut download) = prepared(create_test_content(1_000), 2).await;

    download.start().await.expect("start failed");
    assert!(download.is_started());
    let err = download.start().await.unwrap_err();
    assert!(matches!(err, Error::Internal(_)));

    let summary = download.join().await;
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_cancel_before_start() {
    let (_server, _dir, mut download) = prepared(create_test_content(10_000), 4).await;

    download.cancel();
    assert!(download.is_cancelled());
    download.start().await.expect("start failed");
    let summary = download.join().await;

    assert_eq!(summary.status(), &Status::Cancelled);
    assert!(summary
        .workers()
        .iter()
        .all(|w| w.state == WorkerState::Cancelled));
    assert_file_size(download.target(), 0);
}

#[tokio::test]
async fn test_cancellation_token_is_shared() {
    let (_server, _dir, download) = prepared(create_test_content(1_000), 2).await;

    let token = download.cancellation_token();
    token.cancel();
    assert!(download.is_cancelled());
}

#[tokio::test]
async fn test_progress_after_completion() {
    let body = create_test_content(50_000);
    let (_server, _dir, mut download) = prepared(body.clone(), 4).await;

    download.start().await.expect("start failed");
    let summary = download.join().await;
    assert!(summary.is_complete());

    assert!(download.is_done());
    assert_eq!(download.overall_fraction(), 1.0);
    let snapshots = download.progress();
    assert_eq!(snapshots.len(), 4);
    for (snapshot, range) in snapshots.iter().zip(download.ranges()) {
        assert_eq!(snapshot.range_start, range.start());
        assert_eq!(snapshot.current, range.end());
        assert!(snapshot.done);
    }
    assert_file_content(download.target(), &body);
}

#[tokio::test]
async fn test_progress_handles_do_not_outlive_download() {
    let (_server, _dir, mut download) = prepared(create_test_content(8_000), 2).await;

    download.start().await.expect("start failed");
    download.join().await;

    let handles = download.progress_handles();
    assert!(handles.iter().all(|h| h.fraction() == Some(1.0)));

    drop(download);
    assert!(handles.iter().all(|h| h.snapshot().is_none()));
}

#[tokio::test]
async fn test_download_debug() {
    let (_server, _dir, download) = prepared(create_test_content(100), 1).await;
    let debug_str = format!("{:?}", download);

    assert!(debug_str.contains("Download"));
    assert!(debug_str.contains("ranges"));
}

#[tokio::test]
async fn test_dropping_started_download_stops_workers() {
    let server = start_fixture_server(
        create_test_content(100_000),
        Behavior::DelayTail(Duration::from_millis(800)),
    )
    .await;
    let temp_dir = create_temp_dir();
    let target = temp_dir.path().join("dropped.bin");
    let mut download = create_test_builder(temp_dir.path())
        .workers(4)
        .build()
        .prepare(&fixture_url(&server), Some(target.clone()))
        .await
        .expect("prepare failed");
    download.start().await.expect("start failed");

    let deadline = Instant::now() + Duration::from_secs(4);
    while download.workers()[0].state() != WorkerState::Succeeded {
        assert!(Instant::now() < deadline, "first range never completed");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let first = download.ranges()[0];
    let handles = download.progress_handles();
    let token = download.cancellation_token();

    drop(download);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(token.is_cancelled());
    assert!(handles.iter().all(|h| h.snapshot().is_none()));

    // Past the server delay, the tail ranges were still never written.
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_file_size(&target, first.len());
}
