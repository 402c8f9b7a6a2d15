//! End-to-end watch scenarios against a scripted chain reader.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::time::{sleep, timeout, Instant};
use txwatch::chain::reader::ChainReader;
use txwatch::watch::{StatusMessage, TxMonitor, TxStatus, WatchRegistry, WatchRequest};

mod common;
use common::ScriptedReader;

fn monitor(reader: Arc<dyn ChainReader>) -> TxMonitor {
    TxMonitor::new(reader, Arc::new(WatchRegistry::new()))
}

fn request(tx_hash: TxHash, depth: u64, interval: Duration, deadline: Duration) -> WatchRequest {
    let mut req = WatchRequest::new(tx_hash);
    req.required_depth = depth;
    req.poll_interval = interval;
    req.deadline = deadline;
    req
}

/// Drain the whole message stream of a watch.
async fn collect(mut handle: txwatch::watch::WatchHandle) -> Vec<StatusMessage> {
    let mut messages = Vec::new();
    while let Some(msg) = handle.recv().await {
        messages.push(msg);
    }
    messages
}

#[tokio::test]
async fn confirmed_once_depth_reached() {
    // Included with success at head 100, head advances one block per
    // observation, depth 3: confirmation lands when the head reaches 103.
    let reader = Arc::new(ScriptedReader::included_success(100, 1));
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x01);

    let handle = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_secs(1),
    ));
    let terminal = handle.wait().await.expect("watch must deliver a terminal message");

    assert_eq!(terminal.status, TxStatus::Confirmed);
    assert_eq!(terminal.tx_hash, tx);
    assert!(terminal.error.is_none());
    assert!(!mon.registry().is_watched(tx));
}

#[tokio::test]
async fn never_found_times_out() {
    let reader = Arc::new(ScriptedReader::never_found());
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x02);

    let handle = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_millis(150),
    ));
    let terminal = handle.wait().await.unwrap();

    assert_eq!(terminal.status, TxStatus::TimedOut);
    assert!(terminal.error.unwrap().contains("timed out"));
    assert!(!mon.registry().is_watched(tx));
}

#[tokio::test]
async fn head_failure_after_inclusion_is_infrastructure_error() {
    let reader = Arc::new(ScriptedReader::included_success(100, 1));
    reader.set_fail_head(true);
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x03);

    let handle = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_secs(1),
    ));
    let terminal = handle.wait().await.unwrap();

    assert_eq!(terminal.status, TxStatus::InfrastructureError);
    assert!(terminal.error.unwrap().contains("head lookup unavailable"));
    assert!(!mon.registry().is_watched(tx));
}

#[tokio::test]
async fn duplicate_watch_is_rejected_without_disturbing_the_first() {
    let reader = Arc::new(ScriptedReader::included_success(100, 1));
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x04);

    // Slow first watch so the duplicate definitely overlaps it.
    let first = mon.watch(request(
        tx,
        3,
        Duration::from_millis(20),
        Duration::from_secs(5),
    ));

    let second = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_secs(5),
    ));
    let rejection = second.wait().await.unwrap();
    assert_eq!(rejection.status, TxStatus::Unknown);
    assert!(rejection.error.unwrap().contains("already being watched"));

    // The first watch is unaffected and still completes normally.
    let terminal = first.wait().await.unwrap();
    assert_eq!(terminal.status, TxStatus::Confirmed);

    // After release, the same hash can be watched again.
    let third = mon.watch(request(
        tx,
        0,
        Duration::from_millis(10),
        Duration::from_secs(1),
    ));
    let terminal = third.wait().await.unwrap();
    assert_eq!(terminal.status, TxStatus::Confirmed);
}

#[tokio::test]
async fn exactly_one_terminal_message_and_nothing_after() {
    let reader = Arc::new(ScriptedReader::included_success(100, 1));
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x05);

    let handle = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_secs(1),
    ));
    let messages = collect(handle).await;

    let terminal_count = messages.iter().filter(|m| m.status.is_terminal()).count();
    assert_eq!(terminal_count, 1);
    assert!(messages.last().unwrap().status.is_terminal());
    // Everything before the terminal message is informational.
    for msg in &messages[..messages.len() - 1] {
        assert!(!msg.status.is_terminal());
        assert!(msg.error.is_none());
    }
}

#[tokio::test]
async fn timeout_wins_over_a_success_that_never_arrives_in_time() {
    // Depth far beyond what the head will reach before the deadline.
    let reader = Arc::new(ScriptedReader::included_success(100, 1));
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x06);

    let handle = mon.watch(request(
        tx,
        1_000,
        Duration::from_millis(10),
        Duration::from_millis(100),
    ));
    let terminal = handle.wait().await.unwrap();
    assert_eq!(terminal.status, TxStatus::TimedOut);
}

#[tokio::test]
async fn cancel_surfaces_as_timed_out_promptly() {
    let reader = Arc::new(ScriptedReader::never_found());
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x07);

    let start = Instant::now();
    let handle = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_secs(30),
    ));

    sleep(Duration::from_millis(40)).await;
    handle.cancel();

    let terminal = timeout(Duration::from_secs(1), handle.wait())
        .await
        .expect("cancel must terminate the watch promptly")
        .unwrap();
    assert_eq!(terminal.status, TxStatus::TimedOut);
    assert!(terminal.error.unwrap().contains("cancelled"));
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(!mon.registry().is_watched(tx));
}

#[tokio::test]
async fn dropping_the_handle_releases_the_registry_entry() {
    let reader = Arc::new(ScriptedReader::never_found());
    let mon = monitor(reader);
    let tx = TxHash::repeat_byte(0x08);

    let handle = mon.watch(request(
        tx,
        3,
        Duration::from_millis(10),
        Duration::from_secs(30),
    ));
    assert!(mon.registry().is_watched(tx));
    drop(handle);

    // The watch task observes the dropped cancel signal on its next wait.
    let released = async {
        while mon.registry().is_watched(tx) {
            sleep(Duration::from_millis(10)).await;
        }
    };
    timeout(Duration::from_secs(1), released)
        .await
        .expect("registry entry must be released after the handle is dropped");
}

#[tokio::test]
async fn late_inclusion_is_picked_up() {
    // Starts unknown to the node, then shows up included and successful.
    let reader = Arc::new(ScriptedReader::never_found());
    let mon = monitor(Arc::clone(&reader) as Arc<dyn ChainReader>);
    let tx = TxHash::repeat_byte(0x09);

    let handle = mon.watch(request(
        tx,
        0,
        Duration::from_millis(10),
        Duration::from_secs(2),
    ));

    sleep(Duration::from_millis(50)).await;
    reader.set_inclusion(txwatch::chain::InclusionState::Included);
    reader.set_receipt(txwatch::chain::ReceiptState::Present { success: true });

    let terminal = handle.wait().await.unwrap();
    assert_eq!(terminal.status, TxStatus::Confirmed);
}
