//! Grace-period shutdown behavior across the HTTP surface: a reconnect
//! inside the window must keep the daemon alive, and repeated arm/cancel
//! cycles must not wedge the supervisor.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::time::timeout;

use bridge_daemon::application::ShutdownSupervisor;
use bridge_daemon::infrastructure::store::ConnectionStore;

const GRACE: Duration = Duration::from_millis(50);

fn wiring() -> (
    Arc<ConnectionStore>,
    ShutdownSupervisor,
    oneshot::Receiver<()>,
    TempDir,
) {
    let dir = tempfile::tempdir().unwrap();
    let connections = Arc::new(ConnectionStore::load(dir.path().join("connections.json")));
    let (supervisor, term_rx) = ShutdownSupervisor::spawn(Arc::clone(&connections), GRACE);
    (connections, supervisor, term_rx, dir)
}

/// Models an app page navigating away and back: disconnect, arm, reconnect
/// before the grace period elapses.
#[tokio::test]
async fn test_page_switch_does_not_kill_daemon() {
    let (connections, supervisor, term_rx, _dir) = wiring();

    connections.connect("actions");
    connections.disconnect("actions");
    supervisor.arm();

    // The page comes back almost immediately.
    tokio::time::sleep(Duration::from_millis(5)).await;
    connections.connect("actions");

    assert!(
        timeout(GRACE * 4, term_rx).await.is_err(),
        "daemon shut down despite the reconnect"
    );
}

#[tokio::test]
async fn test_daemon_exits_once_everyone_stays_away() {
    let (connections, supervisor, term_rx, _dir) = wiring();

    connections.connect("actions");
    connections.connect("editor");
    connections.disconnect("actions");
    connections.disconnect("editor");
    supervisor.arm();

    timeout(Duration::from_secs(2), term_rx)
        .await
        .expect("termination signal not received")
        .expect("supervisor dropped without signalling");
}

#[tokio::test]
async fn test_several_cancel_cycles_then_final_exit() {
    let (connections, supervisor, term_rx, _dir) = wiring();
    connections.connect("actions");

    // Two page switches in a row, each cancelling its own grace window.
    for _ in 0..2 {
        connections.disconnect("actions");
        supervisor.arm();
        connections.connect("actions");
        tokio::time::sleep(GRACE * 2).await;
    }

    // Final departure.
    connections.disconnect("actions");
    supervisor.arm();

    timeout(Duration::from_secs(2), term_rx)
        .await
        .expect("termination signal not received after earlier cancels")
        .expect("supervisor dropped without signalling");
}
