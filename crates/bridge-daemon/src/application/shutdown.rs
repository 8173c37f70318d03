//! The delayed shutdown supervisor.
//!
//! The bridge terminates itself once no client app has been connected for a
//! grace period, so an app switching pages (disconnect, immediately
//! reconnect) never kills the daemon under itself.
//!
//! One supervisor task owns the timer.  Handlers arm it by poking a small
//! channel; re-arms while a grace sleep is already running are coalesced by
//! draining the channel after the sleep.  The connected count is re-checked
//! *after* the sleep, so a reconnect anywhere in the window cancels the
//! shutdown regardless of timing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::infrastructure::store::ConnectionStore;

pub struct ShutdownSupervisor {
    arm_tx: mpsc::Sender<()>,
}

impl ShutdownSupervisor {
    /// Spawns the supervisor task.  The returned receiver resolves exactly
    /// once, when the daemon should exit.
    pub fn spawn(
        connections: Arc<ConnectionStore>,
        grace: Duration,
    ) -> (Self, oneshot::Receiver<()>) {
        let (arm_tx, mut arm_rx) = mpsc::channel::<()>(1);
        let (term_tx, term_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let mut term_tx = Some(term_tx);
            while arm_rx.recv().await.is_some() {
                debug!(?grace, "shutdown armed");
                tokio::time::sleep(grace).await;

                // Coalesce arms that queued up during the sleep; they are
                // all answered by the single re-check below.
                while arm_rx.try_recv().is_ok() {}

                if connections.count_connected() == 0 {
                    info!("no connected apps after grace period; terminating");
                    if let Some(tx) = term_tx.take() {
                        let _ = tx.send(());
                    }
                    return;
                }
                info!("shutdown cancelled: an app reconnected within the grace period");
            }
        });

        (Self { arm_tx }, term_rx)
    }

    /// Requests a delayed shutdown check.  Cheap and non-blocking: when the
    /// supervisor is already armed the request coalesces with the pending
    /// one.
    pub fn arm(&self) {
        let _ = self.arm_tx.try_send(());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::time::timeout;

    const GRACE: Duration = Duration::from_millis(50);

    fn empty_store() -> Arc<ConnectionStore> {
        let dir = tempdir().unwrap();
        Arc::new(ConnectionStore::load(dir.path().join("connections.json")))
    }

    #[tokio::test]
    async fn test_arm_with_no_connections_terminates_after_grace() {
        let (supervisor, term_rx) = ShutdownSupervisor::spawn(empty_store(), GRACE);

        supervisor.arm();

        timeout(Duration::from_secs(2), term_rx)
            .await
            .expect("termination signal not received")
            .expect("supervisor dropped without signalling");
    }

    #[tokio::test]
    async fn test_reconnect_within_grace_cancels_shutdown() {
        let store = empty_store();
        store.connect("actions");
        store.disconnect("actions");

        let (supervisor, term_rx) = ShutdownSupervisor::spawn(Arc::clone(&store), GRACE);
        supervisor.arm();
        // Reconnect well inside the window.
        store.connect("actions");

        assert!(
            timeout(GRACE * 4, term_rx).await.is_err(),
            "supervisor terminated despite a reconnect"
        );
    }

    #[tokio::test]
    async fn test_repeated_arms_coalesce_into_one_termination() {
        let (supervisor, term_rx) = ShutdownSupervisor::spawn(empty_store(), GRACE);

        for _ in 0..10 {
            supervisor.arm();
        }

        timeout(Duration::from_secs(2), term_rx)
            .await
            .expect("termination signal not received")
            .expect("supervisor dropped without signalling");
    }

    #[tokio::test]
    async fn test_cancelled_arm_leaves_supervisor_rearmable() {
        let store = empty_store();
        store.connect("actions");

        let (supervisor, term_rx) = ShutdownSupervisor::spawn(Arc::clone(&store), GRACE);

        // First arm is cancelled by the live connection.
        supervisor.arm();
        tokio::time::sleep(GRACE * 3).await;

        // Disconnect and arm again; this one must go through.
        store.disconnect("actions");
        supervisor.arm();

        timeout(Duration::from_secs(2), term_rx)
            .await
            .expect("termination signal not received after re-arm")
            .expect("supervisor dropped without signalling");
    }
}
