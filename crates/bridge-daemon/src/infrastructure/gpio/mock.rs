//! Hand-fed edge source for unit testing.
//!
//! A test constructs the source, keeps the [`MockEdgeFeeder`], starts the
//! plugin, and then pushes [`EdgeEvent`]s exactly when it wants them.  Time
//! control stays in the test: there is no background thread here.
//!
//! Each `start` creates a fresh channel so the source survives the
//! stop/start cycles a plugin toggle produces; events fed while the source
//! is stopped are dropped.

use std::sync::{mpsc, Arc, Mutex};

use super::{EdgeEvent, EdgeSource, GpioError, InputLine};

type SharedSender = Arc<Mutex<Option<mpsc::Sender<EdgeEvent>>>>;

/// Test-side handle used to inject events into a running plugin.
#[derive(Clone)]
pub struct MockEdgeFeeder {
    sender: SharedSender,
}

impl MockEdgeFeeder {
    /// Injects one edge event.  Dropped silently when the source is not
    /// currently started.
    pub fn feed(&self, line: InputLine, pressed: bool) {
        if let Some(sender) = self.sender.lock().unwrap().as_ref() {
            let _ = sender.send(EdgeEvent { line, pressed });
        }
    }
}

/// An edge source whose events come from a [`MockEdgeFeeder`].
pub struct MockEdgeSource {
    sender: SharedSender,
}

impl MockEdgeSource {
    /// Creates the source and the feeder a test uses to inject events.
    pub fn new() -> (Self, MockEdgeFeeder) {
        let sender: SharedSender = Arc::new(Mutex::new(None));
        (
            Self {
                sender: Arc::clone(&sender),
            },
            MockEdgeFeeder { sender },
        )
    }
}

impl EdgeSource for MockEdgeSource {
    fn start(&mut self) -> Result<mpsc::Receiver<EdgeEvent>, GpioError> {
        let (sender, receiver) = mpsc::channel();
        *self.sender.lock().unwrap() = Some(sender);
        Ok(receiver)
    }

    fn stop(&mut self) {
        // Dropping the sender disconnects the receiver held by the plugin.
        *self.sender.lock().unwrap() = None;
    }
}
