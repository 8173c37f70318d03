//! Scripted serial transport and connector for unit testing.
//!
//! Serial tests cannot depend on a physically attached board, so the mock
//! plays back a script: each step is one outcome of a `read_line` call
//! (a line, an idle timeout, or a dead transport).  The connector hands out
//! pre-built transports in order and reports "no port" once the script is
//! exhausted, which lets a test walk the link through connect, stream,
//! disconnect, and reconnect.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{SerialConnector, SerialError, SerialTransport};

/// One scripted outcome of a `read_line` call.
pub enum Step {
    /// A complete line arrived.
    Line(&'static str),
    /// The read timeout elapsed with no data.
    Idle,
    /// The transport died; subsequent reads also fail.
    Closed,
}

/// A transport that replays a fixed script.
pub struct MockTransport {
    steps: VecDeque<Step>,
}

impl MockTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
        }
    }
}

impl SerialTransport for MockTransport {
    fn read_line(&mut self) -> Result<Option<String>, SerialError> {
        match self.steps.pop_front() {
            Some(Step::Line(line)) => Ok(Some(line.to_string())),
            Some(Step::Idle) => {
                // A real idle read blocks for the port timeout; sleep a
                // little so spinning tests do not busy-loop.
                std::thread::sleep(std::time::Duration::from_millis(1));
                Ok(None)
            }
            // Script exhausted: treat like a dead transport so the link
            // falls back to discovery instead of spinning here.
            Some(Step::Closed) | None => Err(SerialError::Closed("script ended".into())),
        }
    }
}

/// A connector that hands out scripted transports in order.
///
/// Each call to `discover_and_open` pops the next transport; once the queue
/// is empty every call reports that no port is attached.
pub struct MockConnector {
    transports: Mutex<VecDeque<MockTransport>>,
}

impl MockConnector {
    pub fn new(transports: Vec<MockTransport>) -> Self {
        Self {
            transports: Mutex::new(transports.into()),
        }
    }

    /// A connector that never finds a port.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl SerialConnector for MockConnector {
    fn discover_and_open(
        &self,
    ) -> Result<Option<(String, Box<dyn SerialTransport>)>, SerialError> {
        let next = self.transports.lock().unwrap().pop_front();
        Ok(next.map(|t| {
            (
                "/dev/ttyACM0".to_string(),
                Box::new(t) as Box<dyn SerialTransport>,
            )
        }))
    }
}
