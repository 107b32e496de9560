//! Single-slot "restart the scan" signal
//!
//! At most one request is buffered. Requests made while one is pending are
//! dropped, and neither side ever blocks.

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tracing::debug;

#[derive(Clone)]
pub struct RestartHandle {
    tx: mpsc::Sender<()>,
}

pub struct RestartReceiver {
    rx: mpsc::Receiver<()>,
}

pub fn restart_channel() -> (RestartHandle, RestartReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (RestartHandle { tx }, RestartReceiver { rx })
}

impl RestartHandle {
    /// Ask the scanner to start over. Returns false if a request was already
    /// pending (or the scanner is gone) and this one was dropped.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                debug!("Restart already pending, request dropped");
                false
            }
            Err(TrySendError::Closed(())) => false,
        }
    }
}

impl RestartReceiver {
    /// Drain the pending request, if any
    pub fn take_pending(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }
}
