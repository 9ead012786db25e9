//! In-process queue-pair transport.
//!
//! Each endpoint owns one inbound FIFO; `send` pushes onto the peer's
//! inbound queue. Capacity is unbounded, so sends never block at exchange
//! volumes and no message is ever dropped. Each queue has exactly one
//! producer and one consumer, which is all the ordering guarantee the
//! exchange needs.

use async_trait::async_trait;
use tokio::sync::mpsc;

use volley_core::{Channel, TransportError};

/// One endpoint of an in-memory point-to-point channel pair.
///
/// Created only in pairs via [`pair`]; a lone endpoint has nothing to
/// talk to.
#[derive(Debug)]
pub struct MemoryChannel {
    to_peer: mpsc::UnboundedSender<String>,
    inbound: mpsc::UnboundedReceiver<String>,
}

/// Create two connected endpoints.
///
/// Dropping either endpoint closes the conduit: the survivor's `recv`
/// drains whatever was already queued, then reports
/// [`TransportError::Closed`].
pub fn pair() -> (MemoryChannel, MemoryChannel) {
    let (left_tx, left_rx) = mpsc::unbounded_channel();
    let (right_tx, right_rx) = mpsc::unbounded_channel();

    (
        MemoryChannel {
            to_peer: right_tx,
            inbound: left_rx,
        },
        MemoryChannel {
            to_peer: left_tx,
            inbound: right_rx,
        },
    )
}

#[async_trait]
impl Channel for MemoryChannel {
    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        self.to_peer
            .send(message.to_string())
            .map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        self.inbound.recv().await.ok_or(TransportError::Closed)
    }
}
