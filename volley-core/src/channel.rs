//! Bidirectional message conduit abstraction.

use async_trait::async_trait;

use crate::TransportError;

/// An ordered, blocking conduit for text messages between two endpoints.
///
/// Both transports — the in-process queue pair and the line-framed byte
/// stream — satisfy the same contract, so the exchange loops are written
/// once against this trait and run unmodified over either.
///
/// FIFO delivery with a single producer and a single consumer per
/// direction is the load-bearing guarantee: strict round alternation in
/// the exchange rests on it, not on any locking in the protocol itself.
#[async_trait]
pub trait Channel: Send {
    /// Deliver `message` to the peer endpoint, in FIFO order relative to
    /// other sends from this endpoint.
    ///
    /// May suspend the caller if the transport applies backpressure.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the conduit is broken or closed.
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Wait for the next message from the peer.
    ///
    /// Suspends until a message is available.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] once the peer endpoint is gone
    /// and no buffered message remains, or [`TransportError::Io`] if the
    /// underlying stream fails.
    async fn recv(&mut self) -> Result<String, TransportError>;
}
