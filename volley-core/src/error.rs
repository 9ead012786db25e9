//! Error types for the volley exchange.

use thiserror::Error;

/// Errors surfaced by a channel transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer endpoint is gone; no further messages can move.
    #[error("channel closed by peer")]
    Closed,

    /// The underlying byte stream failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised at participant construction or start-up.
///
/// These are the only failures allowed to escape a participant: transport
/// breakage and cancellation are handled inside the exchange loop and
/// reported through its outcome instead.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Configuration rejected at construction time. Never retried.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The participant API was driven out of order. Signals a caller bug.
    #[error("protocol misuse: {0}")]
    ProtocolMisuse(String),

    /// Connection setup failed before the exchange could start.
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    /// A participant execution unit died before reporting an outcome.
    #[error("participant task failed: {0}")]
    Runtime(String),
}
