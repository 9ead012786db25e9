//! # volley-core
//!
//! Core abstractions for the volley exchange protocol.
//!
//! This crate provides the fundamental traits and types shared by every
//! transport and runner mode:
//!
//! - [`Channel`]: the ordered, blocking conduit both transports implement
//! - [`Role`]: which side of the exchange a participant drives
//! - [`stop`]: the pure predicates bounding both exchange loops
//! - [`LineFraming`]: sans-I/O framing for the byte-stream transport
//! - [`ExchangeError`] / [`TransportError`]: the error taxonomy
//!
//! No I/O happens here; everything in this crate is policy-free and usable
//! from any runtime.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

mod channel;
mod error;
mod framing;
mod role;
pub mod stop;

// Channel exports
pub use channel::Channel;

// Error exports
pub use error::{ExchangeError, TransportError};

// Framing exports
pub use framing::LineFraming;

// Role exports
pub use role::Role;
