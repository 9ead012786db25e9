//! # volley
//!
//! A bounded two-party message exchange.
//!
//! One participant (the initiator) seeds the exchange; the other (the
//! responder) appends its own reply counter to whatever it receives and
//! sends it back; the initiator appends its send counter and continues.
//! After an agreed number of round trips both sides stop, with no
//! deadlock and no message loss.
//!
//! The protocol logic is written once against the [`Channel`] trait and
//! runs unmodified over two transports:
//!
//! - [`channel::memory`]: an in-process point-to-point queue pair
//! - [`channel::line`]: a newline-framed byte stream (TCP between
//!   processes)
//!
//! The [`runner`] module carries the coordinator glue for both modes, and
//! the `volley` binary exposes them as `run`, `serve`, and `dial`
//! subcommands.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Channel transports connecting two participants.
pub mod channel;
/// Exchange configuration.
pub mod config;
/// Initiator and responder state machines.
pub mod participant;
/// Directional reporting of exchanged messages.
pub mod report;
/// Coordinator glue wiring participants to transports.
pub mod runner;

// Core re-exports so downstream code rarely needs volley-core directly
pub use volley_core::{stop, Channel, ExchangeError, LineFraming, Role, TransportError};

pub use channel::{LineChannel, MemoryChannel};
pub use config::ExchangeConfig;
pub use participant::{Outcome, Participant};
pub use report::{MemorySink, ReportSink, Reporter, StdoutSink};
pub use runner::ExchangeReport;
