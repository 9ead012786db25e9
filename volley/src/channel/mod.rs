//! Channel transports connecting two participants.
//!
//! Two interchangeable implementations of the [`Channel`](volley_core::Channel)
//! contract: an in-process queue pair for shared-memory concurrency and a
//! line-framed byte stream for cross-process exchanges.

/// Newline-framed transport over a byte stream.
pub mod line;
/// In-process queue-pair transport.
pub mod memory;

pub use line::LineChannel;
pub use memory::MemoryChannel;
