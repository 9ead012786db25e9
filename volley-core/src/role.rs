//! Participant roles in a two-party exchange.

use std::fmt;

/// Which side of the exchange a participant drives.
///
/// Every exchange has exactly one of each. The role is fixed at
/// construction and never changes over a participant's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Sends the seed message, then answers every reply but the last.
    Initiator,
    /// Only ever replies to a received message.
    Responder,
}

impl Role {
    /// True for the side that seeds the exchange.
    pub fn is_initiator(&self) -> bool {
        matches!(self, Role::Initiator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => write!(f, "initiator"),
            Role::Responder => write!(f, "responder"),
        }
    }
}
