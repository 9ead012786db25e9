//! Exchange configuration.
//!
//! Participant names, the round budget, and the console pacing delay all
//! live here and are handed explicitly to the runner; nothing is kept as
//! a process-wide constant.

use std::time::Duration;

use volley_core::ExchangeError;

/// Configuration for one bounded exchange.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Display name of the initiating participant.
    pub initiator_name: String,

    /// Display name of the responding participant.
    pub responder_name: String,

    /// Messages each side sends before its loop stops. Must be greater
    /// than zero.
    pub max_rounds: u32,

    /// Leading text of the seed message; round counters get appended to
    /// whatever travels back and forth.
    pub seed_text: String,

    /// Optional pause after each receive, so output interleaves readably
    /// when two participants share one console. No protocol significance.
    pub receive_delay: Option<Duration>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            initiator_name: "player1".to_string(),
            responder_name: "player2".to_string(),
            max_rounds: 4,
            seed_text: "message".to_string(),
            receive_delay: None,
        }
    }
}

impl ExchangeConfig {
    /// Configuration with the given round budget and defaults elsewhere.
    pub fn with_rounds(max_rounds: u32) -> Self {
        Self {
            max_rounds,
            ..Self::default()
        }
    }

    /// Reject configurations the protocol cannot run.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::InvalidConfiguration`] when `max_rounds` is zero.
    pub fn validate(&self) -> Result<(), ExchangeError> {
        if self.max_rounds == 0 {
            return Err(ExchangeError::InvalidConfiguration(
                "max_rounds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
