//! Initiator and responder state machines.
//!
//! A participant drives one role's send/receive loop over a wired
//! [`Channel`], using the [`stop`] predicates to bound the exchange. The
//! channel is wired exactly once before the single `run`; transport
//! breakage and cancellation terminate the loop gracefully and surface
//! through [`Outcome`] rather than as errors.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use volley_core::{stop, Channel, ExchangeError, Role, TransportError};

use crate::config::ExchangeConfig;
use crate::report::Reporter;

/// How a participant's loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both counters reached the configured round budget.
    Completed,
    /// Cancelled while blocked; terminated cleanly mid-exchange.
    Interrupted,
    /// The conduit broke; the exchange cannot finish. A round count short
    /// of the budget tells external verifiers the stop was abnormal.
    ConnectionLost,
}

/// One side of a bounded two-party exchange.
///
/// Lifecycle: construct with a fixed role and round budget, [`wire`] the
/// conduit exactly once, [`run`] exactly once. After the loop exits the
/// participant performs no further sends or receives; its counters remain
/// readable for verification.
///
/// [`wire`]: Self::wire
/// [`run`]: Self::run
pub struct Participant<C: Channel> {
    name: String,
    peer_name: String,
    role: Role,
    max_rounds: u32,
    seed_text: String,
    receive_delay: Option<Duration>,
    sent: u32,
    received: u32,
    channel: Option<C>,
    finished: bool,
    reporter: Reporter,
}

impl<C: Channel> Participant<C> {
    /// Create a participant with a fixed role and round budget.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::InvalidConfiguration`] when `max_rounds` is zero.
    pub fn new(
        name: impl Into<String>,
        peer_name: impl Into<String>,
        role: Role,
        max_rounds: u32,
        reporter: Reporter,
    ) -> Result<Self, ExchangeError> {
        if max_rounds == 0 {
            return Err(ExchangeError::InvalidConfiguration(
                "max_rounds must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            peer_name: peer_name.into(),
            role,
            max_rounds,
            seed_text: "message".to_string(),
            receive_delay: None,
            sent: 0,
            received: 0,
            channel: None,
            finished: false,
            reporter,
        })
    }

    /// Build the participant for `role` out of an exchange configuration.
    pub fn from_config(
        role: Role,
        config: &ExchangeConfig,
        reporter: Reporter,
    ) -> Result<Self, ExchangeError> {
        let (name, peer_name) = match role {
            Role::Initiator => (config.initiator_name.clone(), config.responder_name.clone()),
            Role::Responder => (config.responder_name.clone(), config.initiator_name.clone()),
        };

        Ok(Self {
            seed_text: config.seed_text.clone(),
            receive_delay: config.receive_delay,
            ..Self::new(name, peer_name, role, config.max_rounds, reporter)?
        })
    }

    /// This participant's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The role fixed at construction.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Messages sent so far. Monotonically non-decreasing.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Messages received so far. Monotonically non-decreasing.
    pub fn received(&self) -> u32 {
        self.received
    }

    /// True once [`run`](Self::run) has returned.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Wire the conduit to the peer. Must happen exactly once, before
    /// [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// [`ExchangeError::ProtocolMisuse`] if a channel was already wired
    /// or the participant already ran.
    pub fn wire(&mut self, channel: C) -> Result<(), ExchangeError> {
        if self.finished {
            return Err(ExchangeError::ProtocolMisuse(format!(
                "{} already ran; wiring a new channel is not allowed",
                self.name
            )));
        }
        if self.channel.is_some() {
            return Err(ExchangeError::ProtocolMisuse(format!(
                "channel already wired for {}",
                self.name
            )));
        }
        self.channel = Some(channel);
        Ok(())
    }

    /// Drive this participant's loop until its stop condition, a broken
    /// conduit, or cancellation.
    ///
    /// Transport failures and cancellation are handled here: the loop
    /// logs a termination notice, stops without retrying, and reports
    /// what happened through the returned [`Outcome`].
    ///
    /// # Errors
    ///
    /// [`ExchangeError::ProtocolMisuse`] when no channel is wired or the
    /// participant already ran. Nothing else escapes.
    pub async fn run(&mut self, shutdown: &CancellationToken) -> Result<Outcome, ExchangeError> {
        if self.finished {
            return Err(ExchangeError::ProtocolMisuse(format!(
                "{} already ran to completion",
                self.name
            )));
        }
        let mut channel = self.channel.take().ok_or_else(|| {
            ExchangeError::ProtocolMisuse(format!(
                "no channel wired for {}; call wire() before run()",
                self.name
            ))
        })?;
        self.finished = true;

        let outcome = match self.role {
            Role::Initiator => self.run_initiator(&mut channel, shutdown).await,
            Role::Responder => self.run_responder(&mut channel, shutdown).await,
        };

        if outcome == Outcome::Completed {
            tracing::debug!(
                name = %self.name,
                sent = self.sent,
                received = self.received,
                "exchange loop complete"
            );
        }
        Ok(outcome)
    }

    async fn run_initiator(&mut self, channel: &mut C, shutdown: &CancellationToken) -> Outcome {
        // Seed: the fixed marker plus round index 0.
        let mut message = format!("{} {}", self.seed_text, self.sent);
        if let Err(e) = channel.send(&message).await {
            return self.connection_lost("send", &e);
        }
        tracing::info!(name = %self.name, peer = %self.peer_name, "communication started");
        self.reporter
            .initiator_sent(self.role, &self.name, &self.peer_name, &message);
        self.sent += 1;

        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => return self.interrupted(),
                result = channel.recv() => match result {
                    Ok(message) => message,
                    Err(e) => return self.connection_lost("receive", &e),
                },
            };
            self.received += 1;
            self.pace().await;

            if stop::initiator_done(self.received, self.sent, self.max_rounds) {
                // The final reply is consumed and counted but never
                // answered; that is the designed termination point.
                break;
            }

            message = format!("{} {}", received, self.sent);
            if let Err(e) = channel.send(&message).await {
                return self.connection_lost("send", &e);
            }
            self.reporter
                .initiator_sent(self.role, &self.name, &self.peer_name, &message);
            self.sent += 1;
        }

        Outcome::Completed
    }

    async fn run_responder(&mut self, channel: &mut C, shutdown: &CancellationToken) -> Outcome {
        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => return self.interrupted(),
                result = channel.recv() => match result {
                    Ok(message) => message,
                    Err(e) => return self.connection_lost("receive", &e),
                },
            };
            self.received += 1;
            self.pace().await;

            // Count the reply before composing it, so the embedded count
            // includes this reply.
            self.sent += 1;
            let message = format!("{} {}", received, self.sent);
            if let Err(e) = channel.send(&message).await {
                return self.connection_lost("send", &e);
            }
            self.reporter
                .responder_sent(self.role, &self.name, &self.peer_name, &message);

            if stop::responder_done(self.sent, self.max_rounds) {
                break;
            }
        }

        Outcome::Completed
    }

    async fn pace(&self) {
        if let Some(delay) = self.receive_delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn connection_lost(&self, operation: &str, error: &TransportError) -> Outcome {
        tracing::warn!(
            name = %self.name,
            sent = self.sent,
            received = self.received,
            %error,
            "{operation} failed, terminating exchange"
        );
        Outcome::ConnectionLost
    }

    fn interrupted(&self) -> Outcome {
        tracing::info!(
            name = %self.name,
            sent = self.sent,
            received = self.received,
            "interrupted while waiting, terminating gracefully"
        );
        Outcome::Interrupted
    }
}
