//! Coordinator glue wiring participants to transports.
//!
//! Everything the exchange treats as external lives here: spawning the
//! two execution units and waiting for both, plus connection setup for
//! the process-boundary variant (bind/accept on the responder side,
//! dial-with-retry on the initiator side). The exchange loops themselves
//! never change between modes.

use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use volley_core::{ExchangeError, Role, TransportError};

use crate::channel::line::LineChannel;
use crate::channel::memory;
use crate::config::ExchangeConfig;
use crate::participant::{Outcome, Participant};
use crate::report::Reporter;

/// Delay between connection attempts while the responder's listener
/// comes up.
const DIAL_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Connection attempts before the initiator gives up dialing. Bounds
/// only connection setup; in-exchange waits are never bounded here.
const DIAL_ATTEMPTS: u32 = 40;

/// How both sides of an in-process exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeReport {
    /// How the initiator's loop ended.
    pub initiator: Outcome,
    /// How the responder's loop ended.
    pub responder: Outcome,
}

impl ExchangeReport {
    /// True when both loops ran to their full round budget.
    pub fn completed(&self) -> bool {
        self.initiator == Outcome::Completed && self.responder == Outcome::Completed
    }
}

/// Run both participants of one exchange inside this process.
///
/// Wires a memory queue pair, spawns each loop as its own task on the
/// runtime, and waits for both to finish.
///
/// # Errors
///
/// Configuration and wiring faults, or a participant task dying before
/// it reports an outcome.
pub async fn run_in_process(
    config: &ExchangeConfig,
    reporter: &Reporter,
    shutdown: &CancellationToken,
) -> Result<ExchangeReport, ExchangeError> {
    config.validate()?;

    let (initiator_end, responder_end) = memory::pair();

    let mut initiator = Participant::from_config(Role::Initiator, config, reporter.clone())?;
    initiator.wire(initiator_end)?;
    let mut responder = Participant::from_config(Role::Responder, config, reporter.clone())?;
    responder.wire(responder_end)?;

    let initiator_shutdown = shutdown.clone();
    let responder_shutdown = shutdown.clone();
    let initiator_task =
        tokio::spawn(async move { initiator.run(&initiator_shutdown).await });
    let responder_task =
        tokio::spawn(async move { responder.run(&responder_shutdown).await });

    let initiator = join_outcome(initiator_task).await?;
    let responder = join_outcome(responder_task).await?;

    Ok(ExchangeReport {
        initiator,
        responder,
    })
}

/// Serve one exchange as the responder process.
///
/// Binds `addr`, accepts exactly one connection, and runs the responder
/// loop over a line-framed channel on it.
///
/// # Errors
///
/// Configuration faults, or bind/accept failing before the exchange
/// starts.
pub async fn serve(
    addr: &str,
    config: &ExchangeConfig,
    reporter: &Reporter,
    shutdown: &CancellationToken,
) -> Result<Outcome, ExchangeError> {
    config.validate()?;

    let listener = TcpListener::bind(addr).await.map_err(TransportError::from)?;
    tracing::debug!(addr, "responder listening");

    let (stream, peer_addr) = tokio::select! {
        _ = shutdown.cancelled() => {
            tracing::info!(addr, "cancelled before the initiator connected");
            return Ok(Outcome::Interrupted);
        }
        accepted = listener.accept() => accepted.map_err(TransportError::from)?,
    };
    tracing::debug!(peer = %peer_addr, "initiator connected");

    let mut responder = Participant::from_config(Role::Responder, config, reporter.clone())?;
    responder.wire(LineChannel::new(stream))?;
    responder.run(shutdown).await
}

/// Run one exchange as the initiator process, dialing a listening
/// responder.
///
/// Connection setup retries briefly while the responder's listener comes
/// up; once the exchange is running no waits are bounded.
///
/// # Errors
///
/// Configuration faults, or the responder staying unreachable through
/// every attempt.
pub async fn dial(
    addr: &str,
    config: &ExchangeConfig,
    reporter: &Reporter,
    shutdown: &CancellationToken,
) -> Result<Outcome, ExchangeError> {
    config.validate()?;

    let stream = tokio::select! {
        _ = shutdown.cancelled() => {
            tracing::info!(addr, "cancelled before the responder was reached");
            return Ok(Outcome::Interrupted);
        }
        connected = connect_with_retry(addr) => connected?,
    };
    tracing::debug!(addr, "connected to responder");

    let mut initiator = Participant::from_config(Role::Initiator, config, reporter.clone())?;
    initiator.wire(LineChannel::new(stream))?;
    initiator.run(shutdown).await
}

async fn connect_with_retry(addr: &str) -> Result<TcpStream, ExchangeError> {
    let mut attempt = 0;
    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                attempt += 1;
                if attempt >= DIAL_ATTEMPTS {
                    return Err(TransportError::from(e).into());
                }
                tracing::debug!(addr, attempt, error = %e, "responder not ready, retrying");
                tokio::time::sleep(DIAL_RETRY_DELAY).await;
            }
        }
    }
}

async fn join_outcome(
    task: JoinHandle<Result<Outcome, ExchangeError>>,
) -> Result<Outcome, ExchangeError> {
    match task.await {
        Ok(result) => result,
        Err(e) => Err(ExchangeError::Runtime(e.to_string())),
    }
}
