//! Command-line entry point for the volley exchange.
//!
//! Three modes: `run` drives both participants in this process over the
//! memory transport; `serve` and `dial` each drive one participant of a
//! cross-process exchange over line-framed TCP. Exit status is zero on
//! graceful completion (including cooperative cancellation) and non-zero
//! when the exchange could not start or the connection broke mid-way.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use volley::participant::Outcome;
use volley::report::Reporter;
use volley::{runner, ExchangeConfig, ExchangeError};

#[derive(Parser)]
#[command(name = "volley", about = "Bounded two-party message exchange", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both participants in this process over a memory channel pair.
    Run {
        #[command(flatten)]
        exchange: ExchangeArgs,
    },
    /// Run the responder, listening for one initiator connection.
    Serve {
        /// Address to bind the listening endpoint to.
        #[arg(long, default_value = "127.0.0.1:5001")]
        addr: String,
        #[command(flatten)]
        exchange: ExchangeArgs,
    },
    /// Run the initiator, dialing a listening responder.
    Dial {
        /// Address of the responder's listening endpoint.
        #[arg(long, default_value = "127.0.0.1:5001")]
        addr: String,
        #[command(flatten)]
        exchange: ExchangeArgs,
    },
}

#[derive(Args)]
struct ExchangeArgs {
    /// Messages each side sends before the exchange stops.
    #[arg(long, default_value_t = 4)]
    rounds: u32,

    /// Pause after each receive so console output interleaves readably.
    /// Zero disables the pause; the protocol does not depend on it.
    #[arg(long, default_value_t = 20)]
    delay_ms: u64,
}

impl ExchangeArgs {
    fn to_config(&self) -> ExchangeConfig {
        ExchangeConfig {
            max_rounds: self.rounds,
            receive_delay: (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms)),
            ..ExchangeConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "failed to start the runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(execute(cli.command));

    match result {
        Ok(Outcome::Completed) => {
            tracing::info!("communication ended successfully");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Interrupted) => ExitCode::SUCCESS,
        Ok(Outcome::ConnectionLost) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "exchange failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn execute(command: Command) -> Result<Outcome, ExchangeError> {
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling the exchange");
            signal.cancel();
        }
    });

    let reporter = Reporter::stdout();

    match command {
        Command::Run { exchange } => {
            let report =
                runner::run_in_process(&exchange.to_config(), &reporter, &shutdown).await?;
            Ok(worst_of(report.initiator, report.responder))
        }
        Command::Serve { addr, exchange } => {
            runner::serve(&addr, &exchange.to_config(), &reporter, &shutdown).await
        }
        Command::Dial { addr, exchange } => {
            runner::dial(&addr, &exchange.to_config(), &reporter, &shutdown).await
        }
    }
}

fn worst_of(initiator: Outcome, responder: Outcome) -> Outcome {
    if initiator == Outcome::ConnectionLost || responder == Outcome::ConnectionLost {
        Outcome::ConnectionLost
    } else if initiator == Outcome::Interrupted || responder == Outcome::Interrupted {
        Outcome::Interrupted
    } else {
        Outcome::Completed
    }
}
