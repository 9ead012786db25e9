//! End-to-end exchanges over the in-process memory transport.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use volley::channel::memory;
use volley::participant::{Outcome, Participant};
use volley::report::{MemorySink, Reporter};
use volley::{runner, ExchangeConfig, ExchangeError, Role};

fn recording_reporter() -> (Reporter, MemorySink) {
    let sink = MemorySink::new();
    (Reporter::new(Arc::new(sink.clone())), sink)
}

/// The message text inside the quotes of a report line.
fn quoted_message(line: &str) -> &str {
    let start = line.find('"').expect("report line has an opening quote");
    let end = line.rfind('"').expect("report line has a closing quote");
    &line[start + 1..end]
}

/// The round counter embedded at the end of a message.
fn embedded_counter(line: &str) -> u32 {
    quoted_message(line)
        .rsplit(' ')
        .next()
        .expect("message has tokens")
        .parse()
        .expect("message ends with a counter")
}

#[tokio::test]
async fn test_two_round_transcript_is_exact() {
    let (reporter, sink) = recording_reporter();
    let config = ExchangeConfig {
        // Paced so the shared sink observes the rounds in wall-clock
        // order; the protocol itself does not need the delay.
        receive_delay: Some(Duration::from_millis(50)),
        ..ExchangeConfig::with_rounds(2)
    };

    let report = runner::run_in_process(&config, &reporter, &CancellationToken::new())
        .await
        .expect("exchange starts");

    assert!(report.completed());
    assert_eq!(
        sink.lines(),
        vec![
            r#"player1: "message 0" -> player2"#,
            r#"player1 <- player2: "message 0 1""#,
            r#"player1: "message 0 1 1" -> player2"#,
            r#"player1 <- player2: "message 0 1 1 2""#,
        ]
    );
}

#[tokio::test]
async fn test_four_round_per_role_sequences() {
    let (reporter, sink) = recording_reporter();
    let config = ExchangeConfig::with_rounds(4);

    let report = runner::run_in_process(&config, &reporter, &CancellationToken::new())
        .await
        .expect("exchange starts");
    assert!(report.completed());

    let lines = sink.lines();
    let initiator: Vec<&str> = lines
        .iter()
        .filter(|l| l.contains(" -> "))
        .map(|l| quoted_message(l))
        .collect();
    let responder: Vec<&str> = lines
        .iter()
        .filter(|l| l.contains(" <- "))
        .map(|l| quoted_message(l))
        .collect();

    assert_eq!(
        initiator,
        vec![
            "message 0",
            "message 0 1 1",
            "message 0 1 1 2 2",
            "message 0 1 1 2 2 3 3",
        ]
    );
    assert_eq!(
        responder,
        vec![
            "message 0 1",
            "message 0 1 1 2",
            "message 0 1 1 2 2 3",
            "message 0 1 1 2 2 3 3 4",
        ]
    );
    // 2N messages total across the exchange.
    assert_eq!(lines.len(), 8);
}

#[tokio::test]
async fn test_embedded_counter_sequences() {
    let (reporter, sink) = recording_reporter();
    let config = ExchangeConfig::with_rounds(5);

    runner::run_in_process(&config, &reporter, &CancellationToken::new())
        .await
        .expect("exchange starts");

    let lines = sink.lines();
    let initiator: Vec<u32> = lines
        .iter()
        .filter(|l| l.contains(" -> "))
        .map(|l| embedded_counter(l))
        .collect();
    let responder: Vec<u32> = lines
        .iter()
        .filter(|l| l.contains(" <- "))
        .map(|l| embedded_counter(l))
        .collect();

    assert_eq!(initiator, vec![0, 1, 2, 3, 4]);
    assert_eq!(responder, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_single_round_stops_immediately() {
    let (reporter, sink) = recording_reporter();
    let config = ExchangeConfig::with_rounds(1);

    let report = runner::run_in_process(&config, &reporter, &CancellationToken::new())
        .await
        .expect("exchange starts");

    assert!(report.completed());
    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(quoted_message(&lines[0]), "message 0");
    assert_eq!(quoted_message(&lines[1]), "message 0 1");
}

#[tokio::test]
async fn test_counters_reach_budget_on_both_sides() {
    let (reporter, _sink) = recording_reporter();
    let config = ExchangeConfig::with_rounds(4);
    let shutdown = CancellationToken::new();

    let (initiator_end, responder_end) = memory::pair();
    let mut initiator = Participant::from_config(Role::Initiator, &config, reporter.clone())
        .expect("valid config");
    initiator.wire(initiator_end).expect("wire succeeds");
    let mut responder = Participant::from_config(Role::Responder, &config, reporter)
        .expect("valid config");
    responder.wire(responder_end).expect("wire succeeds");

    let responder_shutdown = shutdown.clone();
    let responder_task = tokio::spawn(async move {
        let outcome = responder.run(&responder_shutdown).await;
        (outcome, responder)
    });

    let outcome = initiator.run(&shutdown).await.expect("run returns");
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(initiator.sent(), 4);
    assert_eq!(initiator.received(), 4);
    assert!(initiator.is_finished());

    let (outcome, responder) = responder_task.await.expect("responder task joins");
    assert_eq!(outcome.expect("run returns"), Outcome::Completed);
    assert_eq!(responder.sent(), 4);
    assert_eq!(responder.received(), 4);
}

#[tokio::test]
async fn test_zero_rounds_never_starts() {
    let (reporter, sink) = recording_reporter();
    let config = ExchangeConfig::with_rounds(0);

    let err = runner::run_in_process(&config, &reporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::InvalidConfiguration(_)));
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn test_cancellation_stops_a_long_exchange() {
    let (reporter, _sink) = recording_reporter();
    let config = ExchangeConfig {
        receive_delay: Some(Duration::from_millis(10)),
        ..ExchangeConfig::with_rounds(1_000)
    };
    let shutdown = CancellationToken::new();

    let task = {
        let reporter = reporter.clone();
        let shutdown = shutdown.clone();
        let config = config.clone();
        tokio::spawn(async move {
            runner::run_in_process(&config, &reporter, &shutdown).await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    let report = task
        .await
        .expect("runner task joins")
        .expect("exchange starts");

    // Depending on which side observes the cancellation first, the other
    // may instead see its peer's channel close; neither side finishes.
    assert!(!report.completed());
    assert_ne!(report.initiator, Outcome::Completed);
    assert_ne!(report.responder, Outcome::Completed);
}
