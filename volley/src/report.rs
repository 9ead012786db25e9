//! Directional reporting of exchanged messages.
//!
//! Presentation only: each send is formatted as a directional console
//! line and handed to a sink. Reporter calls carry no protocol decisions
//! and nothing downstream of them is consumed by the exchange.
//!
//! Sinks serialize emission — one whole line at a time — so interleaved
//! output from two participants stays readable without any pacing delay.

use std::sync::{Arc, Mutex};

use volley_core::Role;

/// Destination for formatted report lines.
pub trait ReportSink: Send + Sync {
    /// Emit one formatted line.
    fn emit(&self, line: &str);
}

/// Sink writing each line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, line: &str) {
        // println! locks stdout per call, which is all the serialization
        // a whole line needs.
        println!("{line}");
    }
}

/// Sink recording lines in memory, for assertions in tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("report sink lock poisoned").clone()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .expect("report sink lock poisoned")
            .push(line.to_string());
    }
}

/// Formats and emits each exchanged message.
///
/// Cloning is cheap; clones share the same sink.
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<dyn ReportSink>,
}

impl Reporter {
    /// Reporter writing through the given sink.
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// Reporter printing to stdout.
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    /// Report a message the initiator just sent:
    /// `sender: "message" -> receiver`.
    ///
    /// `role` is the caller's actual role. A responder calling this is a
    /// caller bug: logged as an error, but the line is still emitted and
    /// the exchange continues.
    pub fn initiator_sent(&self, role: Role, sender: &str, receiver: &str, message: &str) {
        if role != Role::Initiator {
            tracing::error!(%role, "initiator_sent called for the wrong role");
        }
        self.sink
            .emit(&format!("{sender}: \"{message}\" -> {receiver}"));
    }

    /// Report a reply the responder just sent:
    /// `receiver <- sender: "message"`.
    ///
    /// Role mismatches are diagnosed the same way as
    /// [`initiator_sent`](Self::initiator_sent).
    pub fn responder_sent(&self, role: Role, sender: &str, receiver: &str, message: &str) {
        if role != Role::Responder {
            tracing::error!(%role, "responder_sent called for the wrong role");
        }
        self.sink
            .emit(&format!("{receiver} <- {sender}: \"{message}\""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiator_line_shape() {
        let sink = MemorySink::new();
        let reporter = Reporter::new(Arc::new(sink.clone()));

        reporter.initiator_sent(Role::Initiator, "player1", "player2", "message 0");

        assert_eq!(sink.lines(), vec![r#"player1: "message 0" -> player2"#]);
    }

    #[test]
    fn test_responder_line_shape() {
        let sink = MemorySink::new();
        let reporter = Reporter::new(Arc::new(sink.clone()));

        reporter.responder_sent(Role::Responder, "player2", "player1", "message 0 1");

        assert_eq!(sink.lines(), vec![r#"player1 <- player2: "message 0 1""#]);
    }

    #[test]
    fn test_role_mismatch_still_emits() {
        let sink = MemorySink::new();
        let reporter = Reporter::new(Arc::new(sink.clone()));

        // Wrong role on both variants: diagnosed, never fatal.
        reporter.initiator_sent(Role::Responder, "player2", "player1", "message 0");
        reporter.responder_sent(Role::Initiator, "player1", "player2", "message 0 1");

        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_clones_share_one_sink() {
        let sink = MemorySink::new();
        let reporter = Reporter::new(Arc::new(sink.clone()));
        let clone = reporter.clone();

        reporter.initiator_sent(Role::Initiator, "a", "b", "one");
        clone.initiator_sent(Role::Initiator, "a", "b", "two");

        assert_eq!(sink.lines().len(), 2);
    }
}
