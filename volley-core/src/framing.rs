//! Sans-I/O line framing for the byte-stream transport.
//!
//! Messages travel one per line: UTF-8 text, newline-terminated, no
//! length prefix, no checksum. Stream reads may carry a partial line, one
//! line, or several concatenated lines; this accumulator buffers whatever
//! arrives and hands back complete lines, keeping partial data for the
//! next read.

/// Stateful accumulator extracting newline-delimited messages from a
/// stream of reads.
#[derive(Debug, Default)]
pub struct LineFraming {
    buffer: Vec<u8>,
}

impl LineFraming {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append raw bytes read from the stream.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Pop the next complete line, without its terminator.
    ///
    /// Returns `None` while only partial data is buffered. A trailing
    /// carriage return is stripped so peers writing `\r\n` interoperate.
    /// Invalid UTF-8 is replaced lossily rather than dropped; the wire
    /// contract is free text, and losing a message would break the
    /// exchange's accounting.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Frame a message for the wire: the text plus a trailing newline.
    pub fn encode(message: &str) -> Vec<u8> {
        let mut framed = Vec::with_capacity(message.len() + 1);
        framed.extend_from_slice(message.as_bytes());
        framed.push(b'\n');
        framed
    }

    /// Number of buffered bytes still awaiting a terminator.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
