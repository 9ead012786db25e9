//! Newline-framed transport over a byte stream.
//!
//! Frames one message per UTF-8 line over any reliable ordered stream:
//! TCP between processes in production, `tokio::io::duplex` in tests.
//! Reads are accumulated through the sans-I/O [`LineFraming`] buffer, so
//! a read carrying a partial line, one line, or several concatenated
//! lines is handled the same way.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use volley_core::{Channel, LineFraming, TransportError};

/// Bytes requested from the stream per read.
const READ_CHUNK: usize = 4096;

/// Channel framing one message per newline-terminated line over a byte
/// stream.
#[derive(Debug)]
pub struct LineChannel<S> {
    stream: S,
    framing: LineFraming,
}

impl<S> LineChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-established stream.
    ///
    /// Connection setup (bind/accept/dial) belongs to the coordinator
    /// glue; the channel itself only moves framed messages.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            framing: LineFraming::new(),
        }
    }
}

#[async_trait]
impl<S> Channel for LineChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        let framed = LineFraming::encode(message);
        self.stream.write_all(&framed).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        loop {
            if let Some(line) = self.framing.next_line() {
                return Ok(line);
            }

            let mut chunk = [0u8; READ_CHUNK];
            let read = self.stream.read(&mut chunk).await?;
            if read == 0 {
                // EOF: the peer closed the connection.
                return Err(TransportError::Closed);
            }
            self.framing.feed(&chunk[..read]);
        }
    }
}
