//! Line-based communication channel to one connected player.

use crate::games::tictactoe::Board;
use crate::protocol::Notice;
use derive_more::{Display, Error, From};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
    ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tracing::{debug, instrument, trace};

/// Longest inbound line accepted, excluding the terminator.
pub const MAX_LINE_BYTES: usize = 1024;

/// Failure reading from or writing to a player.
///
/// [`EndpointError::LineTooLong`] leaves the channel usable; every other
/// variant is fatal to the match using it.
#[derive(Debug, Display, Error, From)]
pub enum EndpointError {
    /// The peer hung up (end of stream) or the endpoint was already closed.
    #[display("Endpoint closed")]
    Closed,
    /// The peer sent more than [`MAX_LINE_BYTES`] without a newline. The
    /// rest of that line has been discarded.
    #[display("Line too long")]
    LineTooLong,
    /// Transport-level I/O fault.
    #[display("Endpoint I/O error: {_0}")]
    #[from]
    Io(std::io::Error),
}

/// Bidirectional line channel to one player.
///
/// A match session sees its players only through this trait, so any
/// transport that can carry newline-terminated text can host a match.
#[async_trait::async_trait]
pub trait Endpoint: Send {
    /// Sends one line. The terminator is appended by the endpoint.
    async fn send_line(&mut self, line: &str) -> Result<(), EndpointError>;

    /// Waits for the next line, without its terminator.
    ///
    /// Returns [`EndpointError::Closed`] once the peer has hung up.
    /// Over-long lines yield [`EndpointError::LineTooLong`] and are skipped.
    async fn recv_line(&mut self) -> Result<String, EndpointError>;

    /// Flushes pending output and closes the channel. Closing twice is a no-op.
    async fn close(&mut self) -> Result<(), EndpointError>;

    /// Short name for log fields, such as the peer address.
    fn label(&self) -> &str;

    /// Sends a protocol notice as one line.
    async fn send_notice(&mut self, notice: Notice) -> Result<(), EndpointError> {
        self.send_line(&notice.to_string()).await
    }

    /// Sends the board render, one line per row.
    async fn send_board(&mut self, board: &Board) -> Result<(), EndpointError> {
        for line in board.render().lines() {
            self.send_line(line).await?;
        }
        Ok(())
    }
}

/// [`Endpoint`] over any byte stream, framing lines with `\n`.
#[derive(Debug)]
pub struct LineEndpoint<S> {
    label: String,
    reader: BufReader<ReadHalf<S>>,
    writer: BufWriter<WriteHalf<S>>,
    closed: bool,
}

/// Endpoint for a player connected over TCP.
pub type TcpEndpoint = LineEndpoint<TcpStream>;

impl<S> LineEndpoint<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    /// Wraps a connected stream.
    pub fn new(stream: S, label: impl Into<String>) -> Self {
        let (read, write) = tokio::io::split(stream);
        Self {
            label: label.into(),
            reader: BufReader::new(read),
            writer: BufWriter::new(write),
            closed: false,
        }
    }

    /// Whether [`Endpoint::close`] has completed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Skips input up to and including the next newline, or to end of stream.
    async fn discard_line(&mut self) -> Result<(), EndpointError> {
        loop {
            let (used, done) = {
                let available = self.reader.fill_buf().await?;
                match available.iter().position(|b| *b == b'\n') {
                    Some(pos) => (pos + 1, true),
                    None => (available.len(), available.is_empty()),
                }
            };
            self.reader.consume(used);
            if done {
                return Ok(());
            }
        }
    }
}

impl LineEndpoint<TcpStream> {
    /// Wraps an accepted socket, labelled with its peer address.
    pub fn from_tcp(stream: TcpStream) -> Self {
        let label = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown-peer".to_string());
        Self::new(stream, label)
    }
}

#[async_trait::async_trait]
impl<S> Endpoint for LineEndpoint<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    #[instrument(skip(self), fields(endpoint = %self.label))]
    async fn send_line(&mut self, line: &str) -> Result<(), EndpointError> {
        if self.closed {
            return Err(EndpointError::Closed);
        }
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        trace!("Line sent");
        Ok(())
    }

    #[instrument(skip(self), fields(endpoint = %self.label))]
    async fn recv_line(&mut self) -> Result<String, EndpointError> {
        if self.closed {
            return Err(EndpointError::Closed);
        }
        let mut buf = Vec::new();
        let read = (&mut self.reader)
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if read == 0 {
            debug!("Peer closed the stream");
            return Err(EndpointError::Closed);
        }
        if buf.len() > MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
            self.discard_line().await?;
            debug!("Discarded over-long line");
            return Err(EndpointError::LineTooLong);
        }
        // Undecodable bytes are kept as replacement characters; the line
        // will simply fail to parse as a move.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        trace!(line = %line, "Line received");
        Ok(line)
    }

    #[instrument(skip(self), fields(endpoint = %self.label))]
    async fn close(&mut self) -> Result<(), EndpointError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        debug!("Endpoint closed");
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
