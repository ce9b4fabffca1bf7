//! Connection Handler Module
//!
//! This module handles individual client connections to the dictionary
//! server. Each client gets its own handler task that runs in a loop,
//! reading lines and sending replies.
//!
//! ## Session State Machine
//!
//! ```text
//!                 ┌──────────────────────────┐
//!        ┌───────>│     AwaitingCommand      │<──────────┐
//!        │        └────┬──────────┬──────────┘           │
//!        │             │          │                      │
//!        │  a/s/i/p/?  │          │ d <word>             │ definition line
//!        │   (reply)   │          ▼ (prompt)             │ (confirmation)
//!        └─────────────┘   ┌──────────────────────────┐  │
//!                          │   AwaitingDefinition     │──┘
//!                          └──────────────────────────┘
//!
//!   `close`, idle timeout, EOF or I/O error ───> Closed
//! ```
//!
//! ## Buffer Management
//!
//! Incoming bytes accumulate in a `BytesMut` buffer. TCP is a stream
//! protocol, so a read may carry half a line or several lines; complete lines
//! are split off the front and processed in order.
//!
//! The buffer is bounded. When a line outgrows the limit before its newline
//! arrives, its head is kept and the rest of the line is dropped as it comes
//! in. The head is then handled like any other line.
//!
//! ## Idle Timeout
//!
//! Each wait for the next line is bounded by the idle window. When it
//! expires the handler closes the connection.

use crate::commands::{CommandHandler, Outcome};
use crate::protocol::{parse_command, LineParser, Reply};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, trace, warn};

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 1024;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total lines processed (commands and definitions)
    pub commands_processed: AtomicU64,
    /// Connections closed by the idle timeout
    pub idle_timeouts: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn idle_timeout(&self) {
        self.idle_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Per-connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long to wait for the next line before closing
    pub idle_timeout: Duration,
    /// Whether replies are followed by an echo of the request line
    pub echo: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: crate::DEFAULT_IDLE_TIMEOUT,
            echo: true,
        }
    }
}

/// Where a session is in its request cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a command line
    AwaitingCommand,
    /// `d <word>` was received; the next line is its definition
    AwaitingDefinition { word: String },
    /// The session is over
    Closed,
}

/// Handles a single client connection.
///
/// Generic over the stream so the state machine can run over any
/// `AsyncRead + AsyncWrite` transport, not just a `TcpStream`.
pub struct ConnectionHandler<S> {
    /// The client stream
    stream: BufWriter<S>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Buffer for incoming data
    buffer: BytesMut,

    /// The command handler (shares the store)
    command_handler: CommandHandler,

    /// Line framer
    parser: LineParser,

    /// Head of an overlong line whose tail is still being dropped
    overflow: Option<String>,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,

    config: SessionConfig,

    state: SessionState,

    /// When the last complete line arrived
    last_activity: Instant,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The client stream
    /// * `addr` - The client's socket address
    /// * `command_handler` - The command handler for executing commands
    /// * `stats` - Shared connection statistics
    /// * `config` - Idle window and echo setting
    pub fn new(
        stream: S,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
        config: SessionConfig,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            command_handler,
            parser: LineParser::new(),
            overflow: None,
            stats,
            config,
            state: SessionState::AwaitingCommand,
            last_activity: Instant::now(),
        }
    }

    /// Returns the current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Runs the main connection loop.
    ///
    /// Reads lines from the client and replies until the client sends
    /// `close`, goes idle, disconnects, or an error occurs. The stream is
    /// shut down on every exit path.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected, waiting for a query");

        let result = self.main_loop().await;
        self.state = SessionState::Closed;

        match &result {
            Ok(()) => info!(client = %self.addr, "Closing session. Bye!"),
            Err(e) => match e {
                ConnectionError::IdleTimeout(idle) => {
                    self.stats.idle_timeout();
                    info!(
                        client = %self.addr,
                        idle_ms = idle.as_millis() as u64,
                        "Connection timed out, closing session"
                    )
                }
                ConnectionError::ClientDisconnected => {
                    debug!(client = %self.addr, "Client disconnected")
                }
                ConnectionError::IoError(io_err)
                    if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
                {
                    debug!(client = %self.addr, "Connection reset by client")
                }
                _ => warn!(client = %self.addr, error = %e, "Connection error"),
            },
        }

        let _ = self.stream.shutdown().await;
        self.stats.connection_closed();
        result
    }

    /// The main read-execute-respond loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            let line = self.next_line().await?;
            self.last_activity = Instant::now();
            self.stats.command_processed();

            let state = std::mem::replace(&mut self.state, SessionState::AwaitingCommand);
            match state {
                SessionState::AwaitingCommand => {
                    let command = parse_command(&line);
                    debug!(
                        client = %self.addr,
                        command = command.name(),
                        line = %line,
                        "Received query"
                    );

                    match self.command_handler.execute(command) {
                        Outcome::Reply(reply) => self.send_reply(&reply, &line).await?,
                        Outcome::AwaitDefinition { word } => {
                            self.send_reply(&Reply::prompt(), &line).await?;
                            self.state = SessionState::AwaitingDefinition { word };
                        }
                        Outcome::Close => return Ok(()),
                    }
                }
                SessionState::AwaitingDefinition { word } => {
                    debug!(client = %self.addr, word = %word, "Received definition");
                    let reply = self.command_handler.define(&word, &line);
                    self.send_reply(&reply, &line).await?;
                }
                SessionState::Closed => return Ok(()),
            }
        }
    }

    /// Waits for the next complete line, bounded by the idle window.
    async fn next_line(&mut self) -> Result<String, ConnectionError> {
        let deadline = Instant::now() + self.config.idle_timeout;

        loop {
            if let Some(line) = self.try_parse_line() {
                return Ok(line);
            }

            let read = timeout_at(deadline, self.read_more_data()).await;
            match read {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ConnectionError::IdleTimeout(self.last_activity.elapsed()));
                }
            }
        }
    }

    /// Attempts to split one line off the buffer.
    fn try_parse_line(&mut self) -> Option<String> {
        if let Some(head) = self.overflow.take() {
            return match self.buffer.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let _ = self.buffer.split_to(pos + 1);
                    Some(head)
                }
                None => {
                    self.buffer.clear();
                    self.overflow = Some(head);
                    None
                }
            };
        }

        if self.buffer.is_empty() {
            return None;
        }

        match self.parser.parse(&self.buffer) {
            Ok(Some((line, consumed))) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    client = %self.addr,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed line"
                );
                Some(line)
            }
            Ok(None) => {
                trace!(
                    client = %self.addr,
                    buffered = self.buffer.len(),
                    "Incomplete line, need more data"
                );
                None
            }
            Err(e) => {
                warn!(client = %self.addr, error = %e, "Truncating overlong line");
                self.overflow = Some(self.parser.head(&self.buffer));
                self.buffer.clear();
                None
            }
        }
    }

    /// Reads more data from the stream into the buffer.
    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.capacity() - self.buffer.len() < 256 {
            self.buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            if self.buffer.is_empty() && self.overflow.is_none() {
                return Err(ConnectionError::ClientDisconnected);
            } else {
                return Err(ConnectionError::UnexpectedEof);
            }
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(())
    }

    /// Sends a reply, followed by the echo of `line` when enabled.
    async fn send_reply(&mut self, reply: &Reply, line: &str) -> Result<(), ConnectionError> {
        let echo = self.config.echo.then_some(line);
        let bytes = reply.serialize(echo);

        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());

        debug!(client = %self.addr, reply = %reply, "Responded");
        Ok(())
    }
}

/// Errors that end a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// No line arrived within the idle window
    #[error("Idle for {0:?}")]
    IdleTimeout(Duration),

    /// Client disconnected normally
    #[error("Client disconnected")]
    ClientDisconnected,

    /// Unexpected end of stream (partial line)
    #[error("Unexpected end of stream")]
    UnexpectedEof,
}

/// Handles a client connection.
///
/// Creates a ConnectionHandler and runs it to completion. Errors end only
/// this connection.
pub async fn handle_connection<S>(
    stream: S,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
    config: SessionConfig,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats, config);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::ClientDisconnected | ConnectionError::IdleTimeout(_) => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}
